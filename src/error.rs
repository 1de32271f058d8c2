/// Error type returned by [`crate::formatter::YamlFormatter::format`].
///
/// Formatting is a one-shot transformation: every failure is surfaced
/// immediately to the caller, nothing is retried or recovered.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    /// Message template and arguments do not match (wrong arity,
    /// unsupported directive). Indicates a caller bug.
    #[error("message template mismatch: {0}")]
    Template(String),

    /// The line format references a field this formatter does not know.
    #[error("unknown line format field: {0}")]
    UnknownField(String),

    /// Context or error data could not be serialized to YAML.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),
}
