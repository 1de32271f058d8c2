use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use crate::identity::Identity;

/// A value attached to an error's structured data.
///
/// Identities are rendered in their canonical `category/name` string
/// form when the data is serialized. The conversion is shallow: an
/// identity a caller encodes deeper inside a [`Value`] is emitted as
/// whatever the caller encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorField {
    Identity(Identity),
    Value(Value),
}

impl ErrorField {
    /// Normalize to a plain serializable value.
    pub fn to_plain(&self) -> Value {
        match self {
            ErrorField::Identity(id) => Value::String(id.to_string()),
            ErrorField::Value(v) => v.clone(),
        }
    }
}

impl From<Identity> for ErrorField {
    fn from(id: Identity) -> Self {
        ErrorField::Identity(id)
    }
}

impl From<Value> for ErrorField {
    fn from(value: Value) -> Self {
        ErrorField::Value(value)
    }
}

/// Capability for errors belonging to the service framework's own
/// hierarchy: a symbolic name, an optional human message and a mapping
/// of additional named fields.
///
/// Generic/foreign errors don't implement this; they are captured with
/// [`ExceptionInfo::from_error`] and fall back to their type name and
/// default string rendering.
pub trait DomainError: Error {
    /// Declared symbolic name of the error, e.g. `ObjectNotExistException`.
    fn symbolic_name(&self) -> &str;

    /// Optional human message; `None` means the field was never set.
    fn message(&self) -> Option<&str> {
        None
    }

    /// Additional named fields carried by the error, excluding the message.
    fn error_data(&self) -> BTreeMap<String, ErrorField> {
        BTreeMap::new()
    }
}

/// One frame of a captured call stack.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFrame {
    pub file: String,
    pub line: u32,
    pub function: String,
    /// Source text of the frame's line, if available.
    pub source: Option<String>,
}

impl TraceFrame {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        TraceFrame { file: file.into(), line, function: function.into(), source: None }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for TraceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File \"{}\", line {}, in {}", self.file, self.line, self.function)?;
        if let Some(source) = &self.source {
            write!(f, "\n  {}", source.trim())?;
        }
        Ok(())
    }
}

/// A raised error normalized for logging.
///
/// Classification (domain vs generic) happens once, here, at the
/// boundary where the error is captured; the formatter consumes the
/// result uniformly.
#[derive(Debug, Clone)]
pub struct ExceptionInfo {
    /// Display name: symbolic name for domain errors, type name otherwise.
    pub name: String,
    /// Human message; absent or blank means the header carries none.
    pub message: Option<String>,
    /// Extra named fields, serialized under `error_data` when non-empty.
    pub data: BTreeMap<String, ErrorField>,
    /// Traceback frames, outermost first.
    pub frames: Vec<TraceFrame>,
}

impl ExceptionInfo {
    /// Capture a framework error with its symbolic name and extra data.
    pub fn from_domain(err: &dyn DomainError, frames: Vec<TraceFrame>) -> Self {
        ExceptionInfo {
            name: err.symbolic_name().to_string(),
            message: err.message().map(str::to_string),
            data: err.error_data(),
            frames,
        }
    }

    /// Capture a generic error under its short type name, with its
    /// string rendering as the message and no extra data.
    pub fn from_error<E: Error>(err: &E, frames: Vec<TraceFrame>) -> Self {
        let full = std::any::type_name::<E>();
        let name = full.rsplit("::").next().unwrap_or(full);
        let message = err.to_string();
        ExceptionInfo {
            name: name.to_string(),
            message: if message.is_empty() { None } else { Some(message) },
            data: BTreeMap::new(),
            frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct NotRegistered {
        id: Identity,
    }

    impl fmt::Display for NotRegistered {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "object not registered")
        }
    }

    impl Error for NotRegistered {}

    impl DomainError for NotRegistered {
        fn symbolic_name(&self) -> &str {
            "NotRegisteredException"
        }

        fn error_data(&self) -> BTreeMap<String, ErrorField> {
            BTreeMap::from([("id".to_string(), ErrorField::Identity(self.id.clone()))])
        }
    }

    #[test]
    fn domain_capture_uses_symbolic_name() {
        let err = NotRegistered { id: Identity::new("adapter", "a1") };
        let info = ExceptionInfo::from_domain(&err, Vec::new());
        assert_eq!(info.name, "NotRegisteredException");
        assert_eq!(info.message, None);
        assert_eq!(info.data["id"].to_plain(), json!("adapter/a1"));
    }

    #[test]
    fn generic_capture_uses_short_type_name() {
        let err = std::fmt::Error;
        let info = ExceptionInfo::from_error(&err, Vec::new());
        assert_eq!(info.name, "Error");
        assert!(info.message.is_some());
        assert!(info.data.is_empty());
    }

    #[test]
    fn frame_renders_traceback_style() {
        let frame = TraceFrame::new("svc.rs", 10, "handle").with_source("let x = go()?;");
        assert_eq!(
            frame.to_string(),
            "File \"svc.rs\", line 10, in handle\n  let x = go()?;"
        );
    }
}
