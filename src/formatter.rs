use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::FormatError;
use crate::exception::ExceptionInfo;
use crate::indent::indentation;
use crate::record::{LogRecord, RequestMetadata};
use crate::template::render_message;

/// Default line format: the rendered message and nothing else.
pub const DEFAULT_LINE_FORMAT: &str = "%(message)s";

/// Default `asctime` rendering, a chrono format string.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a [`LogRecord`] into an indented YAML-flavored text block:
/// the message line, then a 2-space-indented YAML block of request
/// metadata and context (if any), then an indented exception block
/// (if one is attached), then an indented stack capture (if requested).
///
/// The formatter is an immutable configuration value; `format` is a
/// pure function of the record and this configuration. Distinct records
/// may be formatted concurrently. Formatting the *same* record from
/// several threads is safe but the exception-text cache makes the first
/// rendering win (see [`LogRecord::cached_exception_text`]).
#[derive(Debug, Clone)]
pub struct YamlFormatter {
    line_format: String,
    date_format: String,
}

impl Default for YamlFormatter {
    fn default() -> Self {
        YamlFormatter {
            line_format: DEFAULT_LINE_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl YamlFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same configuration surface as a standard line formatter: a line
    /// template (`%(message)s`, `%(levelname)s`, `%(name)s`,
    /// `%(asctime)s`) and a chrono date format for `asctime`.
    pub fn with_templates(
        line_format: impl Into<String>,
        date_format: impl Into<String>,
    ) -> Self {
        YamlFormatter {
            line_format: line_format.into(),
            date_format: date_format.into(),
        }
    }

    /// Format `record` as one text block.
    ///
    /// Template/argument mismatches and YAML serialization failures
    /// propagate; an absent exception or empty context simply produces
    /// no section.
    pub fn format(&self, record: &LogRecord) -> Result<String, FormatError> {
        let message = render_message(&record.message, &record.args)?;
        let mut s = self.render_line(record, &message)?;

        let info = info_map(record);
        if !info.is_empty() {
            let yaml = serde_yaml_ng::to_string(&info)?;
            s.push('\n');
            s.push_str(&indentation(&yaml, 2));
        }

        let exc_text = match record.cached_exception_text() {
            Some(text) => Some(text.to_string()),
            None => match &record.exception {
                Some(exception) => {
                    let text = self.format_exception(exception)?;
                    Some(record.cache_exception_text(text).to_string())
                }
                None => None,
            },
        };

        if let Some(text) = exc_text {
            if !text.is_empty() {
                if !s.ends_with('\n') {
                    s.push('\n');
                }
                s.push_str(&indentation(&text, 2));
            }
        }

        if let Some(stack) = &record.stack {
            if !s.ends_with('\n') {
                s.push('\n');
            }
            s.push_str(&indentation(stack, 2));
        }

        Ok(s)
    }

    /// Render one captured exception:
    ///
    /// ```text
    /// Error: <name>: <message>
    ///   error_data:
    ///     <fields>
    ///   stack_trace:
    ///     <frames>
    /// ```
    ///
    /// The `error_data` block is omitted when the exception carries no
    /// extra fields; the `stack_trace:` line is always present.
    pub fn format_exception(&self, exception: &ExceptionInfo) -> Result<String, FormatError> {
        let mut header = format!("Error: {}", exception.name);
        if let Some(message) = exception.message.as_deref().filter(|m| !m.is_empty()) {
            header.push_str(": ");
            header.push_str(message);
        }

        let data = if exception.data.is_empty() {
            String::new()
        } else {
            // Identity values are normalized at the top level only.
            let plain: BTreeMap<&str, Value> = exception
                .data
                .iter()
                .map(|(key, field)| (key.as_str(), field.to_plain()))
                .collect();
            let wrapped = BTreeMap::from([("error_data", plain)]);
            indentation(&serde_yaml_ng::to_string(&wrapped)?, 2)
        };

        let frames = exception
            .frames
            .iter()
            .map(|frame| frame.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "{header}\n{data}{}{}",
            indentation("stack_trace:\n", 2),
            indentation(&frames, 4)
        ))
    }

    fn render_line(&self, record: &LogRecord, message: &str) -> Result<String, FormatError> {
        let mut out = String::with_capacity(self.line_format.len() + message.len());
        let mut rest = self.line_format.as_str();

        while let Some(pos) = rest.find("%(") {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 2..];
            let end = after.find(")s").ok_or_else(|| {
                FormatError::Template(format!("unterminated field in {:?}", self.line_format))
            })?;
            match &after[..end] {
                "message" => out.push_str(message),
                "levelname" => out.push_str(&record.level),
                "name" => out.push_str(&record.target),
                "asctime" => {
                    out.push_str(&record.timestamp.format(&self.date_format).to_string())
                }
                other => return Err(FormatError::UnknownField(other.to_string())),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Build the info map serialized after the message line: request
/// metadata keys plus the caller context nested under `context`.
/// Context alone is enough to produce a map.
fn info_map(record: &LogRecord) -> BTreeMap<String, Value> {
    let mut info = match &record.request {
        Some(request) => request_info(request),
        None => BTreeMap::new(),
    };
    if !record.context.is_empty() {
        let entries: serde_json::Map<String, Value> = record
            .context
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        info.insert("context".to_string(), Value::Object(entries));
    }
    info
}

fn request_info(request: &RequestMetadata) -> BTreeMap<String, Value> {
    BTreeMap::from([
        (
            "iceRequestId".to_string(),
            Value::String(request.request_id.clone()),
        ),
        (
            "iceOperation".to_string(),
            Value::String(request.operation.clone()),
        ),
        (
            "iceIdentity".to_string(),
            Value::String(request.identity.to_string()),
        ),
    ])
}
