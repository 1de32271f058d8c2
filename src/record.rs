use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::exception::ExceptionInfo;
use crate::identity::Identity;

/// Per-request context attached by the service framework when logging
/// happens inside a request-handling scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub request_id: String,
    pub operation: String,
    pub identity: Identity,
}

impl RequestMetadata {
    pub fn new(
        request_id: impl Into<String>,
        operation: impl Into<String>,
        identity: Identity,
    ) -> Self {
        RequestMetadata {
            request_id: request_id.into(),
            operation: operation.into(),
            identity,
        }
    }
}

/// One logging event, as handed to the formatter by the surrounding
/// logging framework.
///
/// `message` is a printf-style template rendered against `args`. The
/// formatter treats the record as read-only except for the one-time
/// rendered-exception cache.
#[derive(Debug)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub target: String,
    pub message: String,
    pub args: Vec<serde_json::Value>,
    /// Free-form structured metadata attached to this call.
    pub context: BTreeMap<String, serde_json::Value>,
    /// Present when the log line was emitted inside a request scope.
    pub request: Option<RequestMetadata>,
    pub exception: Option<ExceptionInfo>,
    /// Caller-requested capture of the current call stack, pre-rendered.
    pub stack: Option<String>,
    exc_text: OnceLock<String>,
}

impl LogRecord {
    pub fn new(
        level: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LogRecord {
            timestamp: Utc::now(),
            level: level.into(),
            target: target.into(),
            message: message.into(),
            args: Vec::new(),
            context: BTreeMap::new(),
            request: None,
            exception: None,
            stack: None,
            exc_text: OnceLock::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<serde_json::Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_context(mut self, context: BTreeMap<String, serde_json::Value>) -> Self {
        self.context = context;
        self
    }

    pub fn with_request(mut self, request: RequestMetadata) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Rendered exception text from an earlier `format` call, if any.
    ///
    /// The cache is written at most once per record. If the same record
    /// is formatted from several threads at once, every writer computes
    /// the same text and the first write wins.
    pub fn cached_exception_text(&self) -> Option<&str> {
        self.exc_text.get().map(String::as_str)
    }

    pub(crate) fn cache_exception_text(&self, text: String) -> &str {
        self.exc_text.get_or_init(|| text)
    }
}

impl Clone for LogRecord {
    fn clone(&self) -> Self {
        let exc_text = OnceLock::new();
        if let Some(text) = self.exc_text.get() {
            let _ = exc_text.set(text.clone());
        }
        LogRecord {
            timestamp: self.timestamp,
            level: self.level.clone(),
            target: self.target.clone(),
            message: self.message.clone(),
            args: self.args.clone(),
            context: self.context.clone(),
            request: self.request.clone(),
            exception: self.exception.clone(),
            stack: self.stack.clone(),
            exc_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_populates_fields() {
        let record = LogRecord::new("ERROR", "app::svc", "boom")
            .with_context(BTreeMap::from([("a".to_string(), serde_json::json!(1))]))
            .with_stack("Stack (most recent call last):");
        assert_eq!(record.level, "ERROR");
        assert_eq!(record.context["a"], serde_json::json!(1));
        assert!(record.stack.is_some());
        assert!(record.cached_exception_text().is_none());
    }

    #[test]
    fn clone_carries_cached_exception_text() {
        let record = LogRecord::new("ERROR", "app", "x");
        record.cache_exception_text("Error: Boom".to_string());
        let copy = record.clone();
        assert_eq!(copy.cached_exception_text(), Some("Error: Boom"));
    }
}
