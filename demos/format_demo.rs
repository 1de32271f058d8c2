use std::collections::BTreeMap;

use serde_json::json;
use yaml_log_format::exception::{ExceptionInfo, TraceFrame};
use yaml_log_format::formatter::YamlFormatter;
use yaml_log_format::identity::Identity;
use yaml_log_format::record::{LogRecord, RequestMetadata};

#[derive(Debug)]
struct LookupFailed;

impl std::fmt::Display for LookupFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no such object")
    }
}

impl std::error::Error for LookupFailed {}

fn main() {
    let formatter = YamlFormatter::new();

    let plain = LogRecord::new("INFO", "demo", "serving %s on port %d")
        .with_args(vec![json!("api"), json!(8080)]);
    println!("{}\n", formatter.format(&plain).expect("format plain record"));

    let frames = vec![
        TraceFrame::new("server.rs", 120, "dispatch").with_source("registry.lookup(&id)?;"),
        TraceFrame::new("registry.rs", 44, "lookup").with_source("return Err(LookupFailed);"),
    ];
    let rich = LogRecord::new("ERROR", "demo", "request failed")
        .with_request(RequestMetadata::new(
            "7f3a",
            "getQuote",
            Identity::new("quotes", "eu-1"),
        ))
        .with_context(BTreeMap::from([
            ("attempt".to_string(), json!(3)),
            ("peer".to_string(), json!("10.0.0.7")),
        ]))
        .with_exception(ExceptionInfo::from_error(&LookupFailed, frames));
    println!("{}", formatter.format(&rich).expect("format rich record"));
}
