//! JSON-object reply contract.
//!
//! The model is asked for a single object
//! `{"summary": "...", "action_items": ["...", ...]}` but may wrap it in
//! code fences or chatter, so the outermost `{ ... }` span is extracted first.

use super::{ParseResult, ParsedResponse};
use crate::model::analysis::Task;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Summary used when the reply object has no `summary` value.
pub const DEFAULT_SUMMARY: &str = "No summary provided.";

static JSON_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid json object regex"));

#[derive(Debug, Deserialize)]
struct JsonReply {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    action_items: Option<Vec<String>>,
}

/// Returns the span from the first `{` to the last `}` (inclusive).
///
/// Returns `None` when the reply has no `{`, or no `}` after it.
pub fn extract(reply: &str) -> Option<&str> {
    JSON_OBJECT_RE.find(reply).map(|found| found.as_str())
}

/// Decodes an extracted JSON span into summary and not-done tasks.
///
/// # Errors
/// - `ParseError::Malformed` when the span is not valid JSON or a field has
///   an unexpected type.
pub fn parse(raw_json: &str) -> ParseResult<ParsedResponse> {
    let reply: JsonReply = serde_json::from_str(raw_json)?;

    Ok(ParsedResponse {
        summary: reply
            .summary
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        tasks: reply
            .action_items
            .unwrap_or_default()
            .into_iter()
            .map(Task::new)
            .collect(),
    })
}
