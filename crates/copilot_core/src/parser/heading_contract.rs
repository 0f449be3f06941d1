//! Heading-delimited reply contract.
//!
//! Expected shape:
//!
//! ```text
//! ## Summary
//! prose...
//! ## Action Items
//! - first
//! - second
//! ```
//!
//! Text after a colon on a heading line (`## Summary: Ship Friday.`) belongs
//! to that section. Code-fence lines around the reply are ignored.

use super::{ParseError, ParseResult, ParsedResponse};
use crate::model::analysis::Task;
use once_cell::sync::Lazy;
use regex::Regex;

/// Heading that opens the summary section.
pub const SUMMARY_HEADING: &str = "## Summary";
/// Heading that opens the action item list.
pub const ACTION_ITEMS_HEADING: &str = "## Action Items";

static SUMMARY_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*##[ \t]*Summary(?:[ \t]*:|[ \t\r]*$)")
        .expect("valid summary heading regex")
});
static ACTION_ITEMS_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*##[ \t]*Action Items(?:[ \t]*:|[ \t\r]*$)")
        .expect("valid action items heading regex")
});

/// Parses a heading-delimited reply.
///
/// Summary is the trimmed text between `## Summary` and `## Action Items`
/// (or end of text). Each non-empty line after `## Action Items` becomes one
/// not-done task with leading hyphens and spaces removed.
///
/// A heading matches when it is alone on its line or followed by a colon;
/// `## Summary of the call` is not a heading. Lines made of a code fence
/// (three backticks plus an optional language tag) are skipped.
///
/// # Errors
/// - `ParseError::MissingHeading` when no `## Summary` line exists.
pub fn parse_headings(reply: &str) -> ParseResult<ParsedResponse> {
    let summary_heading = SUMMARY_HEADING_RE
        .find(reply)
        .ok_or(ParseError::MissingHeading(SUMMARY_HEADING))?;
    let after_summary = &reply[summary_heading.end()..];

    let (summary, items) = match ACTION_ITEMS_HEADING_RE.find(after_summary) {
        Some(heading) => (
            &after_summary[..heading.start()],
            Some(&after_summary[heading.end()..]),
        ),
        None => (after_summary, None),
    };

    let tasks = items
        .map(|block| {
            block
                .lines()
                .filter(|line| !is_code_fence(line))
                .map(|line| line.trim().trim_start_matches(['-', ' ']).trim_end())
                .filter(|line| !line.is_empty())
                .map(Task::new)
                .collect()
        })
        .unwrap_or_default();

    let summary = summary
        .lines()
        .filter(|line| !is_code_fence(line))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(ParsedResponse {
        summary: summary.trim().to_string(),
        tasks,
    })
}

fn is_code_fence(line: &str) -> bool {
    line.trim()
        .strip_prefix("```")
        .is_some_and(|tag| tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '`'))
}
