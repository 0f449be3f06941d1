//! Model reply parsing.
//!
//! # Responsibility
//! - Turn an unstructured model reply into a summary plus ordered tasks.
//! - Support the JSON-object contract and the heading-delimited contract
//!   behind one parser selected by configuration.
//!
//! # Invariants
//! - Parsing is pure: no I/O, no logging of reply content.
//! - Every extracted task starts with `done = false`.
//! - Failures distinguish "nothing structured found" from "found but malformed".

mod heading_contract;
mod json_contract;

pub use heading_contract::{parse_headings, ACTION_ITEMS_HEADING, SUMMARY_HEADING};
pub use json_contract::{extract, parse, DEFAULT_SUMMARY};

use crate::model::analysis::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type ParseResult<T> = Result<T, ParseError>;

/// Expected syntactic shape of the collaborator's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseContract {
    /// Single JSON object with `summary` and `action_items`.
    #[default]
    Json,
    /// `## Summary` / `## Action Items` markdown sections.
    Heading,
}

impl ResponseContract {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Heading => "heading",
        }
    }
}

impl Display for ResponseContract {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseContract {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "heading" | "headings" | "markdown" => Ok(Self::Heading),
            other => Err(format!(
                "unsupported response contract `{other}`; expected json|heading"
            )),
        }
    }
}

/// Structured content extracted from one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub summary: String,
    pub tasks: Vec<Task>,
}

/// Reply did not match the selected contract.
#[derive(Debug)]
pub enum ParseError {
    /// No `{ ... }` span exists in the reply.
    NoJsonObject,
    /// A required markdown heading is absent.
    MissingHeading(&'static str),
    /// A JSON span was found but could not be decoded.
    Malformed(serde_json::Error),
}

impl ParseError {
    /// Returns `true` when no structured content was found at all.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoJsonObject | Self::MissingHeading(_))
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoJsonObject => write!(f, "model reply does not contain a JSON object"),
            Self::MissingHeading(heading) => {
                write!(f, "model reply is missing the `{heading}` heading")
            }
            Self::Malformed(err) => write!(f, "model reply JSON is malformed: {err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::NoJsonObject | Self::MissingHeading(_) => None,
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

/// Contract-polymorphic reply parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    contract: ResponseContract,
}

impl ResponseParser {
    pub fn new(contract: ResponseContract) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> ResponseContract {
        self.contract
    }

    /// Parses one raw model reply under the configured contract.
    ///
    /// # Errors
    /// - `NoJsonObject` / `MissingHeading` when nothing structured is found.
    /// - `Malformed` when the JSON span cannot be decoded.
    pub fn parse_reply(&self, reply: &str) -> ParseResult<ParsedResponse> {
        match self.contract {
            ResponseContract::Json => {
                let raw = extract(reply).ok_or(ParseError::NoJsonObject)?;
                parse(raw)
            }
            ResponseContract::Heading => parse_headings(reply),
        }
    }
}
