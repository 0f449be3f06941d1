//! Language-model collaborator abstraction.
//!
//! # Responsibility
//! - Hide how a prompt becomes a raw reply (live HTTP call or fixed text).
//! - Build contract-specific prompts from user notes.
//!
//! # Invariants
//! - Analyzers never retry; one prompt is one upstream call.
//! - Prompt and reply text are never written to logs.

mod gemini;
mod prompt;

pub use gemini::{LiveAnalyzer, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use prompt::build_prompt;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Failure while obtaining a reply from the collaborator.
#[derive(Debug)]
pub enum AnalyzerError {
    /// HTTP client could not be constructed.
    Client(reqwest::Error),
    /// Request failed before a response arrived (connect, timeout).
    Transport(reqwest::Error),
    /// Upstream answered with a non-success status.
    Status { status: u16, body: String },
    /// Response body did not match the expected envelope.
    InvalidResponse(String),
    /// Upstream answered without any text candidate.
    EmptyReply,
}

impl Display for AnalyzerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client(err) => write!(f, "failed to create HTTP client: {err}"),
            Self::Transport(err) if err.is_timeout() => {
                write!(f, "language model request timed out")
            }
            Self::Transport(err) => write!(f, "language model request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "language model returned status {status}: {body}")
            }
            Self::InvalidResponse(message) => {
                write!(f, "unexpected language model response: {message}")
            }
            Self::EmptyReply => write!(f, "language model returned an empty reply"),
        }
    }
}

impl Error for AnalyzerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Client(err) | Self::Transport(err) => Some(err),
            Self::Status { .. } | Self::InvalidResponse(_) | Self::EmptyReply => None,
        }
    }
}

/// Capability that turns a prompt into raw reply text.
pub trait Analyzer {
    fn analyze(&self, prompt: &str) -> AnalyzerResult<String>;

    /// Short label for diagnostics (`live`, `fixed`).
    fn kind(&self) -> &'static str;
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, prompt: &str) -> AnalyzerResult<String> {
        (**self).analyze(prompt)
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

/// Returns a canned reply regardless of the prompt.
///
/// Offline/demo mode and deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedResponseAnalyzer {
    reply: String,
}

impl FixedResponseAnalyzer {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Analyzer for FixedResponseAnalyzer {
    fn analyze(&self, _prompt: &str) -> AnalyzerResult<String> {
        Ok(self.reply.clone())
    }

    fn kind(&self) -> &'static str {
        "fixed"
    }
}
