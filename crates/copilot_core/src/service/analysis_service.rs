//! Analysis request handler.
//!
//! # Responsibility
//! - Run one analysis: validate input, call the analyzer, parse the reply,
//!   persist it and publish it to the dashboard state.
//! - Classify every failure into the copilot error taxonomy.
//!
//! # Invariants
//! - Blank input never reaches the analyzer or the store.
//! - The dashboard is only replaced after the record has been persisted, so
//!   a failed request leaves it unchanged.
//! - Persisted tasks are a snapshot; later toggles do not reach history.

use crate::analyzer::{build_prompt, Analyzer, AnalyzerError};
use crate::config::ConfigError;
use crate::model::analysis::{AnalysisId, AnalysisRecord};
use crate::parser::{ParseError, ResponseContract, ResponseParser};
use crate::repo::analysis_repo::{AnalysisRepository, RepoError};
use crate::service::dashboard::DashboardState;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failure taxonomy for copilot requests.
#[derive(Debug)]
pub enum AnalysisError {
    /// Startup configuration is unusable. The only fatal variant.
    Configuration(ConfigError),
    /// User submitted no text.
    EmptyInput,
    /// Collaborator call failed or timed out.
    Upstream(AnalyzerError),
    /// Reply matched neither the expected contract nor its shape.
    Format(ParseError),
    /// History store failed to open, write or read.
    Storage(RepoError),
}

impl AnalysisError {
    /// Whether the interactive session must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Corrective message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(err) => format!("Configuration error: {err}"),
            Self::EmptyInput => "Please enter some text to analyze.".to_string(),
            Self::Upstream(err) => format!("An error occurred: {err}"),
            Self::Format(ParseError::NoJsonObject) => {
                "The AI did not return a valid JSON response. Please try again.".to_string()
            }
            Self::Format(ParseError::MissingHeading(heading)) => format!(
                "The AI response did not contain a `{heading}` section. Please try again."
            ),
            Self::Format(ParseError::Malformed(_)) => {
                "Failed to decode the AI's response. The format was invalid.".to_string()
            }
            Self::Storage(err) => format!("History storage failed: {err}"),
        }
    }
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "configuration error: {err}"),
            Self::EmptyInput => write!(f, "input text is empty"),
            Self::Upstream(err) => write!(f, "upstream error: {err}"),
            Self::Format(err) => write!(f, "format error: {err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for AnalysisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::EmptyInput => None,
            Self::Upstream(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value)
    }
}

impl From<AnalyzerError> for AnalysisError {
    fn from(value: AnalyzerError) -> Self {
        Self::Upstream(value)
    }
}

impl From<ParseError> for AnalysisError {
    fn from(value: ParseError) -> Self {
        Self::Format(value)
    }
}

impl From<RepoError> for AnalysisError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Use-case service wiring analyzer, parser and history repository.
pub struct AnalysisService<A: Analyzer, R: AnalysisRepository> {
    analyzer: A,
    repo: R,
    parser: ResponseParser,
}

impl<A: Analyzer, R: AnalysisRepository> AnalysisService<A, R> {
    pub fn new(analyzer: A, repo: R, contract: ResponseContract) -> Self {
        Self {
            analyzer,
            repo,
            parser: ResponseParser::new(contract),
        }
    }

    pub fn contract(&self) -> ResponseContract {
        self.parser.contract()
    }

    /// Analyzes `input`, persists the result and publishes it to `state`.
    ///
    /// # Errors
    /// - `EmptyInput` for blank input (no analyzer or store call).
    /// - `Upstream`, `Format`, `Storage` for the failing stage; `state` is
    ///   left untouched in every error case.
    pub fn analyze(
        &self,
        state: &mut DashboardState,
        input: &str,
    ) -> AnalysisResult<AnalysisId> {
        if input.trim().is_empty() {
            warn!("event=analysis module=service status=rejected reason=empty_input");
            return Err(AnalysisError::EmptyInput);
        }

        let prompt = build_prompt(self.parser.contract(), input);
        let reply = self.analyzer.analyze(&prompt)?;

        let parsed = self.parser.parse_reply(&reply).map_err(|err| {
            warn!(
                "event=analysis module=service status=error stage=parse contract={} not_found={}",
                self.parser.contract(),
                err.is_not_found()
            );
            err
        })?;

        let analysis_id = self.repo.insert_analysis(&parsed.summary, &parsed.tasks)?;
        info!(
            "event=analysis module=service status=ok analyzer={} contract={} analysis_id={} task_count={}",
            self.analyzer.kind(),
            self.parser.contract(),
            analysis_id,
            parsed.tasks.len()
        );

        state.replace(parsed);
        Ok(analysis_id)
    }

    /// Returns all persisted analyses, newest first.
    pub fn history(&self) -> AnalysisResult<Vec<AnalysisRecord>> {
        Ok(self.repo.list_analyses()?)
    }
}
