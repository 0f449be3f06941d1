//! Core logic for the productivity copilot.
//! This crate is the single source of truth for parsing, history and
//! dashboard behavior; front ends only render and collect input.

pub mod analyzer;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod parser;
pub mod repo;
pub mod service;

pub use analyzer::{
    build_prompt, Analyzer, AnalyzerError, AnalyzerResult, FixedResponseAnalyzer, LiveAnalyzer,
};
pub use config::{ConfigError, CopilotConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::analysis::{AnalysisId, AnalysisRecord, Task};
pub use parser::{ParseError, ParsedResponse, ResponseContract, ResponseParser};
pub use repo::analysis_repo::{
    AnalysisRepository, RepoError, RepoResult, SqliteAnalysisRepository,
};
pub use repo::analysis_store::AnalysisStore;
pub use service::analysis_service::{AnalysisError, AnalysisResult, AnalysisService};
pub use service::dashboard::{DashboardState, TaskProgress, EXPORT_FILE_NAME};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
