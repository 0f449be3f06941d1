//! Runtime configuration.
//!
//! # Responsibility
//! - Load settings from the process environment (and `.env` when present).
//! - Build the analyzer variant selected by configuration.
//!
//! # Invariants
//! - A missing API key is only an error when the live analyzer is selected.
//! - The API key is never included in `Debug` output or logs.

use crate::analyzer::{Analyzer, AnalyzerError, FixedResponseAnalyzer, LiveAnalyzer};
use crate::analyzer::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::logging::default_log_level;
use crate::parser::ResponseContract;
use log::info;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_MODEL: &str = "COPILOT_MODEL";
pub const ENV_API_BASE: &str = "COPILOT_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "COPILOT_TIMEOUT_SECS";
pub const ENV_DB_PATH: &str = "COPILOT_DB_PATH";
pub const ENV_CONTRACT: &str = "COPILOT_CONTRACT";
pub const ENV_MOCK_RESPONSE_FILE: &str = "COPILOT_MOCK_RESPONSE_FILE";
pub const ENV_LOG_LEVEL: &str = "COPILOT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "COPILOT_LOG_DIR";

pub const DEFAULT_DB_FILE_NAME: &str = "history.db";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Startup configuration failure. Fatal for the session.
#[derive(Debug)]
pub enum ConfigError {
    MissingApiKey,
    InvalidValue { key: &'static str, message: String },
    MockResponseRead { path: PathBuf, source: std::io::Error },
    Analyzer(AnalyzerError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(
                f,
                "{ENV_API_KEY} is not set; export it or use a mock response file"
            ),
            Self::InvalidValue { key, message } => write!(f, "invalid {key}: {message}"),
            Self::MockResponseRead { path, source } => write!(
                f,
                "failed to read mock response file `{}`: {source}",
                path.display()
            ),
            Self::Analyzer(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MockResponseRead { source, .. } => Some(source),
            Self::Analyzer(err) => Some(err),
            Self::MissingApiKey | Self::InvalidValue { .. } => None,
        }
    }
}

/// Resolved copilot settings.
#[derive(Clone)]
pub struct CopilotConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
    pub db_path: PathBuf,
    pub contract: ResponseContract,
    /// When set, replies are read from this file instead of calling the API.
    pub mock_response_file: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Debug for CopilotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopilotConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("db_path", &self.db_path)
            .field("contract", &self.contract)
            .field("mock_response_file", &self.mock_response_file)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            contract: ResponseContract::default(),
            mock_response_file: None,
            log_level: default_log_level().to_string(),
            log_dir: default_log_dir(),
        }
    }
}

impl CopilotConfig {
    /// Loads `.env` (if present) and reads settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    ///
    /// # Errors
    /// - `InvalidValue` for an unknown contract, a non-numeric timeout or a
    ///   relative log directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        config.api_key = get(ENV_API_KEY);
        if let Some(model) = get(ENV_MODEL) {
            config.model = model;
        }
        if let Some(api_base) = get(ENV_API_BASE) {
            config.api_base = api_base;
        }
        if let Some(timeout) = get(ENV_TIMEOUT_SECS) {
            let secs = timeout
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS,
                    message: format!("expected a positive number of seconds, got `{timeout}`"),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(db_path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(contract) = get(ENV_CONTRACT) {
            config.contract = contract
                .parse()
                .map_err(|message| ConfigError::InvalidValue {
                    key: ENV_CONTRACT,
                    message,
                })?;
        }
        config.mock_response_file = get(ENV_MOCK_RESPONSE_FILE).map(PathBuf::from);
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(log_dir) = get(ENV_LOG_DIR) {
            let path = PathBuf::from(&log_dir);
            if !path.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    message: format!("must be an absolute path, got `{log_dir}`"),
                });
            }
            config.log_dir = path;
        }

        Ok(config)
    }

    /// Builds the analyzer selected by this configuration.
    ///
    /// A mock response file selects [`FixedResponseAnalyzer`]; otherwise the
    /// live Gemini client is used and `GOOGLE_API_KEY` is required.
    pub fn build_analyzer(&self) -> Result<Box<dyn Analyzer>, ConfigError> {
        if let Some(path) = &self.mock_response_file {
            let reply = read_mock_response(path)?;
            info!("event=analyzer_select module=config status=ok kind=fixed");
            return Ok(Box::new(FixedResponseAnalyzer::new(reply)));
        }

        let api_key = self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)?;
        let analyzer = LiveAnalyzer::new(api_key, self.model.as_str(), self.timeout)
            .map_err(ConfigError::Analyzer)?
            .with_base_url(self.api_base.as_str());
        info!(
            "event=analyzer_select module=config status=ok kind=live model={}",
            self.model
        );
        Ok(Box::new(analyzer))
    }
}

fn read_mock_response(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::MockResponseRead {
        path: path.to_path_buf(),
        source,
    })
}

fn default_log_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::env::temp_dir())
        .join(DEFAULT_LOG_DIR_NAME)
}
