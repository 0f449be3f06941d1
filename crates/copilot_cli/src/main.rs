//! `copilot` command-line front end.
//!
//! # Responsibility
//! - Resolve configuration, start logging and wire the core service.
//! - Render results and failures as terminal text.

mod render;
mod session;

use clap::{Parser, Subcommand};
use copilot_core::{
    init_logging, AnalysisError, AnalysisService, AnalysisStore, ConfigError, CopilotConfig,
    DashboardState, ResponseContract,
};
use log::error;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "copilot",
    version,
    about = "Turn free-text notes into a summary and checklist"
)]
struct Cli {
    /// SQLite history file (overrides COPILOT_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Reply contract: json or heading (overrides COPILOT_CONTRACT).
    #[arg(long, global = true)]
    contract: Option<ResponseContract>,
    /// Use the reply stored in FILE instead of calling the API.
    #[arg(long, global = true, value_name = "FILE")]
    mock_response: Option<PathBuf>,
    /// trace|debug|info|warn|error (overrides COPILOT_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze notes once; reads stdin when neither TEXT nor --file is given.
    Analyze {
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// List past analyses, newest first.
    History,
    /// Start an interactive session (default).
    Session,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => return fatal(err),
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: file logging disabled: {err}");
    }

    let store = AnalysisStore::new(config.db_path.clone());
    if let Err(err) = store.ensure_schema() {
        eprintln!("Error: {}", AnalysisError::Storage(err).user_message());
    }

    match cli.command.unwrap_or(Command::Session) {
        Command::History => match store.get_all() {
            Ok(records) => {
                print!("{}", render::history(&records));
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("Error: {}", AnalysisError::Storage(err).user_message());
                ExitCode::FAILURE
            }
        },
        Command::Analyze { text, file } => {
            let analyzer = match config.build_analyzer() {
                Ok(analyzer) => analyzer,
                Err(err) => return fatal(err),
            };
            let input = match read_input(text, file) {
                Ok(input) => input,
                Err(err) => {
                    eprintln!("Error: failed to read input: {err}");
                    return ExitCode::FAILURE;
                }
            };
            let service = AnalysisService::new(analyzer, store, config.contract);
            let mut state = DashboardState::new();
            match service.analyze(&mut state, &input) {
                Ok(_) => {
                    print!("{}", render::dashboard(&state));
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    let mut stderr = io::stderr();
                    let _ = session::report(&mut stderr, &err);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Session => {
            let analyzer = match config.build_analyzer() {
                Ok(analyzer) => analyzer,
                Err(err) => return fatal(err),
            };
            let service = AnalysisService::new(analyzer, store, config.contract);
            let mut state = DashboardState::new();
            let stdin = io::stdin();
            match session::run(&service, &mut state, stdin.lock(), io::stdout()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    error!("event=session module=cli status=error error={err}");
                    eprintln!("Error: terminal I/O failed: {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<CopilotConfig, ConfigError> {
    let mut config = CopilotConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(contract) = cli.contract {
        config.contract = contract;
    }
    if let Some(mock_response) = &cli.mock_response {
        config.mock_response_file = Some(mock_response.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> io::Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(path),
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn fatal(err: ConfigError) -> ExitCode {
    let err = AnalysisError::from(err);
    error!("event=startup module=cli status=error fatal={} error={err}", err.is_fatal());
    eprintln!("Error: {}", err.user_message());
    ExitCode::from(2)
}
