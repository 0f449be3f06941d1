//! Interactive single-user session.
//!
//! # Responsibility
//! - Parse line commands and dispatch them against one `DashboardState`.
//! - Turn every per-request failure into a printed message.
//!
//! # Invariants
//! - Only configuration errors end the loop early; everything else is
//!   reported and the session continues.

use crate::render;
use copilot_core::{
    AnalysisError, AnalysisRepository, AnalysisService, Analyzer, DashboardState,
    EXPORT_FILE_NAME,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Line that ends a multi-line `analyze` block.
const BLOCK_TERMINATOR: &str = ".";

const HELP: &str = "Commands:
  analyze <text>   analyze one line of notes and replace the checklist
  analyze          paste multi-line notes, end with a line containing only `.`
  toggle <n>       flip action item n (1-based)
  show             print summary, checklist and progress
  export [path]    write the checklist as Markdown (default analysis_results.md)
  history          list past analyses, newest first
  help             show this help
  quit             leave the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Analyze(String),
    /// Bare `analyze`: the notes follow on the next lines.
    AnalyzeBlock,
    Toggle(usize),
    Show,
    Export(Option<PathBuf>),
    History,
    Help,
    Quit,
    Empty,
}

/// Parses one input line. Errors carry a user-facing message.
pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Ok(SessionCommand::Empty),
        "analyze" | "a" if rest.is_empty() => Ok(SessionCommand::AnalyzeBlock),
        "analyze" | "a" => Ok(SessionCommand::Analyze(rest.to_string())),
        "toggle" | "t" => rest
            .parse::<usize>()
            .ok()
            .filter(|number| *number > 0)
            .map(|number| SessionCommand::Toggle(number - 1))
            .ok_or_else(|| format!("toggle expects an item number, got `{rest}`")),
        "show" | "s" => Ok(SessionCommand::Show),
        "export" | "e" => Ok(SessionCommand::Export(
            (!rest.is_empty()).then(|| PathBuf::from(rest)),
        )),
        "history" | "h" => Ok(SessionCommand::History),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

/// Runs the read-eval-print loop until `quit` or end of input.
pub fn run<A, R>(
    service: &AnalysisService<A, R>,
    state: &mut DashboardState,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()>
where
    A: Analyzer,
    R: AnalysisRepository,
{
    writeln!(
        output,
        "Productivity copilot ({} contract). Type `help` for commands.",
        service.contract()
    )?;
    write!(output, "> ")?;
    output.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next() {
        let line = line?;
        match parse_command(&line) {
            Ok(SessionCommand::Quit) => break,
            Ok(SessionCommand::AnalyzeBlock) => {
                writeln!(
                    output,
                    "Paste your notes; finish with a line containing only `{BLOCK_TERMINATOR}`."
                )?;
                output.flush()?;
                let notes = read_block(&mut lines)?;
                execute(service, state, SessionCommand::Analyze(notes), &mut output)?;
            }
            Ok(command) => execute(service, state, command, &mut output)?,
            Err(message) => writeln!(output, "{message}")?,
        }
        write!(output, "> ")?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(())
}

/// Collects lines up to the terminator line or end of input.
fn read_block(lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<String> {
    let mut block = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim() == BLOCK_TERMINATOR {
            break;
        }
        block.push(line);
    }
    Ok(block.join("\n"))
}

fn execute<A, R>(
    service: &AnalysisService<A, R>,
    state: &mut DashboardState,
    command: SessionCommand,
    output: &mut impl Write,
) -> io::Result<()>
where
    A: Analyzer,
    R: AnalysisRepository,
{
    match command {
        SessionCommand::Analyze(text) => match service.analyze(state, &text) {
            Ok(_) => {
                writeln!(output, "Analysis complete and saved to history!\n")?;
                write!(output, "{}", render::dashboard(state))?;
            }
            Err(err) => report(output, &err)?,
        },
        SessionCommand::Toggle(index) => match state.toggle(index) {
            Some(done) => {
                let task = &state.tasks()[index];
                let mark = if done { "[x]" } else { "[ ]" };
                writeln!(output, "{mark} {}", task.text)?;
            }
            None => writeln!(output, "No action item #{}.", index + 1)?,
        },
        SessionCommand::Show => write!(output, "{}", render::dashboard(state))?,
        SessionCommand::Export(path) => {
            if state.tasks().is_empty() {
                writeln!(output, "Nothing to export yet.")?;
            } else {
                let path = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
                match std::fs::write(&path, state.to_markdown()) {
                    Ok(()) => {
                        info!("event=export module=cli status=ok");
                        writeln!(output, "Exported to {}", path.display())?;
                    }
                    Err(err) => {
                        warn!("event=export module=cli status=error error={err}");
                        writeln!(output, "Export failed: {err}")?;
                    }
                }
            }
        }
        SessionCommand::History => match service.history() {
            Ok(records) => write!(output, "{}", render::history(&records))?,
            Err(err) => report(output, &err)?,
        },
        SessionCommand::Help => write!(output, "{HELP}")?,
        SessionCommand::Empty | SessionCommand::Quit | SessionCommand::AnalyzeBlock => {}
    }
    Ok(())
}

/// Prints the corrective message for a failed request.
pub fn report(output: &mut impl Write, err: &AnalysisError) -> io::Result<()> {
    match err {
        AnalysisError::EmptyInput => writeln!(output, "Warning: {}", err.user_message()),
        _ => writeln!(output, "Error: {}", err.user_message()),
    }
}
