//! Plain-text rendering of dashboard and history views.

use copilot_core::{AnalysisRecord, DashboardState};

const EMPTY_DASHBOARD_HINT: &str =
    "Nothing analyzed yet. Use `analyze <text>` to get started.";
const EMPTY_HISTORY: &str = "No past analyses found.";
const PROGRESS_BAR_WIDTH: usize = 20;

/// Summary, numbered checklist and progress line.
pub fn dashboard(state: &DashboardState) -> String {
    if state.is_empty() {
        return format!("{EMPTY_DASHBOARD_HINT}\n");
    }

    let mut out = format!("Summary\n{}\n\nAction Items\n", state.summary());
    if state.tasks().is_empty() {
        out.push_str("  (none)\n");
    }
    for (index, task) in state.tasks().iter().enumerate() {
        let mark = if task.done { "[x]" } else { "[ ]" };
        out.push_str(&format!("{:>3}. {mark} {}\n", index + 1, task.text));
    }

    let progress = state.progress();
    if progress.total() > 0 {
        let filled = progress.done * PROGRESS_BAR_WIDTH / progress.total();
        out.push_str(&format!(
            "\nProgress [{}{}] {}% ({} done, {} to do)\n",
            "#".repeat(filled),
            "-".repeat(PROGRESS_BAR_WIDTH - filled),
            progress.percent_done(),
            progress.done,
            progress.todo
        ));
    }
    out
}

/// History list, newest first.
pub fn history(records: &[AnalysisRecord]) -> String {
    if records.is_empty() {
        return format!("{EMPTY_HISTORY}\n");
    }

    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "Analysis from {}\n  Summary: {}\n  Action Items:\n",
            record.created_at_label(),
            record.summary
        ));
        for task in &record.tasks {
            out.push_str(&format!("  - {}\n", task.text));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{dashboard, history};
    use chrono::NaiveDate;
    use copilot_core::{AnalysisRecord, DashboardState, ParsedResponse, Task};

    fn record(summary: &str, tasks: Vec<Task>) -> AnalysisRecord {
        AnalysisRecord {
            id: 1,
            created_at: NaiveDate::from_ymd_opt(2026, 3, 4)
                .and_then(|date| date.and_hms_opt(5, 6, 7))
                .unwrap(),
            summary: summary.to_string(),
            tasks,
        }
    }

    #[test]
    fn empty_dashboard_shows_hint() {
        assert!(dashboard(&DashboardState::new()).contains("Nothing analyzed yet"));
    }

    #[test]
    fn dashboard_numbers_tasks_and_shows_progress() {
        let mut state = DashboardState::new();
        state.replace(ParsedResponse {
            summary: "Ship Friday.".to_string(),
            tasks: vec![Task::new("Write docs"), Task::new("Test")],
        });
        state.toggle(0);

        let out = dashboard(&state);
        assert!(out.contains("  1. [x] Write docs\n"));
        assert!(out.contains("  2. [ ] Test\n"));
        assert!(out.contains("50% (1 done, 1 to do)"));
    }

    #[test]
    fn history_lists_timestamp_summary_and_items() {
        let out = history(&[record("Weekly sync", vec![Task::new("Book room")])]);
        assert!(out.starts_with("Analysis from 2026-03-04 05:06\n"));
        assert!(out.contains("  Summary: Weekly sync\n"));
        assert!(out.contains("  - Book room\n"));
    }

    #[test]
    fn empty_history_has_message() {
        assert_eq!(history(&[]), "No past analyses found.\n");
    }
}
