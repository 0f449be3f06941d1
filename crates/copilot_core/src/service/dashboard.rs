//! Single-session dashboard state.
//!
//! # Responsibility
//! - Hold the current summary and checklist for one interactive session.
//! - Provide progress counts and the Markdown export of the checklist.
//!
//! # Invariants
//! - State is owned by the request handler; there is no process-wide copy.
//! - Toggling a task never touches persisted history.

use crate::model::analysis::Task;
use crate::parser::{ParsedResponse, ACTION_ITEMS_HEADING, SUMMARY_HEADING};

/// Title line of the Markdown export.
pub const EXPORT_TITLE: &str = "# AI Analysis Results";
/// Default file name for saved exports.
pub const EXPORT_FILE_NAME: &str = "analysis_results.md";

/// Done/to-do counts for the current checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskProgress {
    pub done: usize,
    pub todo: usize,
}

impl TaskProgress {
    pub fn total(&self) -> usize {
        self.done + self.todo
    }

    /// Completed share in percent, `0` for an empty checklist.
    pub fn percent_done(&self) -> u8 {
        if self.total() == 0 {
            return 0;
        }
        ((self.done * 100) / self.total()) as u8
    }
}

/// Current summary plus mutable checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    summary: String,
    tasks: Vec<Task>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns `true` until the first successful analysis.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.tasks.is_empty()
    }

    /// Replaces summary and checklist with a freshly parsed reply.
    pub fn replace(&mut self, parsed: ParsedResponse) {
        self.summary = parsed.summary;
        self.tasks = parsed.tasks;
    }

    /// Flips the `done` flag of the task at `index` (0-based).
    ///
    /// Returns the new flag, or `None` when `index` is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        self.tasks.get_mut(index).map(Task::toggle)
    }

    pub fn progress(&self) -> TaskProgress {
        let done = self.tasks.iter().filter(|task| task.done).count();
        TaskProgress {
            done,
            todo: self.tasks.len() - done,
        }
    }

    /// Renders the checklist as a Markdown document.
    pub fn to_markdown(&self) -> String {
        let mut export = format!(
            "{EXPORT_TITLE}\n\n{SUMMARY_HEADING}\n{}\n\n{ACTION_ITEMS_HEADING}\n",
            self.summary
        );
        for task in &self.tasks {
            let status = if task.done { "[x]" } else { "[ ]" };
            export.push_str(&format!("- {status} {}\n", task.text));
        }
        export
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardState, TaskProgress};
    use crate::model::analysis::Task;
    use crate::parser::ParsedResponse;

    fn sample_state() -> DashboardState {
        let mut state = DashboardState::new();
        state.replace(ParsedResponse {
            summary: "Ship Friday.".to_string(),
            tasks: vec![Task::new("Alice writes docs."), Task::new("Bob tests.")],
        });
        state
    }

    #[test]
    fn new_state_is_empty() {
        let state = DashboardState::new();
        assert!(state.is_empty());
        assert_eq!(state.progress(), TaskProgress::default());
        assert_eq!(state.progress().percent_done(), 0);
    }

    #[test]
    fn toggle_flips_one_task_and_rejects_out_of_range() {
        let mut state = sample_state();
        assert_eq!(state.toggle(1), Some(true));
        assert!(!state.tasks()[0].done);
        assert!(state.tasks()[1].done);
        assert_eq!(state.toggle(2), None);
        assert_eq!(state.progress(), TaskProgress { done: 1, todo: 1 });
        assert_eq!(state.progress().percent_done(), 50);
    }

    #[test]
    fn markdown_export_uses_checkbox_items() {
        let mut state = sample_state();
        state.toggle(0);
        assert_eq!(
            state.to_markdown(),
            "# AI Analysis Results\n\n## Summary\nShip Friday.\n\n## Action Items\n\
             - [x] Alice writes docs.\n- [ ] Bob tests.\n"
        );
    }
}
