//! Path-bound analysis store with per-operation connections.
//!
//! # Responsibility
//! - Provide `ensure_schema`, `insert` and `get_all` over a history file.
//! - Scope one connection to one operation.
//!
//! # Invariants
//! - Each call opens, uses and drops its own connection, including on error.
//! - Every connection is schema-checked before use.

use crate::db::open_db;
use crate::model::analysis::{AnalysisId, AnalysisRecord, Task};
use crate::repo::analysis_repo::{
    AnalysisRepository, RepoError, RepoResult, SqliteAnalysisRepository,
};
use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;

/// Durable append-only analysis log backed by one SQLite file.
#[derive(Debug, Clone)]
pub struct AnalysisStore {
    path: PathBuf,
}

impl AnalysisStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the history table when missing. Idempotent.
    pub fn ensure_schema(&self) -> RepoResult<()> {
        self.with_repo("ensure_schema", |_| Ok(()))
    }

    /// Appends one analysis and returns its row id.
    pub fn insert(&self, summary: &str, tasks: &[Task]) -> RepoResult<AnalysisId> {
        self.with_repo("insert", |repo| repo.insert_analysis(summary, tasks))
    }

    /// Returns the full history, newest first.
    pub fn get_all(&self) -> RepoResult<Vec<AnalysisRecord>> {
        self.with_repo("get_all", |repo| repo.list_analyses())
    }

    fn with_repo<T>(
        &self,
        operation: &'static str,
        run: impl FnOnce(&SqliteAnalysisRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let result = open_db(&self.path)
            .map_err(RepoError::from)
            .and_then(|conn| run(&SqliteAnalysisRepository::new(&conn)));

        match &result {
            Ok(_) => info!(
                "event=store_{} module=repo status=ok duration_ms={}",
                operation,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_{} module=repo status=error duration_ms={} error={}",
                operation,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }
}

impl AnalysisRepository for AnalysisStore {
    fn insert_analysis(&self, summary: &str, tasks: &[Task]) -> RepoResult<AnalysisId> {
        self.insert(summary, tasks)
    }

    fn list_analyses(&self) -> RepoResult<Vec<AnalysisRecord>> {
        self.get_all()
    }
}
