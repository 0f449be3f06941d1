//! Analysis repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Append analyses to the `analyses` table.
//! - Read the full history back, newest first.
//!
//! # Invariants
//! - `tasks` is stored as a JSON array of `{"task", "done"}` objects.
//! - One insert is one statement; a row is either fully written or absent.
//! - History order is `created_at DESC, id DESC`.

use crate::db::DbError;
use crate::model::analysis::{AnalysisId, AnalysisRecord, Task};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ANALYSIS_SELECT_SQL: &str = "SELECT
    id,
    created_at,
    summary,
    tasks
FROM analyses";

const CREATED_AT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for analysis persistence and history reads.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Task list could not be encoded or decoded as JSON.
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "task list serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted analysis data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Repository interface for the append-only analysis history.
pub trait AnalysisRepository {
    fn insert_analysis(&self, summary: &str, tasks: &[Task]) -> RepoResult<AnalysisId>;
    fn list_analyses(&self) -> RepoResult<Vec<AnalysisRecord>>;
}

/// SQLite-backed analysis repository over a borrowed connection.
pub struct SqliteAnalysisRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAnalysisRepository<'conn> {
    /// Wraps a connection that already has the schema applied
    /// (see [`crate::db::open_db`]).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AnalysisRepository for SqliteAnalysisRepository<'_> {
    fn insert_analysis(&self, summary: &str, tasks: &[Task]) -> RepoResult<AnalysisId> {
        let tasks_json = serde_json::to_string(tasks)?;

        self.conn.execute(
            "INSERT INTO analyses (summary, tasks) VALUES (?1, ?2);",
            params![summary, tasks_json],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_analyses(&self) -> RepoResult<Vec<AnalysisRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ANALYSIS_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_analysis_row(row)?);
        }

        Ok(records)
    }
}

fn parse_analysis_row(row: &Row<'_>) -> RepoResult<AnalysisRecord> {
    let id: AnalysisId = row.get("id")?;

    let created_at_text: Option<String> = row.get("created_at")?;
    let created_at = created_at_text
        .as_deref()
        .and_then(parse_created_at)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid created_at value `{}` in analyses row {id}",
                created_at_text.as_deref().unwrap_or("NULL")
            ))
        })?;

    let tasks_text: String = row.get("tasks")?;
    let tasks: Vec<Task> = serde_json::from_str(&tasks_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid tasks JSON in analyses row {id}: {err}"))
    })?;

    Ok(AnalysisRecord {
        id,
        created_at,
        summary: row.get("summary")?,
        tasks,
    })
}

fn parse_created_at(value: &str) -> Option<NaiveDateTime> {
    CREATED_AT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
}
