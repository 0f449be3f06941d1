use copilot_core::db::migrations::{ensure_schema, latest_version};
use copilot_core::db::{open_db, open_db_in_memory, DbError};
use copilot_core::{AnalysisRepository, SqliteAnalysisRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(table_count(&conn, "analyses"), 1);
}

#[test]
fn ensure_schema_twice_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();

    ensure_schema(&mut conn).unwrap();
    ensure_schema(&mut conn).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(table_count(&conn, "analyses"), 1);
}

#[test]
fn opening_same_database_twice_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");

    let conn_first = open_db(&path).unwrap();
    SqliteAnalysisRepository::new(&conn_first)
        .insert_analysis("kept", &[])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let records = SqliteAnalysisRepository::new(&conn_second)
        .list_analyses()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].summary, "kept");
}

#[test]
fn unversioned_history_file_is_adopted_without_data_loss() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");

    let legacy = Connection::open(&path).unwrap();
    legacy
        .execute_batch(
            "CREATE TABLE IF NOT EXISTS analyses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                summary TEXT NOT NULL,
                tasks TEXT NOT NULL
            );
            INSERT INTO analyses (created_at, summary, tasks)
            VALUES ('2025-06-01 09:30:00', 'Legacy summary', '[{\"task\": \"Old item\", \"done\": false}]');",
        )
        .unwrap();
    drop(legacy);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let records = SqliteAnalysisRepository::new(&conn).list_analyses().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].summary, "Legacy summary");
    assert_eq!(records[0].tasks[0].text, "Old item");
    assert_eq!(records[0].created_at_label(), "2025-06-01 09:30");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_count(conn: &Connection, table_name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [table_name],
        |row| row.get(0),
    )
    .unwrap()
}
