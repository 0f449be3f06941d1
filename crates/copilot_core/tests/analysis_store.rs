use copilot_core::db::open_db_in_memory;
use copilot_core::{
    AnalysisRepository, AnalysisStore, DashboardState, ParsedResponse, RepoError,
    SqliteAnalysisRepository, Task,
};
use rusqlite::Connection;

fn temp_store() -> (tempfile::TempDir, AnalysisStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = AnalysisStore::new(dir.path().join("history.db"));
    store.ensure_schema().unwrap();
    (dir, store)
}

#[test]
fn empty_history_is_an_empty_list() {
    let (_dir, store) = temp_store();
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn ensure_schema_is_idempotent_on_disk() {
    let (_dir, store) = temp_store();
    store.ensure_schema().unwrap();
    store.ensure_schema().unwrap();
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn insert_then_get_all_roundtrips_summary_and_tasks() {
    let (_dir, store) = temp_store();
    let mut tasks = vec![Task::new("Alice writes docs."), Task::new("Bob reviews.")];
    tasks[1].done = true;

    let id = store.insert("Ship Friday.", &tasks).unwrap();

    let records = store.get_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].summary, "Ship Friday.");
    assert_eq!(records[0].tasks, tasks);
}

#[test]
fn tasks_column_uses_task_done_json_objects() {
    let (dir, store) = temp_store();
    store
        .insert("s", &[Task::new("write \"docs\""), Task::new("ship")])
        .unwrap();

    let conn = Connection::open(dir.path().join("history.db")).unwrap();
    let raw: String = conn
        .query_row("SELECT tasks FROM analyses;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(
        raw,
        r#"[{"task":"write \"docs\"","done":false},{"task":"ship","done":false}]"#
    );

    let records = store.get_all().unwrap();
    assert_eq!(records[0].tasks_json().unwrap(), raw);
}

#[test]
fn repeated_inserts_are_listed_newest_first() {
    let (_dir, store) = temp_store();
    let ids: Vec<i64> = (0..5)
        .map(|index| store.insert(&format!("summary {index}"), &[]).unwrap())
        .collect();

    let records = store.get_all().unwrap();
    assert_eq!(records.len(), 5);
    let listed: Vec<i64> = records.iter().map(|record| record.id).collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);
    assert_eq!(records[0].summary, "summary 4");
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn created_at_order_wins_over_insert_order() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO analyses (created_at, summary, tasks) VALUES ('2026-01-02 00:00:00', 'newer', '[]');
         INSERT INTO analyses (created_at, summary, tasks) VALUES ('2026-01-01 00:00:00', 'older', '[]');",
    )
    .unwrap();

    let records = SqliteAnalysisRepository::new(&conn).list_analyses().unwrap();
    let summaries: Vec<&str> = records.iter().map(|record| record.summary.as_str()).collect();
    assert_eq!(summaries, ["newer", "older"]);
}

#[test]
fn toggling_dashboard_does_not_alter_history() {
    let (_dir, store) = temp_store();
    let mut state = DashboardState::new();
    state.replace(ParsedResponse {
        summary: "Ship Friday.".to_string(),
        tasks: vec![Task::new("Alice writes docs.")],
    });
    store.insert(state.summary(), state.tasks()).unwrap();

    assert_eq!(state.toggle(0), Some(true));

    let records = store.get_all().unwrap();
    assert!(!records[0].tasks[0].done);
    assert!(state.tasks()[0].done);
}

#[test]
fn undecodable_tasks_json_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO analyses (summary, tasks) VALUES ('s', 'not json');",
        [],
    )
    .unwrap();

    let err = SqliteAnalysisRepository::new(&conn)
        .list_analyses()
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("tasks JSON")));
}

#[test]
fn unreadable_store_path_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = AnalysisStore::new(dir.path().join("missing").join("history.db"));

    let err = store.insert("s", &[]).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}
