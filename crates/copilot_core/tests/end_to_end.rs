use copilot_core::{
    Analyzer, AnalyzerError, AnalysisError, AnalysisService, AnalysisStore, DashboardState,
    FixedResponseAnalyzer, LiveAnalyzer, ResponseContract, Task,
};
use std::time::Duration;

const SHIP_FRIDAY_REPLY: &str =
    r#"{"summary": "Ship Friday.", "action_items": ["Alice writes docs."]}"#;

#[test]
fn fixed_reply_updates_dashboard_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = AnalysisStore::new(dir.path().join("history.db"));
    store.ensure_schema().unwrap();
    let service = AnalysisService::new(
        FixedResponseAnalyzer::new(format!("```json\n{SHIP_FRIDAY_REPLY}\n```")),
        store.clone(),
        ResponseContract::Json,
    );
    let mut state = DashboardState::new();

    let id = service
        .analyze(&mut state, "We agreed to ship Friday. Alice will write docs.")
        .unwrap();

    assert_eq!(state.summary(), "Ship Friday.");
    assert_eq!(state.tasks().to_vec(), vec![Task::new("Alice writes docs.")]);

    let history = store.get_all().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, id);
    assert_eq!(history[0].summary, "Ship Friday.");
    assert_eq!(history[0].tasks, state.tasks());
}

#[test]
fn failed_request_keeps_previous_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let store = AnalysisStore::new(dir.path().join("history.db"));
    let mut state = DashboardState::new();

    AnalysisService::new(
        FixedResponseAnalyzer::new(SHIP_FRIDAY_REPLY),
        store.clone(),
        ResponseContract::Json,
    )
    .analyze(&mut state, "notes")
    .unwrap();
    let before = state.clone();

    let err = AnalysisService::new(
        FixedResponseAnalyzer::new("{\"summary\": \"broken\""),
        store.clone(),
        ResponseContract::Json,
    )
    .analyze(&mut state, "more notes")
    .unwrap_err();

    assert!(matches!(err, AnalysisError::Format(_)));
    assert_eq!(state, before);
    assert_eq!(store.get_all().unwrap().len(), 1);
}

#[test]
fn live_analyzer_posts_prompt_and_returns_first_text_part() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1beta/models/test-model:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .match_body(mockito::Matcher::Regex("Alice will write docs".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": SHIP_FRIDAY_REPLY}]}
                }]
            })
            .to_string(),
        )
        .create();

    let analyzer = LiveAnalyzer::new("test-key", "test-model", Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.url());
    let dir = tempfile::tempdir().unwrap();
    let store = AnalysisStore::new(dir.path().join("history.db"));
    let service = AnalysisService::new(analyzer, store, ResponseContract::Json);
    let mut state = DashboardState::new();

    service
        .analyze(&mut state, "We agreed to ship Friday. Alice will write docs.")
        .unwrap();

    mock.assert();
    assert_eq!(state.summary(), "Ship Friday.");
    assert_eq!(state.tasks().len(), 1);
}

#[test]
fn live_analyzer_maps_error_status_to_upstream_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1beta/models/test-model:generateContent")
        .with_status(403)
        .with_body("API key not valid")
        .create();

    let analyzer = LiveAnalyzer::new("bad-key", "test-model", Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.url());

    let err = analyzer.analyze("prompt").unwrap_err();
    match err {
        AnalyzerError::Status { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "API key not valid");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn live_analyzer_without_candidates_is_empty_reply() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1beta/models/test-model:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates": []}"#)
        .create();

    let analyzer = LiveAnalyzer::new("key", "test-model", Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.url());

    assert!(matches!(
        analyzer.analyze("prompt"),
        Err(AnalyzerError::EmptyReply)
    ));
}
