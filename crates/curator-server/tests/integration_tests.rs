//! Integration tests for the Curator HTTP service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use curator_analyzer::{BatchScan, Reviewer};
use curator_domain::traits::ArticleStore;
use curator_domain::{Article, NewArticle};
use curator_engine::{Engine, Report};
use curator_llm::MockProvider;
use curator_server::config::ServerConfig;
use curator_server::build_state;
use curator_server::handlers::{
    create_router, AnalyzeResponse, AppState, HealthCheckResponse, SaveArticleResponse, SharedProvider,
};
use curator_store::SqliteStore;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // for oneshot

const HASHING_GOOD: &str = "Use bcrypt, argon2, scrypt and secure hashing";
const HASHING_BAD: &str = "md5 or sha1 or a plain text password will do";

/// Helper to create test application state
fn create_test_state(reviewer: Option<MockProvider>) -> AppState {
    let reviewer = reviewer.map(|mock| {
        let provider: SharedProvider = Arc::new(mock);
        Arc::new(Reviewer::new(provider))
    });

    AppState {
        store: Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap())),
        engine: Arc::new(Engine::default()),
        reviewer,
        max_articles: 3,
    }
}

fn seed(state: &AppState, articles: &[(&str, &str)]) -> Vec<Article> {
    let mut store = state.store.lock().unwrap();
    articles
        .iter()
        .map(|(title, content)| {
            store
                .save_article(NewArticle {
                    title: title.to_string(),
                    content: content.to_string(),
                    author: None,
                    version: None,
                })
                .unwrap()
        })
        .collect()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let state = create_test_state(None);
    seed(&state, &[("a", "b")]);
    let app = create_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.article_count, 1);
    assert!(!health.llm_enabled);
}

#[tokio::test]
async fn test_save_and_list_articles() {
    let state = create_test_state(None);
    let app = create_router(state.clone());

    let (status, body) = send(
        app.clone(),
        post_json(
            "/articles",
            json!({
                "title": "Hashing",
                "content": HASHING_GOOD,
                "analysis": {"version_info": {"latest_version": "v3.2"}}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let saved: SaveArticleResponse = serde_json::from_slice(&body).unwrap();
    assert!(saved.success);

    let request = Request::builder()
        .uri("/articles")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    let articles: Vec<Article> = serde_json::from_slice(&body).unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, saved.article_id);
    assert_eq!(articles[0].version.as_deref(), Some("v3.2"));

    // The client-side analysis was kept
    let analyses = state.store.lock().unwrap().list_analyses(&saved.article_id).unwrap();
    assert_eq!(analyses.len(), 1);
}

#[tokio::test]
async fn test_save_article_requires_title_and_content() {
    let app = create_router(create_test_state(None));
    let (status, body) = send(app, post_json("/articles", json!({"title": "only a title"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "Title and content are required");
}

#[tokio::test]
async fn test_detect_conflicts_from_store() {
    let state = create_test_state(None);
    seed(&state, &[("good", HASHING_GOOD), ("bad", HASHING_BAD)]);
    let app = create_router(state);

    let (status, body) = send(app, post_empty("/detect-conflicts")).await;
    assert_eq!(status, StatusCode::OK);

    let report: Report = serde_json::from_slice(&body).unwrap();
    assert_eq!(report.summary.total_articles, 2);
    assert!(report
        .conflicts
        .iter()
        .any(|c| c.conflict_category == "password_hashing"));
    assert_eq!(report.deprecated_articles.len(), 1);
}

#[tokio::test]
async fn test_detect_conflicts_with_too_few_articles() {
    let state = create_test_state(None);
    seed(&state, &[("lonely", HASHING_GOOD)]);
    let app = create_router(state);

    let (status, body) = send(app, post_empty("/detect-conflicts")).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["message"], "Need at least 2 articles to detect conflicts");
    assert_eq!(value["conflicts"], json!([]));
}

#[tokio::test]
async fn test_detect_conflicts_from_body() {
    let app = create_router(create_test_state(None));
    let body = json!({
        "articles": [
            {"id": 1, "title": "good", "content": HASHING_GOOD, "created_at": 1_700_000_000},
            {"id": 2, "title": "bad", "content": HASHING_BAD, "created_at": 1_700_000_000},
        ]
    });

    let (status, body) = send(app, post_json("/detect-conflicts", body)).await;
    assert_eq!(status, StatusCode::OK);
    let report: Report = serde_json::from_slice(&body).unwrap();
    let hashing = report
        .conflicts
        .iter()
        .find(|c| c.conflict_category == "password_hashing")
        .unwrap();
    assert_eq!(hashing.article1.id.as_str(), "1");
    assert_eq!(hashing.article2.id.as_str(), "2");
}

#[tokio::test]
async fn test_detect_conflicts_rejects_malformed_articles() {
    let app = create_router(create_test_state(None));
    let body = json!({"articles": [{"id": 1, "title": "no content", "created_at": 0}]});

    let (status, _) = send(app, post_json("/detect-conflicts", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detect_conflicts_enforces_cap() {
    let app = create_router(create_test_state(None));
    let articles: Vec<Value> = (0..4)
        .map(|i| json!({"id": i, "content": "x", "created_at": 0}))
        .collect();

    let (status, _) = send(app, post_json("/detect-conflicts", json!({"articles": articles}))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_analyze_all_without_articles() {
    let app = create_router(create_test_state(None));
    let (status, body) = send(app, post_empty("/analyze-all")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "No articles found to analyze");
}

#[tokio::test]
async fn test_analyze_all_from_body() {
    let app = create_router(create_test_state(None));
    let body = json!({
        "articles": [
            {"title": "legacy", "content": "Serve the API over http://example.com"},
            {"content": "Everything uses TLS"}
        ]
    });

    let (status, body) = send(app, post_json("/analyze-all", body)).await;
    assert_eq!(status, StatusCode::OK);
    let batch: BatchScan = serde_json::from_slice(&body).unwrap();
    assert_eq!(batch.total_articles, 2);
    assert_eq!(batch.articles_with_issues, 1);
    assert_eq!(batch.analyses[1].title, "Untitled");
}

#[tokio::test]
async fn test_analyze_without_llm() {
    let app = create_router(create_test_state(None));
    let (status, _) = send(app, post_json("/analyze", json!({"content": "hello"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_analyze_stored_article() {
    let state = create_test_state(Some(MockProvider::new(
        r#"{"score": 0.2, "summary": "Outdated hashing advice"}"#,
    )));
    let saved = seed(&state, &[("bad", HASHING_BAD)]);
    let app = create_router(state.clone());

    let (status, body) = send(
        app,
        post_json("/analyze", json!({"article_id": saved[0].id.as_str()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: AnalyzeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.parsed.unwrap().summary, "Outdated hashing advice");
    assert_eq!(response.article_id.as_ref(), Some(&saved[0].id));

    let analyses = state.store.lock().unwrap().list_analyses(&saved[0].id).unwrap();
    assert_eq!(analyses.len(), 1);
    assert_eq!(analyses[0].analysis_data["parsed"]["score"], 0.2);
}

#[tokio::test]
async fn test_analyze_unknown_article() {
    let app = create_router(create_test_state(Some(MockProvider::default())));
    let (status, _) = send(app, post_json("/analyze", json!({"article_id": "nope"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_headers_and_preflight() {
    let app = create_router(create_test_state(None));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/detect-conflicts")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let response = app.oneshot(post_empty("/analyze-all")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn test_state_from_config_file_with_custom_lexicon() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon_path = dir.path().join("lexicon.toml");
    std::fs::write(
        &lexicon_path,
        r#"
[[categories]]
category = "transfer"
positive = ["sftp", "scp", "rsync over ssh"]
negative = ["ftp", "telnet", "rcp", "netcat", "smb1"]

[[deprecated]]
feature = "telnet"
deprecated_date = "2015-01-01"
reason = "Cleartext remote shell"
"#,
    )
    .unwrap();

    let config_path = dir.path().join("server.toml");
    std::fs::write(
        &config_path,
        format!(
            "bind_address = \"127.0.0.1\"\nbind_port = 0\ndatabase_path = \"{}\"\nlexicon_path = \"{}\"\n",
            dir.path().join("kb.db").display(),
            lexicon_path.display()
        ),
    )
    .unwrap();

    let config = ServerConfig::from_file(&config_path).unwrap();
    let app = create_router(build_state(&config).unwrap());

    let body = json!({
        "articles": [
            {"id": "a", "content": "Copy files with sftp, scp or rsync over ssh", "created_at": 1_700_000_000},
            {"id": "b", "content": "ftp, telnet, rcp, netcat and smb1 are fine", "created_at": 1_700_000_000},
        ]
    });
    let (status, body) = send(app, post_json("/detect-conflicts", body)).await;
    assert_eq!(status, StatusCode::OK);

    let report: Report = serde_json::from_slice(&body).unwrap();
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].conflict_category, "transfer");
    assert_eq!(report.deprecated_articles.len(), 1);
    assert_eq!(report.deprecated_articles[0].id.as_str(), "b");
}
