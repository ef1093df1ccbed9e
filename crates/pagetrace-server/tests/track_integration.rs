use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pagetrace_core::config::Config;
use pagetrace_duckdb::DuckDbBackend;
use pagetrace_server::app::build_app;
use pagetrace_server::auth::password::hash_password;
use pagetrace_server::state::AppState;

/// Build a test Config with sensible defaults for integration tests.
fn test_config() -> Config {
    Config {
        port: 0,
        data_dir: "/tmp/pagetrace-test".to_string(),
        admin_email: "admin@example.com".to_string(),
        admin_password_hash: hash_password("a-long-test-passphrase").expect("hash"),
        https: false,
        session_days: 7,
        duckdb_memory_limit: "1GB".to_string(),
    }
}

/// Create a fresh in-memory backend + state + app for each test.
fn setup() -> (Arc<AppState>, axum::Router) {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    let state = Arc::new(AppState::new(db, test_config()));
    let app = build_app(Arc::clone(&state));
    (state, app)
}

/// Helper: send a POST /track with the given body and client address.
fn track_request(body: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/track")
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .header("user-agent", "Mozilla/5.0 Chrome/120")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn home_request(ip: &str, referrer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("GET")
        .uri("/")
        .header("x-forwarded-for", ip)
        .header("user-agent", "Mozilla/5.0 Chrome/120");
    if let Some(r) = referrer {
        builder = builder.header("referer", r);
    }
    builder.body(Body::empty()).expect("build request")
}

/// Helper: extract JSON body from response.
async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

async fn count(state: &AppState, table: &str) -> i64 {
    let conn = state.db.conn_for_test().await;
    let mut stmt = conn
        .prepare(&format!("SELECT COUNT(*) FROM {table}"))
        .expect("prepare count query");
    stmt.query_row([], |row| row.get(0)).expect("count rows")
}

// ============================================================
// Landing page tracks visitors
// ============================================================
#[tokio::test]
async fn test_home_creates_visitor_once_per_address() {
    let (state, app) = setup();

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(home_request("1.2.3.4", None))
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(count(&state, "visitors").await, 1);

    // A different address gets its own row.
    let response = app
        .oneshot(home_request("5.6.7.8", None))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(count(&state, "visitors").await, 2);
}

#[tokio::test]
async fn test_home_attributes_source_from_referrer() {
    let (state, app) = setup();

    let response = app
        .oneshot(home_request("1.2.3.4", Some("https://www.instagram.com/p/abc/")))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let conn = state.db.conn_for_test().await;
    let source: String = conn
        .prepare("SELECT source FROM visitors")
        .expect("prepare")
        .query_row([], |row| row.get(0))
        .expect("query");
    assert_eq!(source, "instagram");
}

#[tokio::test]
async fn test_home_never_stores_plaintext_address() {
    let (state, app) = setup();

    let response = app
        .oneshot(home_request("203.0.113.9", None))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let conn = state.db.conn_for_test().await;
    let ip_hash: String = conn
        .prepare("SELECT ip_hash FROM visitors")
        .expect("prepare")
        .query_row([], |row| row.get(0))
        .expect("query");
    assert_ne!(ip_hash, "203.0.113.9");
    assert_eq!(ip_hash.len(), 16);
    assert!(ip_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

// ============================================================
// Click tracking
// ============================================================
#[tokio::test]
async fn test_track_fresh_address_creates_visitor_and_click() {
    let (state, app) = setup();

    let response = app
        .oneshot(track_request(&json!({"plan": "plan_99"}).to_string(), "1.2.3.4"))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["plan"], "plan_99");
    assert!(body["visitor_id"].as_str().is_some_and(|v| v.starts_with('V')));

    assert_eq!(count(&state, "visitors").await, 1);
    assert_eq!(count(&state, "clicks").await, 1);
}

#[tokio::test]
async fn test_track_known_address_reuses_visitor_id() {
    let (state, app) = setup();

    app.clone()
        .oneshot(home_request("1.2.3.4", None))
        .await
        .expect("home request");

    let response = app
        .oneshot(track_request(&json!({"plan": "plan_149"}).to_string(), "1.2.3.4"))
        .await
        .expect("track request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Click tracked successfully");

    assert_eq!(count(&state, "visitors").await, 1);
    assert_eq!(count(&state, "clicks").await, 1);
}

#[tokio::test]
async fn test_track_empty_body_is_client_error_and_writes_nothing() {
    let (state, app) = setup();

    let response = app
        .oneshot(track_request("", "1.2.3.4"))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "validation_error");

    assert_eq!(count(&state, "visitors").await, 0);
    assert_eq!(count(&state, "clicks").await, 0);
}

#[tokio::test]
async fn test_track_malformed_body_is_client_error() {
    let (state, app) = setup();

    let response = app
        .oneshot(track_request("not json", "1.2.3.4"))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&state, "clicks").await, 0);
}

#[tokio::test]
async fn test_track_missing_plan_defaults_to_unknown() {
    let (state, app) = setup();

    let response = app
        .oneshot(track_request("{}", "1.2.3.4"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["plan"], "unknown");

    let conn = state.db.conn_for_test().await;
    let plan: String = conn
        .prepare("SELECT plan FROM clicks")
        .expect("prepare")
        .query_row([], |row| row.get(0))
        .expect("query");
    assert_eq!(plan, "unknown");
}

// ============================================================
// Placeholders and health
// ============================================================
#[tokio::test]
async fn test_coming_soon_is_static() {
    let (_state, app) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/coming-soon")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_ok() {
    let (_state, app) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}
