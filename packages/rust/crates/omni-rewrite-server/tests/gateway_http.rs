//! HTTP gateway integration tests: /query contract, health, static routes.
//! Each test builds the router over a temp data root; no listener is bound.

use std::fs;

use axum::body::Body;
use axum::body::to_bytes;
use axum::http::{Request, StatusCode};
use omni_rewrite::{QueryConfig, RewriteEngine};
use omni_rewrite_server::{GatewayOptions, router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

fn engine(dir: &TempDir) -> RewriteEngine {
    RewriteEngine::new(QueryConfig {
        data_root: dir.path().to_path_buf(),
        ..QueryConfig::default()
    })
    .expect("engine")
}

fn post_query(body: &Value) -> Request<Body> {
    Request::post("/query")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn query_previews_matching_lines() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "foo\nbar foo\nbaz\n").unwrap();
    let app = router(engine(&dir), GatewayOptions::default());

    let response = app
        .oneshot(post_query(&json!({
            "Directory": ".",
            "FileSuffixes": [],
            "MatchContent": "foo",
            "ReplaceContent": "qux",
            "Commit": false
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "Files": [{
                "Path": "a.txt",
                "Lines": [
                    {"Line": 0, "Text": "foo", "Rewritten": "qux"},
                    {"Line": 1, "Text": "bar foo", "Rewritten": "bar qux"}
                ]
            }]
        })
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("a.txt")).unwrap(),
        "foo\nbar foo\nbaz\n"
    );
}

#[tokio::test]
async fn query_commit_writes_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "foo\nbar foo\nbaz\n").unwrap();
    let app = router(engine(&dir), GatewayOptions::default());

    let response = app
        .oneshot(post_query(&json!({
            "Directory": ".",
            "MatchContent": "foo",
            "ReplaceContent": "qux",
            "Commit": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert!(payload.get("Error").is_none());
    assert_eq!(
        fs::read_to_string(dir.path().join("a.txt")).unwrap(),
        "qux\nbar qux\nbaz\n"
    );
}

#[tokio::test]
async fn query_reports_invalid_pattern_in_body() {
    let dir = TempDir::new().unwrap();
    let app = router(engine(&dir), GatewayOptions::default());

    let response = app
        .oneshot(post_query(&json!({
            "Directory": ".",
            "MatchContent": "(",
            "Commit": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"Error": "invalid pattern", "Files": []})
    );
}

#[tokio::test]
async fn query_rejects_non_json_body() {
    let dir = TempDir::new().unwrap();
    let app = router(engine(&dir), GatewayOptions::default());

    let response = app
        .oneshot(
            Request::post("/query")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_accepts_json_sent_as_form_encoded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "foo\n").unwrap();
    let app = router(engine(&dir), GatewayOptions::default());
    let body = json!({
        "Directory": ".",
        "FileSuffixes": [".txt"],
        "MatchContent": "foo",
        "ReplaceContent": "bar",
        "Commit": false
    });

    let response = app
        .oneshot(
            Request::post("/query")
                .header(
                    "content-type",
                    "application/x-www-form-urlencoded; charset=UTF-8",
                )
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "Files": [{
                "Path": "a.txt",
                "Lines": [{"Line": 0, "Text": "foo", "Rewritten": "bar"}]
            }]
        })
    );
}

#[tokio::test]
async fn gateway_returns_404_for_unknown_route() {
    let dir = TempDir::new().unwrap();
    let app = router(engine(&dir), GatewayOptions::default());

    let response = app
        .oneshot(Request::get("/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn view_serves_raw_files_from_data_root() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src").join("lib.rs"), "pub fn f() {}\n").unwrap();
    let app = router(engine(&dir), GatewayOptions::default());

    let response = app
        .oneshot(Request::get("/view/src/lib.rs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"pub fn f() {}\n");
}

#[tokio::test]
async fn static_dir_serves_form_at_root() {
    let data = TempDir::new().unwrap();
    let www = TempDir::new().unwrap();
    fs::write(www.path().join("index.html"), "<html>form</html>").unwrap();
    let app = router(
        engine(&data),
        GatewayOptions {
            static_dir: Some(www.path().to_path_buf()),
            ..GatewayOptions::default()
        },
    );

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>form</html>");
}

#[tokio::test]
async fn gateway_health_returns_structured_summary() {
    let dir = TempDir::new().unwrap();
    let app = router(
        engine(&dir),
        GatewayOptions {
            max_concurrent_queries: Some(4),
            ..GatewayOptions::default()
        },
    );

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;

    assert_eq!(
        payload.get("status").and_then(Value::as_str),
        Some("healthy")
    );
    assert_eq!(
        payload.get("query_timeout_secs").and_then(Value::as_u64),
        Some(30)
    );
    assert_eq!(
        payload.get("max_concurrent_queries").and_then(Value::as_u64),
        Some(4)
    );
    assert_eq!(
        payload.get("in_flight_queries").and_then(Value::as_u64),
        Some(0)
    );
}
