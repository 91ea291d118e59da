//! Integration tests for the Axum router.
//!
//! These tests drive the router with `oneshot` against a stub job runner, so
//! no external tool is needed.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::tempdir;
use tower::ServiceExt;

use common::{FAIL_MESSAGE, HangingRunner, PANIC_MARKER, router_with_runner, test_router};
use vidgrab_axum::CorsConfig;
use vidgrab_core::INVALID_LINK_MESSAGE;

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let dir = tempdir().unwrap();
    let (app, _) = test_router(dir.path(), &CorsConfig::AllowAll);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn test_malformed_batches_are_rejected_without_jobs() {
    let too_many: Vec<String> = (0..16).map(|i| format!("https://youtu.be/{i}")).collect();
    let too_many = json!({ "links": too_many }).to_string();
    let cases = [
        "not json",
        "{}",
        r#"{"links": "https://youtu.be/a"}"#,
        r#"{"links": []}"#,
        r#"{"links": ["https://youtu.be/a", 7]}"#,
        too_many.as_str(),
    ];

    for body in cases {
        let dir = tempdir().unwrap();
        let (app, runner) = test_router(dir.path(), &CorsConfig::AllowAll);
        let response = app.oneshot(post_json("/api/download", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let json = body_json(response).await;
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
        assert_eq!(runner.calls(), 0, "body: {body}");
    }
}

#[tokio::test]
async fn test_fifteen_links_are_accepted() {
    let dir = tempdir().unwrap();
    let (app, runner) = test_router(dir.path(), &CorsConfig::AllowAll);
    let links: Vec<String> = (0..15).map(|i| format!("https://youtu.be/{i}")).collect();

    let response = app
        .oneshot(post_json("/api/download", &json!({ "links": links }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 15);
    assert_eq!(runner.calls(), 15);
}

#[tokio::test]
async fn test_results_follow_input_order() {
    let dir = tempdir().unwrap();
    let (app, runner) = test_router(dir.path(), &CorsConfig::AllowAll);
    let body = json!({
        "links": ["https://youtu.be/one", "https://vimeo.com/2", "https://youtu.be/private"]
    });

    let response = app
        .oneshot(post_json("/api/download", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "results": [
                { "link": "https://youtu.be/one", "ok": true, "file": "/downloads/one.mp4" },
                { "link": "https://vimeo.com/2", "ok": false, "message": INVALID_LINK_MESSAGE },
                { "link": "https://youtu.be/private", "ok": false, "error": FAIL_MESSAGE, "code": 1 }
            ]
        })
    );
    assert_eq!(runner.calls(), 2);
}

#[tokio::test]
async fn test_download_directory_is_served() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("abc - My Clip.mp4"), b"payload").unwrap();
    let (app, _) = test_router(dir.path(), &CorsConfig::AllowAll);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/downloads/abc%20-%20My%20Clip.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"payload");
}

#[tokio::test]
async fn test_stream_emits_started_then_terminal_then_done() {
    let dir = tempdir().unwrap();
    let (app, _) = test_router(dir.path(), &CorsConfig::AllowAll);
    let body = json!({ "links": ["https://youtu.be/one", "nope"] });

    let response = app
        .oneshot(post_json("/api/download/stream", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    let events: Vec<(String, Value)> = text
        .split("\n\n")
        .filter_map(|block| {
            let name = block.lines().find_map(|l| l.strip_prefix("event: "))?;
            let data = block.lines().find_map(|l| l.strip_prefix("data: "))?;
            Some((name.to_string(), serde_json::from_str(data).unwrap()))
        })
        .collect();

    let names: Vec<&str> = events.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["link", "link", "link", "done"]);
    assert_eq!(events[0].1["index"], 0);
    assert_eq!(events[0].1["result"]["status"], "started");
    assert_eq!(events[1].1["result"]["ok"], true);
    assert_eq!(events[2].1["index"], 1);
    assert_eq!(events[2].1["result"]["message"], INVALID_LINK_MESSAGE);
    assert_eq!(events[3].1["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_stream_validates_before_streaming() {
    let dir = tempdir().unwrap();
    let (app, runner) = test_router(dir.path(), &CorsConfig::AllowAll);

    let response = app
        .oneshot(post_json("/api/download/stream", r#"{"links": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(runner.calls(), 0);
}

#[tokio::test]
async fn test_stream_disconnect_cancels_running_job() {
    let dir = tempdir().unwrap();
    let runner = Arc::new(HangingRunner::default());
    let app = router_with_runner(dir.path(), &CorsConfig::AllowAll, runner.clone());
    let body = json!({ "links": ["https://youtu.be/slow"] });

    let response = app
        .oneshot(post_json("/api/download/stream", &body.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body();
    let frame = body.frame().await.unwrap().unwrap();
    let first = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(first.contains("\"started\""), "first frame: {first}");

    let deadline = Instant::now() + Duration::from_secs(2);
    while !runner.started() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(runner.started());
    assert!(!runner.cancelled());

    drop(body);

    let deadline = Instant::now() + Duration::from_secs(2);
    while !runner.cancelled() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(runner.cancelled(), "job kept running after the client left");
}

#[tokio::test]
async fn test_handler_panic_becomes_internal_error() {
    let dir = tempdir().unwrap();
    let (app, _) = test_router(dir.path(), &CorsConfig::AllowAll);
    let body = json!({ "links": [format!("https://youtu.be/{PANIC_MARKER}")] });

    let response = app
        .oneshot(post_json("/api/download", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["message"], "internal server error");
}
