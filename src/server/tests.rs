// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

use serde_json::{json, Value};

use super::router;
use crate::model::NodeKind;
use crate::remote::{RemoteErrorCode, RemoteParseClient, RemoteParseError, MAX_CONTENT_BYTES};

/// Serves the router on an ephemeral port and returns its base URL.
async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router()).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn upload_round_trips_through_the_client() {
    let base = spawn_server().await;
    let client = RemoteParseClient::new(&base);

    let outcome = client
        .parse("# Title\nintro\n## Sub\n[Doc](http://x)\n", Some("notes.md"))
        .await
        .expect("remote parse");

    assert_eq!(outcome.nodes.len(), 3);
    assert_eq!(outcome.edges.len(), 2);
    assert_eq!(outcome.stats.node_count, 3);
    assert_eq!(outcome.stats.word_count, 6);
    assert_eq!(outcome.nodes[2].kind(), NodeKind::Link);
}

#[tokio::test]
async fn empty_content_is_rejected_as_invalid() {
    let base = spawn_server().await;
    let client = RemoteParseClient::new(&base);

    let err = client.parse("", None).await.unwrap_err();
    match err {
        RemoteParseError::Rejected { status, code, .. } => {
            assert_eq!(status, 400);
            assert_eq!(code, RemoteErrorCode::InvalidContent);
        }
        other => panic!("expected rejection, got {other}"),
    }
}

#[tokio::test]
async fn oversized_content_is_rejected_by_the_server() {
    let base = spawn_server().await;

    // Bypass the client's pre-flight check to exercise the server-side limit.
    let body = json!({ "content": "x".repeat(MAX_CONTENT_BYTES + 1) });
    let response = reqwest::Client::new()
        .post(format!("{base}/api/markdown/upload"))
        .json(&body)
        .send()
        .await
        .expect("send");

    assert_eq!(response.status().as_u16(), 413);
    let payload: Value = response.json().await.expect("json");
    assert_eq!(payload["code"], "CONTENT_TOO_LARGE");
}

#[tokio::test]
async fn upload_echoes_filename_and_metadata() {
    let base = spawn_server().await;

    let body = json!({
        "content": "# Hi",
        "filename": "hello.md",
        "metadata": { "origin": "test" },
    });
    let response = reqwest::Client::new()
        .post(format!("{base}/api/markdown/upload"))
        .json(&body)
        .send()
        .await
        .expect("send");

    assert!(response.status().is_success());
    let payload: Value = response.json().await.expect("json");
    assert_eq!(payload["success"], true);
    assert_eq!(payload["data"]["filename"], "hello.md");
    assert_eq!(payload["data"]["metadata"]["origin"], "test");
    assert!(payload["data"]["processedAtMs"].as_u64().unwrap() > 0);
    assert_eq!(payload["data"]["nodes"][0]["id"], "h:0000");
    assert_eq!(payload["data"]["stats"]["nodeCount"], 1);
}

#[tokio::test]
async fn upload_defaults_the_filename() {
    let base = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/markdown/upload"))
        .json(&json!({ "content": "# Hi" }))
        .send()
        .await
        .expect("send");

    let payload: Value = response.json().await.expect("json");
    assert_eq!(payload["data"]["filename"], "uploaded.md");
}

#[tokio::test]
async fn sample_returns_the_demo_document() {
    let base = spawn_server().await;

    let response = reqwest::get(format!("{base}/api/markdown/sample"))
        .await
        .expect("get sample");
    assert!(response.status().is_success());

    let payload: Value = response.json().await.expect("json");
    assert_eq!(payload["success"], true);
    assert_eq!(payload["data"]["filename"], "sample-api.md");
    assert_eq!(payload["data"]["metadata"]["source"], "api-sample");
    assert!(payload["data"]["nodes"].as_array().unwrap().len() > 3);
}

#[tokio::test]
async fn health_reports_the_service() {
    let base = spawn_server().await;

    let response = reqwest::get(format!("{base}/health")).await.expect("get");
    assert!(response.status().is_success());

    let payload: Value = response.json().await.expect("json");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["service"], env!("CARGO_PKG_NAME"));
    assert!(payload["timestampMs"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn unknown_routes_return_a_structured_404() {
    let base = spawn_server().await;

    let response = reqwest::get(format!("{base}/api/nope")).await.expect("get");
    assert_eq!(response.status().as_u16(), 404);

    let payload: Value = response.json().await.expect("json");
    assert_eq!(payload["code"], "NOT_FOUND");
}
