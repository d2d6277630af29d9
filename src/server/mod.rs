// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! The processing API server.
//!
//! Serves the same wire shapes the remote client consumes, so a galatea
//! session pointed at a galatea server round-trips cleanly:
//! `POST /api/markdown/upload`, `GET /api/markdown/sample`, `GET /health`.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{DefaultBodyLimit, Json};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;

use crate::format::parse_markdown;
use crate::remote::{
    RemoteErrorCode, UploadData, UploadRequest, UploadResponse, WireEdge, WireNode,
    MAX_CONTENT_BYTES,
};
use crate::tui::demo_document;

#[cfg(test)]
mod tests;

pub const DEFAULT_PORT: u16 = 3001;
const DEFAULT_FILENAME: &str = "uploaded.md";
const SAMPLE_FILENAME: &str = "sample-api.md";

pub fn router() -> Router {
    Router::new()
        .route("/api/markdown/upload", post(upload))
        .route("/api/markdown/sample", get(sample))
        .route("/health", get(health))
        .fallback(not_found)
        // Accept bodies past the content limit so the upload handler can
        // answer with the structured CONTENT_TOO_LARGE rejection.
        .layer(DefaultBodyLimit::max(MAX_CONTENT_BYTES + 64 * 1024))
}

/// Runs the router on `listener` until ctrl-c.
pub async fn serve(listener: tokio::net::TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, router())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

async fn upload(Json(request): Json<UploadRequest>) -> Response {
    if request.content.is_empty() {
        return rejection(
            StatusCode::BAD_REQUEST,
            RemoteErrorCode::InvalidContent,
            "Invalid markdown content",
        );
    }
    if request.content.len() > MAX_CONTENT_BYTES {
        return rejection(
            StatusCode::PAYLOAD_TOO_LARGE,
            RemoteErrorCode::ContentTooLarge,
            "Content too large (max 10MB)",
        );
    }

    let filename = request
        .filename
        .clone()
        .unwrap_or_else(|| DEFAULT_FILENAME.to_owned());
    let metadata = request.metadata.clone().unwrap_or_default();
    let body = process(&request.content, filename, metadata);
    Json(body).into_response()
}

async fn sample() -> Response {
    let metadata = [("source".to_owned(), "api-sample".to_owned())].into();
    let body = process(demo_document(), SAMPLE_FILENAME.to_owned(), metadata);
    Json(body).into_response()
}

async fn health() -> Response {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestampMs": unix_millis(),
    }))
    .into_response()
}

async fn not_found() -> Response {
    let body = json!({
        "error": "Not found",
        "code": "NOT_FOUND",
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

fn process(
    content: &str,
    filename: String,
    metadata: std::collections::BTreeMap<String, String>,
) -> UploadResponse {
    let snapshot = parse_markdown(content);
    let stats = snapshot.stats_for(content);
    let (nodes, edges, _) = snapshot.into_parts();

    UploadResponse {
        success: true,
        data: UploadData {
            filename,
            nodes: nodes.iter().map(WireNode::from_model).collect(),
            edges: edges.iter().map(WireEdge::from_model).collect(),
            stats: stats.into(),
            metadata,
            processed_at_ms: unix_millis(),
        },
    }
}

fn rejection(status: StatusCode, code: RemoteErrorCode, message: &str) -> Response {
    let body = json!({
        "error": message,
        "code": code.label(),
    });
    (status, Json(body)).into_response()
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}
