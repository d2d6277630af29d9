// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Remote parse client and the wire shapes it shares with the server.
//!
//! The wire is camelCase JSON. Responses are validated into model types ONCE
//! here; past this boundary the session controller no longer cares whether a
//! snapshot came from the network or the local builder.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{DocumentStats, EdgeKind, GraphEdge, GraphNode, NodeId, NodeKind};

/// Upload payloads above this size are rejected before transmission.
pub const MAX_CONTENT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub data: UploadData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub filename: String,
    pub nodes: Vec<WireNode>,
    pub edges: Vec<WireEdge>,
    pub stats: WireStats,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub processed_at_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNode {
    pub id: String,
    pub text: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WireNode {
    pub fn from_model(node: &GraphNode) -> Self {
        match node {
            GraphNode::Heading(heading) => Self {
                id: heading.id().to_string(),
                text: heading.text().to_owned(),
                kind: NodeKind::Heading.label().to_owned(),
                level: Some(heading.level()),
                source_line: Some(heading.source_line() as u64),
                url: None,
            },
            GraphNode::Reference(reference) => Self {
                id: reference.id().to_string(),
                text: reference.text().to_owned(),
                kind: NodeKind::Link.label().to_owned(),
                level: None,
                source_line: None,
                url: Some(reference.url().to_owned()),
            },
        }
    }

    pub fn into_model(self) -> Result<GraphNode, String> {
        let id = NodeId::new(self.id).map_err(|err| format!("invalid node id: {err}"))?;
        match NodeKind::from_label(&self.kind) {
            Some(NodeKind::Heading) => {
                let level = self
                    .level
                    .ok_or_else(|| format!("heading node `{id}` is missing `level`"))?;
                if !(1..=6).contains(&level) {
                    return Err(format!("heading node `{id}` has level {level} outside 1..=6"));
                }
                let source_line = self
                    .source_line
                    .ok_or_else(|| format!("heading node `{id}` is missing `sourceLine`"))?;
                Ok(GraphNode::heading(id, self.text, level, source_line as usize))
            }
            Some(NodeKind::Link) => {
                let url = self
                    .url
                    .ok_or_else(|| format!("link node `{id}` is missing `url`"))?;
                Ok(GraphNode::reference(id, self.text, url))
            }
            None => Err(format!("unknown node kind `{}`", self.kind)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEdge {
    pub source: String,
    pub target: String,
    pub kind: String,
}

impl WireEdge {
    pub fn from_model(edge: &GraphEdge) -> Self {
        Self {
            source: edge.source().to_string(),
            target: edge.target().to_string(),
            kind: edge.kind().label().to_owned(),
        }
    }

    pub fn into_model(self) -> Result<GraphEdge, String> {
        let kind = EdgeKind::from_label(&self.kind)
            .ok_or_else(|| format!("unknown edge kind `{}`", self.kind))?;
        let source = NodeId::new(self.source).map_err(|err| format!("invalid edge source: {err}"))?;
        let target = NodeId::new(self.target).map_err(|err| format!("invalid edge target: {err}"))?;
        Ok(GraphEdge::new(source, target, kind))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStats {
    pub node_count: u64,
    pub edge_count: u64,
    pub line_count: u64,
    pub word_count: u64,
    pub char_count: u64,
}

impl From<DocumentStats> for WireStats {
    fn from(stats: DocumentStats) -> Self {
        Self {
            node_count: stats.node_count,
            edge_count: stats.edge_count,
            line_count: stats.line_count,
            word_count: stats.word_count,
            char_count: stats.char_count,
        }
    }
}

impl From<WireStats> for DocumentStats {
    fn from(stats: WireStats) -> Self {
        Self {
            node_count: stats.node_count,
            edge_count: stats.edge_count,
            line_count: stats.line_count,
            word_count: stats.word_count,
            char_count: stats.char_count,
        }
    }
}

/// Machine-readable rejection codes, shared by the server and the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteErrorCode {
    InvalidContent,
    ContentTooLarge,
    ProcessingError,
}

impl RemoteErrorCode {
    pub fn label(self) -> &'static str {
        match self {
            Self::InvalidContent => "INVALID_CONTENT",
            Self::ContentTooLarge => "CONTENT_TOO_LARGE",
            Self::ProcessingError => "PROCESSING_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireErrorBody {
    pub error: String,
    pub code: RemoteErrorCode,
}

/// A parse result in model terms, whatever path produced it.
#[derive(Debug, Clone)]
pub struct RemoteParseOutcome {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stats: DocumentStats,
}

#[derive(Debug)]
pub enum RemoteParseError {
    /// Network or transport failure; maps to "remote unavailable".
    Transport(reqwest::Error),
    /// The remote answered with a structured rejection.
    Rejected {
        status: u16,
        code: RemoteErrorCode,
        message: String,
    },
    /// The remote answered success but the payload did not validate.
    MalformedResponse { message: String },
}

impl fmt::Display for RemoteParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "remote parse transport failure: {err}"),
            Self::Rejected {
                status,
                code,
                message,
            } => write!(f, "remote parse rejected ({status} {}): {message}", code.label()),
            Self::MalformedResponse { message } => {
                write!(f, "remote parse response malformed: {message}")
            }
        }
    }
}

impl std::error::Error for RemoteParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// HTTP client for the processing API.
#[derive(Debug, Clone)]
pub struct RemoteParseClient {
    base_url: String,
    http: reqwest::Client,
}

impl RemoteParseClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `content` for remote parsing and validates the response into
    /// model types.
    pub async fn parse(
        &self,
        content: &str,
        filename: Option<&str>,
    ) -> Result<RemoteParseOutcome, RemoteParseError> {
        if content.len() > MAX_CONTENT_BYTES {
            return Err(RemoteParseError::Rejected {
                status: 413,
                code: RemoteErrorCode::ContentTooLarge,
                message: format!(
                    "content is {} bytes, limit is {MAX_CONTENT_BYTES}",
                    content.len()
                ),
            });
        }

        let request = UploadRequest {
            content: content.to_owned(),
            filename: filename.map(str::to_owned),
            metadata: None,
        };
        let response = self
            .http
            .post(format!("{}/api/markdown/upload", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(RemoteParseError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<WireErrorBody>(&body) {
                Ok(rejection) => RemoteParseError::Rejected {
                    status: status.as_u16(),
                    code: rejection.code,
                    message: rejection.error,
                },
                // Unparseable error bodies degrade to a generic code.
                Err(_) => RemoteParseError::Rejected {
                    status: status.as_u16(),
                    code: RemoteErrorCode::ProcessingError,
                    message: format!("unstructured error response ({status})"),
                },
            });
        }

        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|err| RemoteParseError::MalformedResponse {
                message: err.to_string(),
            })?;

        outcome_from_wire(payload)
    }
}

fn outcome_from_wire(payload: UploadResponse) -> Result<RemoteParseOutcome, RemoteParseError> {
    let malformed = |message: String| RemoteParseError::MalformedResponse { message };

    if !payload.success {
        return Err(malformed("response flagged success=false".to_owned()));
    }

    let mut nodes = Vec::with_capacity(payload.data.nodes.len());
    for node in payload.data.nodes {
        nodes.push(node.into_model().map_err(&malformed)?);
    }
    let mut edges = Vec::with_capacity(payload.data.edges.len());
    for edge in payload.data.edges {
        edges.push(edge.into_model().map_err(&malformed)?);
    }

    Ok(RemoteParseOutcome {
        nodes,
        edges,
        stats: payload.data.stats.into(),
    })
}
