use std::fmt;

use thiserror::Error;

use crate::{
    FileNodeResponse, HealthResponse, IssueBundlesResponse, LogSearchResponse, UploadRequest,
    UploadResponse,
};

/// Correlates an engine event with the request that produced it.
pub type RequestId = u64;

/// A failed backend call. The message is what the user gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Io,
    /// The background runtime is gone; nothing was sent.
    EngineStopped,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::EngineStopped => write!(f, "engine stopped"),
        }
    }
}

/// Work the engine can perform on behalf of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    FetchIssue {
        issue_id: String,
    },
    FetchNode {
        bundle_id: String,
        node_id: String,
    },
    Search {
        bundle_id: String,
        query: String,
        timeline: Option<String>,
    },
    Upload(UploadRequest),
    Health,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    Issue(Result<IssueBundlesResponse, ApiError>),
    Node(Result<FileNodeResponse, ApiError>),
    Search(Result<LogSearchResponse, ApiError>),
    Upload(Result<UploadResponse, ApiError>),
    Health(Result<HealthResponse, ApiError>),
}

impl ApiOutcome {
    /// The outcome `request` would have produced had it failed with `error`.
    pub(crate) fn failed(request: &ApiRequest, error: ApiError) -> Self {
        match request {
            ApiRequest::FetchIssue { .. } => ApiOutcome::Issue(Err(error)),
            ApiRequest::FetchNode { .. } => ApiOutcome::Node(Err(error)),
            ApiRequest::Search { .. } => ApiOutcome::Search(Err(error)),
            ApiRequest::Upload(_) => ApiOutcome::Upload(Err(error)),
            ApiRequest::Health => ApiOutcome::Health(Err(error)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub request_id: RequestId,
    pub outcome: ApiOutcome,
}
