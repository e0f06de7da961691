//! Rain engine: HTTP client for the Rain backend and background request execution.
mod api;
mod client;
mod engine;
mod types;

pub use api::{
    FileNode, FileNodeResponse, HealthResponse, IssueBundlesResponse, LogSearchHit,
    LogSearchResponse, UploadResponse, UploadStatusWrapper, UploadSummary,
};
pub use client::{ClientSettings, RainApi, ReqwestRainClient, UploadRequest};
pub use engine::EngineHandle;
pub use types::{ApiError, ApiOutcome, ApiRequest, EngineEvent, FailureKind, RequestId};
