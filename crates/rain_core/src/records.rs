use std::fmt;

/// Processing state the backend reports for an uploaded bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Ready,
    Processing,
    Failed,
    Pending,
    Other(String),
}

impl UploadStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "READY" => Self::Ready,
            "PROCESSING" => Self::Processing,
            "FAILED" => Self::Failed,
            "PENDING" => Self::Pending,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Ready => write!(f, "READY"),
            UploadStatus::Processing => write!(f, "PROCESSING"),
            UploadStatus::Failed => write!(f, "FAILED"),
            UploadStatus::Pending => write!(f, "PENDING"),
            UploadStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub hash: String,
    pub name: String,
    pub status: UploadStatus,
}

/// Bundles grouped under one issue, newest first as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueBundles {
    pub name: String,
    pub bundles: Vec<BundleSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub file_id: String,
    pub path: String,
    pub snippet: String,
    pub timeline: Option<String>,
    pub offset: Option<i64>,
}

/// `total` counts every match; `hits` is the page the backend chose to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

/// The bundle, query and timeline a search was sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchScope {
    pub bundle_id: String,
    pub query: String,
    pub timeline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub issue_code: String,
    pub bundle_hash: String,
    pub bundle_name: String,
    pub file_count: u64,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
}
