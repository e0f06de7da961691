use std::path::PathBuf;

use crate::BundleInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchIssue {
        issue_id: String,
    },
    FetchNode {
        generation: u64,
        bundle_id: String,
        node_id: String,
        parent_id: Option<String>,
        intent: FetchIntent,
    },
    SearchLogs {
        bundle_id: String,
        query: String,
        timeline: Option<String>,
    },
    UploadLogs {
        issue_code: String,
        bundle_name: Option<String>,
        files: Vec<PathBuf>,
    },
    CheckHealth,
    PersistRecentBundles(Vec<BundleInfo>),
}

/// Why a node is being fetched; decides what happens once the listing arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchIntent {
    /// Root fetch after a bundle switch.
    Init,
    /// User opened a node that was missing or had no children loaded.
    Click,
}
