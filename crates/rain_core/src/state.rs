use std::path::PathBuf;

use crate::view_model::AppViewModel;
use crate::{
    BundleInfo, HealthReport, IssueBundles, RecentBundles, SearchResult, SearchScope, TreeSession,
    UploadReceipt,
};

/// Keyword the search form starts with.
pub const DEFAULT_SEARCH_QUERY: &str = "error";

/// User-facing texts for validation failures and fallbacks for empty error bodies.
pub mod messages {
    pub const ISSUE_REQUIRED: &str = "Please enter an issue ID";
    pub const FILES_REQUIRED: &str = "Please select at least one file";
    pub const BUNDLE_REQUIRED: &str = "Please enter a bundle ID";
    pub const QUERY_REQUIRED: &str = "Please enter a search keyword";
    pub const LOOKUP_FAILED: &str = "Lookup failed";
    pub const TREE_FAILED: &str = "Failed to load file tree";
    pub const UPLOAD_FAILED: &str = "Upload failed";
    pub const SEARCH_FAILED: &str = "Search failed";
    pub const HEALTH_FAILED: &str = "Health check failed";
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct IssuePanel {
    pub(crate) input: String,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) listing: Option<IssueBundles>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct UploadPanel {
    pub(crate) issue_code: String,
    pub(crate) bundle_name: String,
    pub(crate) files: Vec<PathBuf>,
    pub(crate) uploading: bool,
    pub(crate) error: Option<String>,
    pub(crate) receipt: Option<UploadReceipt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchPanel {
    pub(crate) bundle_id: String,
    pub(crate) query: String,
    pub(crate) timeline: String,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    /// Scope of the request awaiting a reply.
    pub(crate) requested: Option<SearchScope>,
    /// Scope `result` was produced for.
    pub(crate) result_scope: Option<SearchScope>,
    pub(crate) result: Option<SearchResult>,
}

impl Default for SearchPanel {
    fn default() -> Self {
        Self {
            bundle_id: String::new(),
            query: DEFAULT_SEARCH_QUERY.to_string(),
            timeline: String::new(),
            loading: false,
            error: None,
            requested: None,
            result_scope: None,
            result: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct HealthPanel {
    pub(crate) loading: bool,
    pub(crate) outcome: Option<Result<HealthReport, String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) active_bundle: Option<BundleInfo>,
    pub(crate) recent: RecentBundles,
    pub(crate) tree: TreeSession,
    pub(crate) issue: IssuePanel,
    pub(crate) upload: UploadPanel,
    pub(crate) search: SearchPanel,
    pub(crate) health: HealthPanel,
    in_flight: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn active_bundle(&self) -> Option<&BundleInfo> {
        self.active_bundle.as_ref()
    }

    pub fn recent_bundles(&self) -> &RecentBundles {
        &self.recent
    }

    pub fn tree(&self) -> &TreeSession {
        &self.tree
    }

    /// Requests issued through effects whose replies have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn request_started(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn request_settled(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

/// Keeps a backend error message, or substitutes `fallback` when it is blank.
pub(crate) fn message_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
