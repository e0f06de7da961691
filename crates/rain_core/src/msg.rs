use std::path::PathBuf;

use crate::{
    BundleInfo, FetchIntent, HealthReport, IssueBundles, NodeListing, SearchResult, UploadReceipt,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the issue lookup input.
    IssueInputChanged(String),
    /// User submitted the issue lookup form.
    IssueLookupSubmitted,
    /// Backend answered an issue lookup.
    IssueLoaded {
        result: Result<IssueBundles, String>,
    },
    /// User picked the n-th bundle (0-based) of the current issue listing.
    IssueBundlePicked(usize),
    /// A bundle became active, from any source.
    BundleSelected(BundleInfo),
    /// User picked the n-th entry (0-based) of the recent bundle list.
    RecentBundlePicked(usize),
    /// Active bundle was cleared.
    BundleCleared,
    /// User clicked a node in the file tree.
    NodeClicked(String),
    /// Backend answered a node fetch.
    NodeFetched {
        generation: u64,
        node_id: String,
        parent_id: Option<String>,
        intent: FetchIntent,
        result: Result<NodeListing, String>,
    },
    /// User edited the upload issue input.
    UploadIssueChanged(String),
    /// User edited the optional bundle name.
    UploadBundleNameChanged(String),
    /// User chose the files to upload.
    UploadFilesChosen(Vec<PathBuf>),
    /// User submitted the upload form.
    UploadSubmitted,
    /// Backend answered an upload.
    UploadFinished {
        result: Result<UploadReceipt, String>,
    },
    /// User edited the search bundle input.
    SearchBundleChanged(String),
    /// User edited the search keyword.
    SearchQueryChanged(String),
    /// User edited the optional timeline filter.
    SearchTimelineChanged(String),
    /// User submitted the search form.
    SearchSubmitted,
    /// Backend answered a search.
    SearchFinished {
        result: Result<SearchResult, String>,
    },
    /// User asked for the backend health.
    HealthCheckRequested,
    /// Backend answered the health check.
    HealthChecked {
        result: Result<HealthReport, String>,
    },
    /// Restore the recent bundle list from persisted state.
    RestoreRecentBundles(Vec<BundleInfo>),
}
