//! Rain core: pure console state machine, file-tree cache and view-model helpers.
mod bundle;
mod effect;
mod msg;
mod records;
mod state;
mod tree;
mod update;
mod view_model;

pub use bundle::{format_bundle_label, BundleInfo, RecentBundles, RECENT_BUNDLE_LIMIT};
pub use effect::{Effect, FetchIntent};
pub use msg::Msg;
pub use records::{
    BundleSummary, HealthReport, IssueBundles, SearchHit, SearchResult, SearchScope,
    UploadReceipt, UploadStatus,
};
pub use state::{messages, AppState, DEFAULT_SEARCH_QUERY};
pub use tree::{FileEntry, NodeKind, NodeListing, TreeCache, TreeNode, TreeSession, ROOT_NODE_ID};
pub use update::update;
pub use view_model::{
    AppViewModel, BundleRowView, ChildRowView, HealthView, IssueView, SearchHitView, SearchView,
    SelectedNodeView, TreeLine, TreeRowView, TreeView, UploadView,
};
