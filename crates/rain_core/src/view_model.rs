use crate::{
    format_bundle_label, AppState, BundleInfo, HealthReport, SearchScope, TreeNode, TreeSession,
    UploadStatus,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub active_bundle: Option<BundleInfo>,
    pub recent_bundles: Vec<String>,
    pub issue: IssueView,
    pub upload: UploadView,
    pub tree: TreeView,
    pub search: SearchView,
    pub health: HealthView,
    pub in_flight: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueView {
    pub input: String,
    pub loading: bool,
    pub error: Option<String>,
    /// Issue name and its bundles, when a lookup succeeded.
    pub listing: Option<(String, Vec<BundleRowView>)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRowView {
    pub name: String,
    pub hash: String,
    pub status: UploadStatus,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadView {
    pub issue_code: String,
    pub bundle_name: String,
    pub file_count: usize,
    pub uploading: bool,
    pub error: Option<String>,
    pub receipt: Option<crate::UploadReceipt>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeView {
    pub bundle_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub lines: Vec<TreeLine>,
    pub selected: Option<SelectedNodeView>,
}

/// One rendered line of the tree outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeLine {
    Node(TreeRowView),
    /// An expanded directory whose listing came back empty.
    NoChildren { depth: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRowView {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    pub expanded: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedNodeView {
    pub id: String,
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size_bytes: Option<u64>,
    pub meta: Option<serde_json::Value>,
    pub has_loaded_children: bool,
    pub children: Vec<ChildRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRowView {
    pub name: String,
    /// `DIR` for directories, otherwise the mime type or `FILE`.
    pub kind_label: String,
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchView {
    pub bundle_id: String,
    pub query: String,
    pub timeline: String,
    pub loading: bool,
    pub error: Option<String>,
    /// What the shown result was searched for; the form fields may have moved on since.
    pub scope: Option<SearchScope>,
    /// Match count reported by the backend, which can exceed `hits.len()`.
    pub total: Option<u64>,
    pub hits: Vec<SearchHitView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHitView {
    /// `"{timeline or all} · {path}"`
    pub label: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthView {
    pub loading: bool,
    pub outcome: Option<Result<HealthReport, String>>,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let active_hash = state.active_bundle.as_ref().map(|bundle| bundle.hash.as_str());

        let listing = state.issue.listing.as_ref().map(|listing| {
            let rows = listing
                .bundles
                .iter()
                .map(|bundle| BundleRowView {
                    name: bundle.name.clone(),
                    hash: bundle.hash.clone(),
                    status: bundle.status.clone(),
                    active: Some(bundle.hash.as_str()) == active_hash,
                })
                .collect();
            (listing.name.clone(), rows)
        });

        let search_hits = state
            .search
            .result
            .as_ref()
            .map(|result| {
                result
                    .hits
                    .iter()
                    .map(|hit| SearchHitView {
                        label: format!(
                            "{} · {}",
                            hit.timeline.as_deref().unwrap_or("all"),
                            hit.path
                        ),
                        snippet: hit.snippet.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            active_bundle: state.active_bundle.clone(),
            recent_bundles: state.recent.entries().iter().map(format_bundle_label).collect(),
            issue: IssueView {
                input: state.issue.input.clone(),
                loading: state.issue.loading,
                error: state.issue.error.clone(),
                listing,
            },
            upload: UploadView {
                issue_code: state.upload.issue_code.clone(),
                bundle_name: state.upload.bundle_name.clone(),
                file_count: state.upload.files.len(),
                uploading: state.upload.uploading,
                error: state.upload.error.clone(),
                receipt: state.upload.receipt.clone(),
            },
            tree: tree_view(&state.tree),
            search: SearchView {
                bundle_id: state.search.bundle_id.clone(),
                query: state.search.query.clone(),
                timeline: state.search.timeline.clone(),
                loading: state.search.loading,
                error: state.search.error.clone(),
                scope: state.search.result_scope.clone(),
                total: state.search.result.as_ref().map(|result| result.total),
                hits: search_hits,
            },
            health: HealthView {
                loading: state.health.loading,
                outcome: state.health.outcome.clone(),
            },
            in_flight: state.in_flight(),
        }
    }
}

fn tree_view(tree: &TreeSession) -> TreeView {
    let mut lines = Vec::new();
    if let Some(root_id) = tree.root_id() {
        push_lines(tree, root_id, &mut Vec::new(), &mut lines);
    }

    let selected = tree
        .selected()
        .and_then(|id| tree.cache().get(id))
        .map(|node| selected_view(tree, node));

    TreeView {
        bundle_id: tree.bundle_id().map(str::to_owned),
        loading: tree.is_loading(),
        error: tree.error().map(str::to_owned),
        lines,
        selected,
    }
}

fn push_lines<'a>(
    tree: &'a TreeSession,
    id: &'a str,
    ancestors: &mut Vec<&'a str>,
    lines: &mut Vec<TreeLine>,
) {
    // A listing that names one of its ancestors as a child would recurse forever.
    if ancestors.contains(&id) {
        return;
    }
    let Some(node) = tree.cache().get(id) else {
        return;
    };
    let depth = ancestors.len();
    let expanded = tree.is_expanded(id);
    lines.push(TreeLine::Node(TreeRowView {
        id: node.id.clone(),
        name: node.name.clone(),
        depth,
        is_dir: node.is_dir(),
        expanded,
        selected: tree.selected() == Some(id),
    }));

    if node.is_dir() && expanded {
        if node.children_ids.is_empty() {
            lines.push(TreeLine::NoChildren { depth: depth + 1 });
        }
        ancestors.push(id);
        for child_id in &node.children_ids {
            push_lines(tree, child_id, ancestors, lines);
        }
        ancestors.pop();
    }
}

fn selected_view(tree: &TreeSession, node: &TreeNode) -> SelectedNodeView {
    let children = tree
        .cache()
        .children_of(&node.id)
        .map(|child| ChildRowView {
            name: child.name.clone(),
            kind_label: if child.is_dir() {
                "DIR".to_string()
            } else {
                child.kind.mime_type().unwrap_or("FILE").to_string()
            },
            size_bytes: child.kind.size_bytes(),
        })
        .collect();

    SelectedNodeView {
        id: node.id.clone(),
        name: node.name.clone(),
        path: node.path.clone(),
        is_dir: node.is_dir(),
        size_bytes: node.kind.size_bytes(),
        meta: node.meta.clone(),
        has_loaded_children: node.has_loaded_children,
        children,
    }
}
