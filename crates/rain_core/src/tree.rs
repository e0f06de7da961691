//! Lazily populated file tree for the active bundle.
//!
//! Nodes arrive one listing at a time: a listing carries a node plus its
//! immediate children. The fetched node is recorded with its children ids and
//! marked loaded; each child is recorded as a stub whose own children are
//! fetched the first time it is opened.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

/// Node id the backend resolves to the top of a bundle's tree.
pub const ROOT_NODE_ID: &str = "root";

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Directory {
        size_bytes: Option<u64>,
    },
    File {
        size_bytes: Option<u64>,
        mime_type: Option<String>,
    },
}

impl NodeKind {
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    pub fn size_bytes(&self) -> Option<u64> {
        match self {
            NodeKind::Directory { size_bytes } | NodeKind::File { size_bytes, .. } => *size_bytes,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            NodeKind::Directory { .. } => None,
            NodeKind::File { mime_type, .. } => mime_type.as_deref(),
        }
    }
}

/// One entry as reported by the file service.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub status: Option<String>,
    pub meta: Option<Value>,
}

/// A node together with its immediate children.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeListing {
    pub node: FileEntry,
    pub children: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub status: Option<String>,
    pub meta: Option<Value>,
    pub children_ids: Vec<String>,
    pub has_loaded_children: bool,
}

impl TreeNode {
    fn stub(entry: FileEntry, parent_id: Option<String>) -> Self {
        Self {
            id: entry.id,
            parent_id,
            name: entry.name,
            path: entry.path,
            kind: entry.kind,
            status: entry.status,
            meta: entry.meta,
            children_ids: Vec::new(),
            has_loaded_children: false,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Node records keyed by id; each id appears at most once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeCache {
    nodes: BTreeMap<String, TreeNode>,
}

impl TreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Cached children of `id`, in listing order. Ids without a record are skipped.
    pub fn children_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a TreeNode> + 'a {
        let ids: &'a [String] = self
            .nodes
            .get(id)
            .map(|node| node.children_ids.as_slice())
            .unwrap_or(&[]);
        ids.iter().filter_map(move |child_id| self.nodes.get(child_id))
    }

    /// Records a fetched listing and returns the stored node.
    ///
    /// A parent link already known for the node wins over `parent_hint`.
    /// Children become stubs under the node; a child that already has its own
    /// children loaded keeps them and only refreshes its fields.
    pub fn apply_listing(&mut self, listing: NodeListing, parent_hint: Option<&str>) -> &TreeNode {
        let NodeListing { node, children } = listing;
        let key = node.id.clone();
        let parent_id = self
            .nodes
            .get(&key)
            .and_then(|existing| existing.parent_id.clone())
            .or_else(|| parent_hint.map(str::to_owned));

        let mut record = TreeNode::stub(node, parent_id);
        record.has_loaded_children = true;
        record.children_ids = children.iter().map(|child| child.id.clone()).collect();

        for child in children {
            let stub = TreeNode::stub(child, Some(key.clone()));
            match self.nodes.get_mut(&stub.id) {
                Some(existing) if existing.has_loaded_children => {
                    existing.parent_id = stub.parent_id;
                    existing.name = stub.name;
                    existing.path = stub.path;
                    existing.kind = stub.kind;
                    existing.status = stub.status;
                    existing.meta = stub.meta;
                }
                Some(existing) => *existing = stub,
                None => {
                    self.nodes.insert(stub.id.clone(), stub);
                }
            }
        }

        self.nodes.insert(key.clone(), record);
        &self.nodes[&key]
    }
}

/// File-tree state for one bundle: cache, expansion set and selection.
///
/// Every reset bumps `generation`; node fetches carry the generation they were
/// issued under so replies for an earlier bundle can be told apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeSession {
    bundle_id: Option<String>,
    generation: u64,
    cache: TreeCache,
    expanded: BTreeSet<String>,
    selected: Option<String>,
    root_id: Option<String>,
    initialized: bool,
    loading: usize,
    error: Option<String>,
}

impl TreeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bundle_id(&self) -> Option<&str> {
        self.bundle_id.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root_id.as_deref()
    }

    /// True once the root fetch for the current bundle has settled, successfully or not.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Discards everything and starts over for `bundle_id`, returning the new generation.
    pub(crate) fn reset(&mut self, bundle_id: Option<String>) -> u64 {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            bundle_id,
            generation,
            ..Self::default()
        };
        generation
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.loading += 1;
        self.error = None;
    }

    pub(crate) fn end_fetch(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Caches the listing. A listing for [`ROOT_NODE_ID`] anchors the outline even when it
    /// arrives through a click after a failed root fetch.
    pub(crate) fn apply_listing(&mut self, listing: NodeListing, parent_hint: Option<&str>) -> TreeNode {
        let node = self.cache.apply_listing(listing, parent_hint).clone();
        if self.root_id.is_none() && node.id == ROOT_NODE_ID {
            self.root_id = Some(node.id.clone());
        }
        node
    }

    /// Marks the root fetch as settled; a loaded root becomes selected and, when a directory, expanded.
    pub(crate) fn finish_init(&mut self, root: Option<&TreeNode>) {
        self.initialized = true;
        if let Some(root) = root {
            self.root_id = Some(root.id.clone());
            self.selected = Some(root.id.clone());
            if root.is_dir() {
                self.expanded = BTreeSet::from([root.id.clone()]);
            }
        }
    }

    /// Adds `id` when absent, removes it when present. Returns whether it is now expanded.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_owned());
            true
        }
    }

    /// Applies a click on a cached node: directories toggle, every node becomes selected.
    pub(crate) fn complete_click(&mut self, id: &str) {
        let is_dir = match self.cache.get(id) {
            Some(node) => node.is_dir(),
            None => return,
        };
        if is_dir {
            self.toggle_expanded(id);
        }
        self.selected = Some(id.to_owned());
    }
}
