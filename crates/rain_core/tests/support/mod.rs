#![allow(dead_code)]

use std::sync::Once;

use rain_core::{
    update, AppState, BundleInfo, Effect, FetchIntent, FileEntry, Msg, NodeKind, NodeListing,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(rain_logging::initialize_for_tests);
}

pub fn dir(id: &str, name: &str) -> FileEntry {
    FileEntry {
        id: id.to_string(),
        name: name.to_string(),
        path: format!("/{name}"),
        kind: NodeKind::Directory {
            size_bytes: Some(0),
        },
        status: Some("READY".to_string()),
        meta: None,
    }
}

pub fn file(id: &str, name: &str, size: u64) -> FileEntry {
    FileEntry {
        id: id.to_string(),
        name: name.to_string(),
        path: format!("/{name}"),
        kind: NodeKind::File {
            size_bytes: Some(size),
            mime_type: Some("text/plain".to_string()),
        },
        status: Some("READY".to_string()),
        meta: None,
    }
}

pub fn listing(node: FileEntry, children: Vec<FileEntry>) -> NodeListing {
    NodeListing { node, children }
}

pub fn bundle(hash: &str) -> BundleInfo {
    BundleInfo::new(hash, format!("bundle-{hash}"), Some("CN013".to_string()))
}

/// Selects `hash` and returns the root fetch effect's generation.
pub fn select(state: AppState, hash: &str) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::BundleSelected(bundle(hash)));
    let generation = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchNode { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("root fetch effect");
    (state, generation)
}

/// Selects `hash` and answers the root fetch with a root holding `children`.
pub fn select_with_root(hash: &str, children: Vec<FileEntry>) -> AppState {
    let (state, generation) = select(AppState::new(), hash);
    let (state, _) = update(
        state,
        Msg::NodeFetched {
            generation,
            node_id: "root".to_string(),
            parent_id: None,
            intent: FetchIntent::Init,
            result: Ok(listing(dir("root", &format!("{hash}_root")), children)),
        },
    );
    state
}

pub fn node_fetches(effects: &[Effect]) -> Vec<(String, Option<String>, FetchIntent)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchNode {
                node_id,
                parent_id,
                intent,
                ..
            } => Some((node_id.clone(), parent_id.clone(), *intent)),
            _ => None,
        })
        .collect()
}
