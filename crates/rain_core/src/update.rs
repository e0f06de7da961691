use rain_logging::{rain_debug, rain_warn};

use crate::state::{message_or, messages};
use crate::{AppState, BundleInfo, Effect, FetchIntent, Msg, SearchScope, ROOT_NODE_ID};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::IssueInputChanged(text) => {
            state.issue.input = text;
            Vec::new()
        }
        Msg::IssueLookupSubmitted => {
            let issue_id = state.issue.input.trim().to_string();
            if issue_id.is_empty() {
                state.issue.error = Some(messages::ISSUE_REQUIRED.to_string());
                state.mark_dirty();
                return (state, Vec::new());
            }
            vec![start_issue_lookup(&mut state, issue_id)]
        }
        Msg::IssueLoaded { result } => {
            state.request_settled();
            state.issue.loading = false;
            match result {
                Ok(listing) => {
                    state.issue.error = None;
                    state.issue.listing = Some(listing);
                }
                Err(message) => {
                    state.issue.error = Some(message_or(message, messages::LOOKUP_FAILED));
                    state.issue.listing = None;
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::IssueBundlePicked(index) => {
            let picked = state.issue.listing.as_ref().and_then(|listing| {
                listing.bundles.get(index).map(|bundle| {
                    let issue = if listing.name.is_empty() {
                        state.issue.input.trim().to_string()
                    } else {
                        listing.name.clone()
                    };
                    BundleInfo::new(bundle.hash.clone(), bundle.name.clone(), Some(issue))
                })
            });
            match picked {
                Some(bundle) => select_bundle(&mut state, bundle),
                None => {
                    rain_warn!("IssueBundlePicked index={} has no listing entry", index);
                    Vec::new()
                }
            }
        }
        Msg::BundleSelected(bundle) => select_bundle(&mut state, bundle),
        Msg::RecentBundlePicked(index) => match state.recent.get(index).cloned() {
            Some(bundle) => select_bundle(&mut state, bundle),
            None => Vec::new(),
        },
        Msg::BundleCleared => {
            state.active_bundle = None;
            state.tree.reset(None);
            state.mark_dirty();
            Vec::new()
        }
        Msg::NodeClicked(node_id) => click_node(&mut state, node_id),
        Msg::NodeFetched {
            generation,
            node_id,
            parent_id,
            intent,
            result,
        } => {
            state.request_settled();
            if !state.tree.is_current(generation) {
                rain_debug!(
                    "Dropping stale node reply node_id={} generation={} current={}",
                    node_id,
                    generation,
                    state.tree.generation()
                );
                return (state, Vec::new());
            }
            state.tree.end_fetch();
            match result {
                Ok(listing) => {
                    let node = state.tree.apply_listing(listing, parent_id.as_deref());
                    match intent {
                        FetchIntent::Init => state.tree.finish_init(Some(&node)),
                        FetchIntent::Click => state.tree.complete_click(&node.id),
                    }
                }
                Err(message) => {
                    rain_warn!("Node fetch failed node_id={} error={}", node_id, message);
                    state.tree.fail(message_or(message, messages::TREE_FAILED));
                    if intent == FetchIntent::Init {
                        state.tree.finish_init(None);
                    }
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::UploadIssueChanged(text) => {
            state.upload.issue_code = text;
            Vec::new()
        }
        Msg::UploadBundleNameChanged(text) => {
            state.upload.bundle_name = text;
            Vec::new()
        }
        Msg::UploadFilesChosen(files) => {
            state.upload.files = files;
            Vec::new()
        }
        Msg::UploadSubmitted => submit_upload(&mut state),
        Msg::UploadFinished { result } => {
            state.request_settled();
            state.upload.uploading = false;
            state.mark_dirty();
            match result {
                Ok(receipt) => {
                    state.upload.error = None;
                    state.upload.issue_code = receipt.issue_code.clone();
                    state.upload.bundle_name.clear();
                    state.upload.files.clear();
                    state.issue.input = receipt.issue_code.clone();

                    let bundle = BundleInfo::new(
                        receipt.bundle_hash.clone(),
                        receipt.bundle_name.clone(),
                        Some(receipt.issue_code.clone()),
                    );
                    let mut effects = vec![start_issue_lookup(
                        &mut state,
                        receipt.issue_code.clone(),
                    )];
                    state.upload.receipt = Some(receipt);
                    effects.extend(select_bundle(&mut state, bundle));
                    effects
                }
                Err(message) => {
                    state.upload.error = Some(message_or(message, messages::UPLOAD_FAILED));
                    state.upload.receipt = None;
                    Vec::new()
                }
            }
        }
        Msg::SearchBundleChanged(text) => {
            state.search.bundle_id = text;
            Vec::new()
        }
        Msg::SearchQueryChanged(text) => {
            state.search.query = text;
            Vec::new()
        }
        Msg::SearchTimelineChanged(text) => {
            state.search.timeline = text;
            Vec::new()
        }
        Msg::SearchSubmitted => submit_search(&mut state),
        Msg::SearchFinished { result } => {
            state.request_settled();
            state.search.loading = false;
            match result {
                Ok(found) => {
                    state.search.error = None;
                    state.search.result_scope = state.search.requested.take();
                    state.search.result = Some(found);
                }
                Err(message) => {
                    state.search.error = Some(message_or(message, messages::SEARCH_FAILED));
                    state.search.requested = None;
                    state.search.result_scope = None;
                    state.search.result = None;
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::HealthCheckRequested => {
            state.health.loading = true;
            state.request_started();
            vec![Effect::CheckHealth]
        }
        Msg::HealthChecked { result } => {
            state.request_settled();
            state.health.loading = false;
            state.health.outcome =
                Some(result.map_err(|message| message_or(message, messages::HEALTH_FAILED)));
            state.mark_dirty();
            Vec::new()
        }
        Msg::RestoreRecentBundles(bundles) => {
            state.recent = bundles.into_iter().collect();
            state.mark_dirty();
            Vec::new()
        }
    };

    (state, effects)
}

fn start_issue_lookup(state: &mut AppState, issue_id: String) -> Effect {
    state.issue.loading = true;
    state.issue.error = None;
    state.request_started();
    state.mark_dirty();
    Effect::FetchIssue { issue_id }
}

/// Makes `bundle` active. The tree is rebuilt only when it belonged to another bundle.
fn select_bundle(state: &mut AppState, bundle: BundleInfo) -> Vec<Effect> {
    state.recent.push(bundle.clone());
    state.search.bundle_id = bundle.hash.clone();
    let mut effects = vec![Effect::PersistRecentBundles(
        state.recent.entries().to_vec(),
    )];

    if state.tree.bundle_id() != Some(bundle.hash.as_str()) {
        let generation = state.tree.reset(Some(bundle.hash.clone()));
        effects.push(fetch_node(
            state,
            generation,
            bundle.hash.clone(),
            ROOT_NODE_ID.to_string(),
            None,
            FetchIntent::Init,
        ));
    }

    state.active_bundle = Some(bundle);
    state.mark_dirty();
    effects
}

fn click_node(state: &mut AppState, node_id: String) -> Vec<Effect> {
    let Some(bundle_id) = state.tree.bundle_id().map(str::to_owned) else {
        return Vec::new();
    };
    let generation = state.tree.generation();

    let needs_fetch = match state.tree.cache().get(&node_id) {
        None => Some(None),
        Some(node) if node.is_dir() && !node.has_loaded_children => Some(node.parent_id.clone()),
        Some(_) => None,
    };

    match needs_fetch {
        Some(parent_id) => vec![fetch_node(
            state,
            generation,
            bundle_id,
            node_id,
            parent_id,
            FetchIntent::Click,
        )],
        None => {
            state.tree.complete_click(&node_id);
            state.mark_dirty();
            Vec::new()
        }
    }
}

fn fetch_node(
    state: &mut AppState,
    generation: u64,
    bundle_id: String,
    node_id: String,
    parent_id: Option<String>,
    intent: FetchIntent,
) -> Effect {
    state.tree.begin_fetch();
    state.request_started();
    Effect::FetchNode {
        generation,
        bundle_id,
        node_id,
        parent_id,
        intent,
    }
}

fn submit_upload(state: &mut AppState) -> Vec<Effect> {
    let issue_code = state.upload.issue_code.trim().to_string();
    state.mark_dirty();
    if issue_code.is_empty() {
        state.upload.error = Some(messages::ISSUE_REQUIRED.to_string());
        return Vec::new();
    }
    if state.upload.files.is_empty() {
        state.upload.error = Some(messages::FILES_REQUIRED.to_string());
        return Vec::new();
    }

    state.upload.uploading = true;
    state.upload.error = None;
    state.upload.receipt = None;
    state.request_started();
    vec![Effect::UploadLogs {
        issue_code,
        bundle_name: non_blank(&state.upload.bundle_name),
        files: state.upload.files.clone(),
    }]
}

fn submit_search(state: &mut AppState) -> Vec<Effect> {
    let bundle_id = state.search.bundle_id.trim().to_string();
    let query = state.search.query.trim().to_string();
    state.mark_dirty();
    if bundle_id.is_empty() {
        state.search.error = Some(messages::BUNDLE_REQUIRED.to_string());
        return Vec::new();
    }
    if query.is_empty() {
        state.search.error = Some(messages::QUERY_REQUIRED.to_string());
        return Vec::new();
    }

    let timeline = non_blank(&state.search.timeline);
    state.search.loading = true;
    state.search.error = None;
    state.search.requested = Some(SearchScope {
        bundle_id: bundle_id.clone(),
        query: query.clone(),
        timeline: timeline.clone(),
    });
    state.request_started();
    vec![Effect::SearchLogs {
        bundle_id,
        query,
        timeline,
    }]
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
