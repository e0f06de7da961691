use std::collections::HashMap;
use std::time::Duration;

use rain_core::{
    BundleSummary, Effect, FetchIntent, FileEntry, HealthReport, IssueBundles, Msg, NodeKind,
    NodeListing, SearchHit, SearchResult, UploadReceipt, UploadStatus,
};
use rain_engine::{
    ApiError, ApiOutcome, ApiRequest, EngineEvent, EngineHandle, FileNode, FileNodeResponse,
    HealthResponse, IssueBundlesResponse, LogSearchResponse, RequestId, UploadRequest,
    UploadResponse,
};
use rain_logging::{rain_error, rain_info, rain_warn};

use crate::persistence::RecentStore;

/// Which message a pending request's reply turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingRequest {
    Issue,
    Node {
        generation: u64,
        node_id: String,
        parent_id: Option<String>,
        intent: FetchIntent,
    },
    Search,
    Upload,
    Health,
}

/// Carries core effects to the engine and engine replies back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    pending: HashMap<RequestId, PendingRequest>,
    store: Option<RecentStore>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: Option<RecentStore>) -> Self {
        Self {
            engine,
            pending: HashMap::new(),
            store,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchIssue { issue_id } => {
                    rain_info!("FetchIssue issue_id={}", issue_id);
                    self.submit(ApiRequest::FetchIssue { issue_id }, PendingRequest::Issue);
                }
                Effect::FetchNode {
                    generation,
                    bundle_id,
                    node_id,
                    parent_id,
                    intent,
                } => {
                    rain_info!(
                        "FetchNode bundle_id={} node_id={} generation={} intent={:?}",
                        bundle_id,
                        node_id,
                        generation,
                        intent
                    );
                    let request = ApiRequest::FetchNode {
                        bundle_id,
                        node_id: node_id.clone(),
                    };
                    self.submit(
                        request,
                        PendingRequest::Node {
                            generation,
                            node_id,
                            parent_id,
                            intent,
                        },
                    );
                }
                Effect::SearchLogs {
                    bundle_id,
                    query,
                    timeline,
                } => {
                    rain_info!("SearchLogs bundle_id={} query_len={}", bundle_id, query.len());
                    let request = ApiRequest::Search {
                        bundle_id,
                        query,
                        timeline,
                    };
                    self.submit(request, PendingRequest::Search);
                }
                Effect::UploadLogs {
                    issue_code,
                    bundle_name,
                    files,
                } => {
                    rain_info!("UploadLogs issue_code={} files={}", issue_code, files.len());
                    let request = ApiRequest::Upload(UploadRequest {
                        issue_code,
                        bundle_name,
                        files,
                    });
                    self.submit(request, PendingRequest::Upload);
                }
                Effect::CheckHealth => self.submit(ApiRequest::Health, PendingRequest::Health),
                Effect::PersistRecentBundles(bundles) => {
                    if let Some(store) = &self.store {
                        if let Err(err) = store.save(&bundles) {
                            rain_error!("Failed to save recent bundles: {}", err);
                        }
                    }
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine reply and turns it into a message.
    pub fn next_msg(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        self.translate(event)
    }

    fn submit(&mut self, request: ApiRequest, pending: PendingRequest) {
        let request_id = self.engine.submit(request);
        self.pending.insert(request_id, pending);
    }

    fn translate(&mut self, event: EngineEvent) -> Option<Msg> {
        let Some(pending) = self.pending.remove(&event.request_id) else {
            rain_warn!("Reply for unknown request_id={}", event.request_id);
            return None;
        };
        Some(reply_to_msg(pending, event.outcome))
    }
}

fn reply_to_msg(pending: PendingRequest, outcome: ApiOutcome) -> Msg {
    match (pending, outcome) {
        (PendingRequest::Issue, ApiOutcome::Issue(result)) => Msg::IssueLoaded {
            result: settle(result, issue_bundles),
        },
        (
            PendingRequest::Node {
                generation,
                node_id,
                parent_id,
                intent,
            },
            ApiOutcome::Node(result),
        ) => Msg::NodeFetched {
            generation,
            node_id,
            parent_id,
            intent,
            result: settle(result, node_listing),
        },
        (PendingRequest::Search, ApiOutcome::Search(result)) => Msg::SearchFinished {
            result: settle(result, search_result),
        },
        (PendingRequest::Upload, ApiOutcome::Upload(result)) => Msg::UploadFinished {
            result: settle(result, upload_receipt),
        },
        (PendingRequest::Health, ApiOutcome::Health(result)) => Msg::HealthChecked {
            result: settle(result, health_report),
        },
        (pending, outcome) => {
            rain_error!("Reply {:?} does not answer {:?}", outcome, pending);
            mismatched(pending)
        }
    }
}

/// Fails the pending request so its loading state still clears.
fn mismatched(pending: PendingRequest) -> Msg {
    let message = "Unexpected reply from request engine".to_string();
    match pending {
        PendingRequest::Issue => Msg::IssueLoaded { result: Err(message) },
        PendingRequest::Node {
            generation,
            node_id,
            parent_id,
            intent,
        } => Msg::NodeFetched {
            generation,
            node_id,
            parent_id,
            intent,
            result: Err(message),
        },
        PendingRequest::Search => Msg::SearchFinished { result: Err(message) },
        PendingRequest::Upload => Msg::UploadFinished { result: Err(message) },
        PendingRequest::Health => Msg::HealthChecked { result: Err(message) },
    }
}

fn settle<T, U>(result: Result<T, ApiError>, convert: impl FnOnce(T) -> U) -> Result<U, String> {
    result.map(convert).map_err(|err| err.message)
}

fn issue_bundles(response: IssueBundlesResponse) -> IssueBundles {
    IssueBundles {
        name: response.name,
        bundles: response
            .log_bundles
            .into_iter()
            .map(|bundle| BundleSummary {
                hash: bundle.hash,
                name: bundle.name,
                status: UploadStatus::parse(&bundle.status.upload_status),
            })
            .collect(),
    }
}

fn file_entry(node: FileNode) -> FileEntry {
    let kind = if node.is_dir {
        NodeKind::Directory {
            size_bytes: node.size_bytes,
        }
    } else {
        NodeKind::File {
            size_bytes: node.size_bytes,
            mime_type: node.mime_type,
        }
    };
    FileEntry {
        id: node.id,
        name: node.name,
        path: node.path,
        kind,
        status: node.status,
        meta: node.meta,
    }
}

fn node_listing(response: FileNodeResponse) -> NodeListing {
    NodeListing {
        node: file_entry(response.node),
        children: response.children.into_iter().map(file_entry).collect(),
    }
}

fn search_result(response: LogSearchResponse) -> SearchResult {
    SearchResult {
        total: response.total,
        hits: response
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                file_id: hit.file_id,
                path: hit.path,
                snippet: hit.snippet,
                timeline: hit.timeline,
                offset: hit.offset,
            })
            .collect(),
    }
}

fn upload_receipt(response: UploadResponse) -> UploadReceipt {
    UploadReceipt {
        issue_code: response.issue_code,
        bundle_hash: response.bundle_hash,
        bundle_name: response.bundle_name,
        file_count: response.file_count,
        total_bytes: response.total_bytes,
    }
}

fn health_report(response: HealthResponse) -> HealthReport {
    HealthReport {
        status: response.status,
        service: response.service,
        version: response.version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rain_engine::{UploadStatusWrapper, UploadSummary};

    fn wire_node(id: &str, is_dir: bool) -> FileNode {
        FileNode {
            id: id.to_string(),
            name: format!("{id}.name"),
            path: format!("/{id}"),
            is_dir,
            size_bytes: Some(12),
            mime_type: (!is_dir).then(|| "text/plain".to_string()),
            status: None,
            meta: None,
        }
    }

    #[test]
    fn node_reply_keeps_fetch_context_and_maps_kinds() {
        let pending = PendingRequest::Node {
            generation: 3,
            node_id: "root".into(),
            parent_id: None,
            intent: FetchIntent::Init,
        };
        let outcome = ApiOutcome::Node(Ok(FileNodeResponse {
            node: wire_node("root", true),
            children: vec![wire_node("7", false)],
        }));

        let Msg::NodeFetched {
            generation,
            node_id,
            intent,
            result,
            ..
        } = reply_to_msg(pending, outcome)
        else {
            panic!("expected NodeFetched");
        };
        assert_eq!(generation, 3);
        assert_eq!(node_id, "root");
        assert_eq!(intent, FetchIntent::Init);

        let listing = result.unwrap();
        assert_eq!(listing.node.kind, NodeKind::Directory { size_bytes: Some(12) });
        assert_eq!(
            listing.children[0].kind,
            NodeKind::File {
                size_bytes: Some(12),
                mime_type: Some("text/plain".into())
            }
        );
    }

    #[test]
    fn issue_reply_parses_statuses() {
        let outcome = ApiOutcome::Issue(Ok(IssueBundlesResponse {
            name: "CN013".into(),
            log_bundles: vec![UploadSummary {
                hash: "lp1yp7".into(),
                name: "demo".into(),
                status: UploadStatusWrapper {
                    upload_status: "ready".into(),
                },
            }],
        }));

        let msg = reply_to_msg(PendingRequest::Issue, outcome);
        assert_eq!(
            msg,
            Msg::IssueLoaded {
                result: Ok(IssueBundles {
                    name: "CN013".into(),
                    bundles: vec![BundleSummary {
                        hash: "lp1yp7".into(),
                        name: "demo".into(),
                        status: UploadStatus::Ready,
                    }],
                })
            }
        );
    }

    #[test]
    fn mismatched_reply_fails_the_pending_request() {
        let outcome = ApiOutcome::Health(Ok(HealthResponse {
            status: "ok".into(),
            service: String::new(),
            version: String::new(),
        }));
        let msg = reply_to_msg(PendingRequest::Search, outcome);
        assert!(matches!(msg, Msg::SearchFinished { result: Err(_) }));
    }
}
