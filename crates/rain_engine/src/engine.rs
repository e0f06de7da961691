use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use rain_logging::{rain_debug, rain_warn};

use crate::client::{ClientSettings, RainApi, ReqwestRainClient};
use crate::{ApiError, ApiOutcome, ApiRequest, EngineEvent, FailureKind, RequestId};

struct EngineCommand {
    request_id: RequestId,
    request: ApiRequest,
}

/// Runs backend requests on a background tokio runtime.
///
/// Requests are submitted from the console thread; each one is answered by
/// exactly one [`EngineEvent`] carrying the id returned by [`EngineHandle::submit`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
    next_id: RequestId,
}

impl EngineHandle {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let client = ReqwestRainClient::new(settings)?;
        Self::with_api(Arc::new(client))
    }

    pub fn with_api(api: Arc<dyn RainApi>) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("rain-engine")
            .build()
            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let worker_tx = event_tx.clone();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = worker_tx.clone();
                runtime.spawn(async move {
                    let request_id = command.request_id;
                    let outcome = handle_request(api.as_ref(), command.request).await;
                    let _ = event_tx.send(EngineEvent {
                        request_id,
                        outcome,
                    });
                });
            }
            rain_debug!("Engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx,
            next_id: 1,
        })
    }

    pub fn submit(&mut self, request: ApiRequest) -> RequestId {
        let request_id = self.next_id;
        self.next_id += 1;
        if let Err(mpsc::SendError(command)) = self.cmd_tx.send(EngineCommand {
            request_id,
            request,
        }) {
            rain_warn!("Engine thread is gone; failing request_id={}", request_id);
            let error = ApiError::new(FailureKind::EngineStopped, "Request engine is not running");
            // The receiver lives in `self`, so this send cannot fail.
            let _ = self.event_tx.send(EngineEvent {
                request_id,
                outcome: ApiOutcome::failed(&command.request, error),
            });
        }
        request_id
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_request(api: &dyn RainApi, request: ApiRequest) -> ApiOutcome {
    match request {
        ApiRequest::FetchIssue { issue_id } => {
            ApiOutcome::Issue(api.fetch_issue_bundles(&issue_id).await)
        }
        ApiRequest::FetchNode { bundle_id, node_id } => {
            ApiOutcome::Node(api.fetch_file_node(&bundle_id, &node_id).await)
        }
        ApiRequest::Search {
            bundle_id,
            query,
            timeline,
        } => ApiOutcome::Search(
            api.search_logs(&bundle_id, &query, timeline.as_deref())
                .await,
        ),
        ApiRequest::Upload(upload) => ApiOutcome::Upload(api.upload_logs(&upload).await),
        ApiRequest::Health => ApiOutcome::Health(api.health().await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fails_at_once_when_engine_thread_is_gone() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        drop(cmd_rx);
        let (event_tx, event_rx) = mpsc::channel();
        let mut engine = EngineHandle {
            cmd_tx,
            event_tx,
            event_rx,
            next_id: 1,
        };

        let request_id = engine.submit(ApiRequest::Search {
            bundle_id: "lp1yp7".into(),
            query: "error".into(),
            timeline: None,
        });

        let event = engine.try_recv().expect("failure event");
        assert_eq!(event.request_id, request_id);
        match event.outcome {
            ApiOutcome::Search(Err(err)) => {
                assert_eq!(err.kind, FailureKind::EngineStopped);
                assert_eq!(err.message, "Request engine is not running");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
