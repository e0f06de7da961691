use std::time::Duration;

use rain_engine::{ApiOutcome, ApiRequest, ClientSettings, EngineEvent, EngineHandle};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn next_event(engine: &EngineHandle) -> EngineEvent {
    for _ in 0..200 {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("engine produced no event");
}

#[tokio::test]
async fn submitted_requests_are_answered_with_their_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"status":"ok","service":"rain-backend","version":"0.1.0"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/issues/NOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("issue NOPE"))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    let mut engine = EngineHandle::new(&settings).expect("engine");
    let health_id = engine.submit(ApiRequest::Health);
    let issue_id = engine.submit(ApiRequest::FetchIssue {
        issue_id: "NOPE".into(),
    });
    assert_ne!(health_id, issue_id);

    let mut events = vec![next_event(&engine).await, next_event(&engine).await];
    events.sort_by_key(|event| event.request_id);

    match &events[0].outcome {
        ApiOutcome::Health(Ok(report)) => assert_eq!(report.service, "rain-backend"),
        other => panic!("unexpected outcome {other:?}"),
    }
    match &events[1].outcome {
        ApiOutcome::Issue(Err(err)) => assert_eq!(err.message, "issue NOPE"),
        other => panic!("unexpected outcome {other:?}"),
    }
}
