//! End-to-end lifecycle tests against a mock gateway.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidgist_models::{ArtifactKind, ArtifactSelection, GenerationRequest, TaskStatus};
use vidgist_poller::{
    GatewayClient, GatewayClientConfig, InvalidationBus, PollerConfig, PollerError, PollerState,
    QueryKey, UploadSource,
};

fn client_for(server: &MockServer) -> GatewayClient {
    let config = GatewayClientConfig {
        base_url: server.uri(),
        index_id: "ix1".into(),
        page_limit: 1,
        timeout: Duration::from_secs(5),
    };
    GatewayClient::new(config).expect("client builds")
}

fn fast_poll() -> PollerConfig {
    PollerConfig {
        interval: Duration::from_millis(20),
        max_attempts: 10,
    }
}

#[tokio::test]
async fn upload_then_ready_fires_one_dependent_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/index"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"_id": "t1", "status": "pending", "video_id": "v1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // First status check still pending, every one after that ready.
    Mock::given(method("GET"))
        .and(path("/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"_id": "t1", "status": "pending", "video_id": "v1"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"_id": "t1", "status": "ready", "video_id": "v1"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/indexes/ix1/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "v1",
            "metadata": {"video_title": "demo.mp4", "duration": 30.0},
            "hls": {"video_url": "https://cdn.example/v1.m3u8"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bus = Arc::new(InvalidationBus::new());
    let video_key = QueryKey::Video {
        index_id: "ix1".into(),
        video_id: "v1".into(),
    };
    let mut video_rx = bus.subscribe(video_key.clone()).await;

    let handle = client.upload_and_watch(
        vec![("language".into(), "en".into())],
        UploadSource::new("demo.mp4", "video/mp4", b"fake video bytes".to_vec()),
        Arc::clone(&bus),
        fast_poll(),
    );

    assert_eq!(handle.wait().await, PollerState::Ready);

    // Exactly one invalidation arrived; the dependent re-fetch fires once.
    assert_eq!(video_rx.recv().await.unwrap(), video_key);
    assert!(video_rx.try_recv().is_err());

    let video = client.get_video("v1").await.unwrap();
    assert_eq!(video.id, "v1");
    assert_eq!(video.display_title(), "demo.mp4");
    assert_eq!(video.hls.unwrap().video_url, "https://cdn.example/v1.m3u8");
}

#[tokio::test]
async fn failed_task_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/index"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"_id": "t1", "status": "pending"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"_id": "t1", "status": "failed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bus = Arc::new(InvalidationBus::new());
    let mut list_rx = bus
        .subscribe(QueryKey::Videos {
            index_id: "ix1".into(),
        })
        .await;

    let handle = client.upload_and_watch(
        Vec::new(),
        UploadSource::new("demo.mp4", "video/mp4", vec![0u8; 8]),
        Arc::clone(&bus),
        fast_poll(),
    );

    assert_eq!(handle.wait().await, PollerState::Failed);
    assert!(list_rx.try_recv().is_err());
}

#[tokio::test]
async fn typed_task_parsing_folds_unknown_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"_id": "t1", "status": "validating"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let task = client.get_task("t1").await.unwrap();
    assert_eq!(task.status, TaskStatus::Processing);
    assert!(!task.is_terminal());
}

#[tokio::test]
async fn gateway_error_shape_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"status": 404, "message": "Error getting a task"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_task("t1").await.unwrap_err();
    match err {
        PollerError::Gateway { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Error getting a task");
        }
        other => panic!("expected gateway error, got {other:?}"),
    }
}

#[tokio::test]
async fn artifact_fanout_issues_minimal_calls() {
    let server = MockServer::start().await;

    // summary + chapter: one /summarize call each
    Mock::given(method("POST"))
        .and(path("/videos/v1/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "gen1"})))
        .expect(2)
        .mount(&server)
        .await;
    // title + hashtag: one combined /gist call
    Mock::given(method("POST"))
        .and(path("/videos/v1/gist"))
        .and(body_string_contains("\"types\":[\"title\",\"hashtag\"]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "A title"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let selection: ArtifactSelection = [
        ArtifactKind::Summary,
        ArtifactKind::Chapter,
        ArtifactKind::Title,
        ArtifactKind::Hashtag,
    ]
    .into_iter()
    .collect();

    let artifacts = client
        .request_artifacts(&GenerationRequest::new("v1", selection))
        .await
        .unwrap();

    assert_eq!(artifacts.summaries.len(), 2);
    assert!(artifacts.gist.is_some());
    assert!(artifacts.open_ended.is_none());
}

#[tokio::test]
async fn empty_selection_is_rejected_before_any_call() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let err = client
        .request_artifacts(&GenerationRequest::new("v1", ArtifactSelection::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, PollerError::Selection(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn prompt_drives_open_ended_generation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/videos/v1/generate"))
        .and(body_string_contains("\"prompt\":\"What happened?\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "a story"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request =
        GenerationRequest::new("v1", ArtifactSelection::new()).with_prompt("What happened?");

    let artifacts = client.request_artifacts(&request).await.unwrap();
    assert_eq!(artifacts.open_ended.unwrap()["data"], "a story");
}
