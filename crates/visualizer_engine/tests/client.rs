use std::net::TcpListener;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use visualizer_core::{
    Difficulty, GenerationOptions, Quality, ServiceEndpoints, ServiceReadiness, TaskId,
    TaskStatus,
};
use visualizer_engine::{ClientError, ClientSettings, ReqwestTaskClient, TaskClient};
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(base: &str) -> ReqwestTaskClient {
    let settings = ClientSettings {
        endpoints: ServiceEndpoints::parse(base).expect("base url"),
        request_timeout: Duration::from_secs(5),
        ..ClientSettings::default()
    };
    ReqwestTaskClient::new(settings).expect("client")
}

async fn client_for_server(server: &MockServer) -> ReqwestTaskClient {
    client_for(&format!("{}/api", server.uri()))
}

/// Base url on a port nothing listens on.
fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api")
}

#[tokio::test]
async fn submit_posts_query_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "topic": "area of x",
            "difficulty": "advanced",
            "duration": 30,
            "quality": "high_quality"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"task_id": "t-1", "status": "started"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let options = GenerationOptions::new(Difficulty::Advanced, Quality::High, 30).unwrap();
    let task_id = client.submit("area of x", &options).await.expect("submit ok");
    assert_eq!(task_id, TaskId::new("t-1"));
}

#[tokio::test]
async fn submit_maps_http_failure_to_bad_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let err = client
        .submit("area of x", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::BadResponse { status: 500 });
}

#[tokio::test]
async fn submit_without_service_is_unavailable() {
    let client = client_for(&unreachable_base());
    let err = client
        .submit("area of x", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ServiceUnavailable(_)), "{err:?}");
}

#[tokio::test]
async fn submit_rejects_empty_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": ""})))
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let err = client
        .submit("area of x", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidBody(_)));
}

#[tokio::test]
async fn fetch_status_parses_progress_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "generating",
            "progress": 40,
            "message": "Rendering"
        })))
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let snapshot = client.fetch_status(&TaskId::new("t-1")).await.expect("status");
    assert_eq!(snapshot.status, TaskStatus::Generating);
    assert_eq!(snapshot.progress, 40);
    assert_eq!(snapshot.message, "Rendering");
}

#[tokio::test]
async fn fetch_status_carries_result_path_and_unknown_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/done"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "progress": 100,
            "message": "Video generated successfully!",
            "video_path": "media/videos/area.mp4"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status/missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "not_found",
            "message": "Task not found"
        })))
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let done = client.fetch_status(&TaskId::new("done")).await.expect("status");
    assert_eq!(
        done.status,
        TaskStatus::Completed {
            result_path: Some("media/videos/area.mp4".to_string())
        }
    );

    let missing = client
        .fetch_status(&TaskId::new("missing"))
        .await
        .expect("status");
    assert_eq!(missing.status, TaskStatus::Unsupported("not_found".to_string()));
    assert_eq!(missing.progress, 0);
}

#[tokio::test]
async fn fetch_status_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let err = client.fetch_status(&TaskId::new("t-1")).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidBody(_)));
}

#[tokio::test]
async fn readiness_classifies_ok_and_misconfigured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/setup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "GITHUB_TOKEN not configured"
        })))
        .mount(&server)
        .await;
    let client = client_for_server(&server).await;
    assert_eq!(
        client.check_readiness().await,
        ServiceReadiness::Misconfigured {
            message: "GITHUB_TOKEN not configured".to_string()
        }
    );

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/setup"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "message": "Setup complete"})),
        )
        .mount(&server)
        .await;
    let client = client_for_server(&server).await;
    assert!(client.check_readiness().await.is_ready());
}

#[tokio::test]
async fn readiness_never_fails_when_offline() {
    let client = client_for(&unreachable_base());
    assert_eq!(client.check_readiness().await, ServiceReadiness::Offline);
}

#[tokio::test]
async fn explanation_is_fetched_from_download_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/download/.+\.json$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topic": "Derivatives",
            "explanation": "Rate of change."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let url = client.endpoints().download("explanations/derivative.json");
    let explanation = client
        .fetch_explanation(url.as_str())
        .await
        .expect("explanation");
    assert_eq!(explanation.topic, "Derivatives");
    assert_eq!(explanation.explanation, "Rate of change.");
}

#[tokio::test]
async fn explanation_missing_is_bad_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/download/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "File not found"})))
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let url = client.endpoints().download("gone.json");
    let err = client.fetch_explanation(url.as_str()).await.unwrap_err();
    assert_eq!(err, ClientError::BadResponse { status: 404 });
}

#[tokio::test]
async fn lists_generated_videos() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Area Of X", "path": "media/videos/area/480p15/area.mp4", "size": 2048, "created": 1700000000.5}
        ])))
        .mount(&server)
        .await;

    let client = client_for_server(&server).await;
    let videos = client.list_videos().await.expect("videos");
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].name, "Area Of X");
    assert_eq!(videos[0].size, 2048);
}

#[tokio::test]
async fn video_download_respects_size_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/download/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 64]))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        endpoints: ServiceEndpoints::parse(&format!("{}/api", server.uri())).unwrap(),
        max_download_bytes: 16,
        ..ClientSettings::default()
    };
    let client = ReqwestTaskClient::new(settings).unwrap();
    let url = client.endpoints().download("media/videos/area.mp4");
    let err = client.download_video(url.as_str()).await.unwrap_err();
    assert!(matches!(err, ClientError::TooLarge { max_bytes: 16, .. }));

    let client = client_for_server(&server).await;
    let bytes = client.download_video(url.as_str()).await.expect("download");
    assert_eq!(bytes.len(), 64);
}
