// ABOUTME: Router tests driving the API with in-memory requests.
// ABOUTME: Checks routes, status codes and response bodies against the fake runtime.

use super::*;
use crate::runtime::LogStream;
use crate::runtime::fake::FakeRuntime;
use crate::sandbox::SandboxSettings;
use crate::types::ContainerId;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct App {
    sandbox: Sandbox<FakeRuntime>,
    _root: TempDir,
}

impl App {
    fn new() -> Self {
        Self::with_runtime(FakeRuntime::new())
    }

    fn with_runtime(runtime: FakeRuntime) -> Self {
        let root = TempDir::new().unwrap();
        let settings = SandboxSettings {
            config_root: root.path().to_path_buf(),
        };
        Self {
            sandbox: Sandbox::new(runtime, settings),
            _root: root,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router(self.sandbox.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create(&self, body: Value) -> String {
        let (status, body) = self.json(Method::POST, "/api/containers", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn create_returns_created_with_id() {
    let app = App::new();

    let (status, body) = app
        .json(Method::POST, "/api/containers", Some(json!({"name": "alice"})))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["message"], "Container created successfully");
}

#[tokio::test]
async fn created_container_is_listed() {
    let app = App::new();
    let id = app
        .create(json!({"name": "alice", "ports": {"3000": "8080"}}))
        .await;
    app.send(Method::POST, &format!("/api/containers/{}/start", id), None)
        .await;

    let (status, body) = app.json(Method::GET, "/api/containers", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "id": &id[..12],
            "name": "alice",
            "image": "lscr.io/linuxserver/webtop:ubuntu-kde",
            "status": "running",
            "ports": ["8080:3000"],
            "url": "http://localhost:8080"
        }])
    );
}

#[tokio::test]
async fn empty_list_is_an_empty_array() {
    let app = App::new();

    let (status, body) = app.json(Method::GET, "/api/containers", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn unpublished_container_has_no_url_field() {
    let app = App::new();
    app.create(json!({"name": "alice"})).await;

    let (_, body) = app.json(Method::GET, "/api/containers", None).await;

    assert_eq!(body[0]["ports"], json!([]));
    assert!(body[0].get("url").is_none());
}

#[tokio::test]
async fn null_maps_are_accepted() {
    let app = App::new();

    let (status, _) = app
        .json(
            Method::POST,
            "/api/containers",
            Some(json!({"name": "alice", "image": null, "environment": null, "ports": null})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = App::new();

    let response = router(app.sandbox.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/containers")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_name_is_bad_request() {
    let app = App::new();

    let (status, body) = app
        .json(Method::POST, "/api/containers", Some(json!({"image": "alpine"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));
    assert!(app.sandbox.runtime().calls().is_empty());
}

#[tokio::test]
async fn invalid_name_is_bad_request() {
    let app = App::new();

    let (status, _) = app
        .json(Method::POST, "/api/containers", Some(json!({"name": "../etc"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_port_is_bad_request() {
    let app = App::new();

    let (status, body) = app
        .json(
            Method::POST,
            "/api/containers",
            Some(json!({"name": "alice", "ports": {"3000": "http"}})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("http"));
}

#[tokio::test]
async fn runtime_errors_are_server_errors_with_runtime_text() {
    let app = App::new();
    let id = app.create(json!({"name": "alice"})).await;

    let (status, body) = app
        .json(Method::POST, "/api/containers", Some(json!({"name": "alice"})))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let expected = format!(
        "Conflict. The container name \"/alice\" is already in use by container \"{}\". \
         You have to remove (or rename) that container to be able to reuse that name.",
        id
    );
    assert_eq!(body, json!({ "error": expected }));
}

#[tokio::test]
async fn lifecycle_messages() {
    let app = App::new();
    let id = app.create(json!({"name": "alice"})).await;

    let (status, body) = app
        .json(Method::POST, &format!("/api/containers/{}/start", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Container started successfully"}));

    let (status, body) = app
        .json(Method::POST, &format!("/api/containers/{}/stop", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Container stopped successfully"}));

    let (status, body) = app
        .json(Method::DELETE, &format!("/api/containers/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Container removed successfully"}));

    let (_, body) = app.json(Method::GET, "/api/containers", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn start_twice_follows_the_runtime() {
    let app = App::new();
    let id = app.create(json!({"name": "alice"})).await;
    let uri = format!("/api/containers/{}/start", id);
    app.send(Method::POST, &uri, None).await;

    let (status, body) = app.json(Method::POST, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Container started successfully"}));
}

#[tokio::test]
async fn unknown_id_is_server_error() {
    let app = App::new();

    let (status, body) = app
        .json(Method::POST, "/api/containers/nope/start", None)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "No such container: nope"}));
}

#[tokio::test]
async fn logs_stream_plain_text_tail() {
    let app = App::new();
    let id = app.create(json!({"name": "alice"})).await;
    for i in 0..80 {
        app.sandbox.runtime().push_log(
            &ContainerId::new(id.clone()),
            LogStream::Stdout,
            &format!("line {}", i),
        );
    }

    let response = router(app.sandbox.clone())
        .oneshot(
            Request::builder()
                .uri(format!("/api/containers/{}/logs?lines=50", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text.lines().count(), 50);
    assert_eq!(text.lines().last(), Some("line 79"));
}

#[tokio::test]
async fn logs_accept_all() {
    let app = App::new();
    let id = app.create(json!({"name": "alice"})).await;
    for i in 0..120 {
        app.sandbox.runtime().push_log(
            &ContainerId::new(id.clone()),
            LogStream::Stderr,
            &format!("line {}", i),
        );
    }

    let (status, bytes) = app
        .send(
            Method::GET,
            &format!("/api/containers/{}/logs?lines=all", id),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 120);
}

#[tokio::test]
async fn logs_reject_invalid_lines() {
    let app = App::new();
    let id = app.create(json!({"name": "alice"})).await;

    let (status, body) = app
        .json(
            Method::GET,
            &format!("/api/containers/{}/logs?lines=lots", id),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("lots"));
}

#[tokio::test]
async fn logs_of_unknown_container_are_json_error() {
    let app = App::new();

    let (status, body) = app
        .json(Method::GET, "/api/containers/nope/logs", None)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn broken_log_stream_returns_partial_output() {
    let app = App::with_runtime(FakeRuntime::new().break_logs_after(3));
    let id = app.create(json!({"name": "alice"})).await;
    for i in 0..10 {
        app.sandbox.runtime().push_log(
            &ContainerId::new(id.clone()),
            LogStream::Stdout,
            &format!("line {}", i),
        );
    }

    let (status, bytes) = app
        .send(Method::GET, &format!("/api/containers/{}/logs", id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), "line 0\nline 1\nline 2\n");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = App::new();

    let (status, _) = app.send(Method::GET, "/containers", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn startup_reports_runtime_version() {
    let version = log_runtime_version(&FakeRuntime::new()).await.unwrap();

    assert_eq!(version.name, "fake");
    assert_eq!(version.api_version, "1.47");
}

#[tokio::test]
async fn startup_tolerates_silent_runtime() {
    assert!(log_runtime_version(&FakeRuntime::new().unreachable()).await.is_none());
}
