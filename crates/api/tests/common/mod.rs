#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use fwhub_core::scripting::command::ScriptError;
use fwhub_core::trigger::{JobRequest, JobTrigger, TriggerError};
use fwhub_db::store::memory::MemoryStore;
use fwhub_db::store::DocumentStore;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use fwhub_api::config::ServerConfig;
use fwhub_api::router::build_app_router;
use fwhub_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        trigger_command: vec!["true".to_string()],
        trigger_workdir: None,
        trigger_timeout_secs: 5,
        job_profiles_path: None,
    }
}

/// Job trigger double: records requests and answers with a fixed outcome.
pub struct StubTrigger {
    pub outcome: Result<Value, String>,
    pub requests: Mutex<Vec<JobRequest>>,
}

impl StubTrigger {
    pub fn succeeding(result: Value) -> Self {
        Self {
            outcome: Ok(result),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(stderr: &str) -> Self {
        Self {
            outcome: Err(stderr.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl JobTrigger for StubTrigger {
    async fn trigger(&self, request: &JobRequest) -> Result<Value, TriggerError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.outcome {
            Ok(value) => Ok(value.clone()),
            Err(stderr) => Err(TriggerError::Process(ScriptError::ExecutionFailed {
                exit_code: 1,
                stderr: stderr.clone(),
            })),
        }
    }
}

/// Build the full application router over a fresh in-memory store and a
/// trigger that always succeeds.
pub fn build_test_app() -> Router {
    let trigger = StubTrigger::succeeding(json!({"status": "triggered"}));
    build_test_app_with(Arc::new(MemoryStore::new()), Arc::new(trigger))
}

/// Build the full application router over the given collaborators.
pub fn build_test_app_with(
    store: Arc<dyn DocumentStore>,
    job_trigger: Arc<dyn JobTrigger>,
) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        job_trigger,
    };
    build_app_router(state, &config)
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A complete build log request body.
pub fn build_log_body(build_id: &str, status: &str, build_type: &str, start_time: &str) -> Value {
    json!({
        "build_id": build_id,
        "type": build_type,
        "status": status,
        "start_time": start_time,
        "config": {"osType": "linux", "version": "22.04"},
        "command": "make image",
        "jenkins_job": "os-making-pipeline"
    })
}

/// A complete generated code request body.
pub fn generated_code_body(n: u32) -> Value {
    json!({
        "language": "python",
        "type": "script",
        "code": format!("print({n})"),
        "description": format!("entry {n}"),
        "created_at": format!("2024-05-01T08:{n:02}:00Z")
    })
}
