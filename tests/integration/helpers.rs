//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Json;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use doctrack_auth::JwtEncoder;
use doctrack_core::config::AppConfig;
use doctrack_entity::document::DocumentRef;
use doctrack_storage::StorageLayout;

/// Shared secret used when signing is enabled.
pub const SECRET: &str = "integration-test-secret";

/// Recorded traffic and canned content of the fake document service.
#[derive(Debug, Default)]
struct FakeState {
    base_url: String,
    files: Mutex<HashMap<String, Bytes>>,
    conversions: Mutex<Vec<Value>>,
    commands: Mutex<Vec<Value>>,
    downloads: AtomicUsize,
    fail_conversions: AtomicBool,
}

/// An in-process stand-in for the document editing service, serving
/// content, conversion, and command endpoints on an ephemeral port.
#[derive(Debug, Clone)]
pub struct FakeDocService {
    state: Arc<FakeState>,
}

impl FakeDocService {
    /// Binds the fake service and starts serving in the background.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake document service");
        let addr = listener.local_addr().expect("No local address");

        let state = Arc::new(FakeState {
            base_url: format!("http://{addr}/"),
            ..Default::default()
        });

        let router = Router::new()
            .route("/files/{name}", get(serve_file))
            .route("/ConvertService.ashx", post(convert))
            .route("/coauthoring/CommandService.ashx", post(command))
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { state }
    }

    /// Base URL with a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    /// Publishes `content` and returns the URL it is served from.
    pub fn publish(&self, name: &str, content: &str) -> String {
        self.state
            .files
            .lock()
            .unwrap()
            .insert(name.to_string(), Bytes::from(content.to_string()));
        self.file_url(name)
    }

    /// URL of a published (or missing) file.
    pub fn file_url(&self, name: &str) -> String {
        format!("{}files/{name}", self.state.base_url)
    }

    /// Makes every conversion answer with a service error.
    pub fn fail_conversions(&self) {
        self.state.fail_conversions.store(true, Ordering::SeqCst);
    }

    pub fn conversions(&self) -> Vec<Value> {
        self.state.conversions.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<Value> {
        self.state.commands.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> usize {
        self.state.downloads.load(Ordering::SeqCst)
    }
}

async fn serve_file(
    State(state): State<Arc<FakeState>>,
    Path(name): Path<String>,
) -> Result<Bytes, StatusCode> {
    state.downloads.fetch_add(1, Ordering::SeqCst);
    state
        .files
        .lock()
        .unwrap()
        .get(&name)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

async fn convert(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Json<Value> {
    state.conversions.lock().unwrap().push(body.clone());
    if state.fail_conversions.load(Ordering::SeqCst) {
        return Json(json!({ "error": -3 }));
    }

    let output = body["outputtype"].as_str().unwrap_or("bin").to_string();
    let name = format!("converted.{output}");
    state
        .files
        .lock()
        .unwrap()
        .insert(name.clone(), Bytes::from(format!("converted to {output}")));

    Json(json!({
        "endConvert": true,
        "percent": 100,
        "fileUrl": format!("{}files/{name}", state.base_url),
        "fileType": output,
    }))
}

async fn command(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Json<Value> {
    state.commands.lock().unwrap().push(body.clone());
    Json(json!({ "error": 0, "key": body["key"] }))
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// The fake document service the app talks to
    pub docs: FakeDocService,
    root: TempDir,
}

impl TestApp {
    /// Create a new test application with signing disabled
    pub async fn new() -> Self {
        Self::build(false).await
    }

    /// Create a new test application that requires signed requests
    pub async fn with_signing() -> Self {
        Self::build(true).await
    }

    async fn build(signing: bool) -> Self {
        let root = tempfile::tempdir().expect("Failed to create storage root");
        let docs = FakeDocService::start().await;

        let mut config = AppConfig::default();
        config.storage.root = root.path().to_string_lossy().into_owned();
        config.docservice.url = docs.base_url().to_string();
        config.signature.enabled = signing;
        config.signature.secret = SECRET.to_string();

        let state = doctrack_api::build_state(config.clone())
            .await
            .expect("Failed to build application state");
        let router = doctrack_api::build_app(state);

        Self {
            router,
            config,
            docs,
            root,
        }
    }

    pub fn layout(&self) -> StorageLayout {
        StorageLayout::new(self.root.path())
    }

    /// Path of the canonical file of `file_name` owned by `user`.
    pub fn document_path(&self, user: &str, file_name: &str) -> PathBuf {
        self.layout().storage_path(&DocumentRef::new(file_name, user))
    }

    /// Writes a canonical file as if it had been uploaded.
    pub async fn seed(&self, user: &str, file_name: &str, content: &str) {
        let path = self.document_path(user, file_name);
        tokio::fs::create_dir_all(path.parent().expect("no parent"))
            .await
            .expect("Failed to create user dir");
        tokio::fs::write(&path, content)
            .await
            .expect("Failed to seed document");
    }

    /// Reads a file under the storage root, `None` if it does not exist.
    pub async fn read(&self, path: PathBuf) -> Option<String> {
        tokio::fs::read_to_string(path).await.ok()
    }

    /// Signs `claims` with the configured secret.
    pub fn sign(&self, claims: &Value) -> String {
        JwtEncoder::new(&self.config.signature)
            .sign(claims)
            .expect("Failed to sign claims")
    }

    /// Signs `body` wrapped under `payload`, as sent in headers.
    pub fn sign_payload(&self, body: &Value) -> String {
        JwtEncoder::new(&self.config.signature)
            .sign_payload(body)
            .expect("Failed to sign payload")
    }

    /// POSTs a callback for `file_name` owned by `user`.
    pub async fn track(
        &self,
        user: &str,
        file_name: &str,
        body: Value,
        token: Option<&str>,
    ) -> TestResponse {
        let path = format!("/track?filename={file_name}&useraddress={user}");
        self.request("POST", &path, Some(body), token).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        let raw = self.send(method, path, Body::from(body_str), token).await;
        TestResponse {
            status: raw.status,
            body: serde_json::from_slice(&raw.bytes).unwrap_or(Value::Null),
        }
    }

    /// Make an HTTP request and keep the raw response body
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Body,
        token: Option<&str>,
    ) -> RawResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), 10 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        RawResponse {
            status,
            content_type,
            bytes,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON
    pub body: Value,
}

/// Undecoded response from a test request
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}
