#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, BackendKind};
use server::routes::{self, StaticDirs};
use server::state::AppState;
use service::lead::telegram::MessagingApi;
use tower::ServiceExt;
use uuid::Uuid;

/// Records every message instead of calling Telegram.
#[derive(Default)]
pub struct FakeMessenger {
    pub sent: Mutex<Vec<(String, String)>>,
    pub reject: Mutex<Option<String>>,
}

impl FakeMessenger {
    pub fn sent(&self) -> Vec<(String, String)> { self.sent.lock().unwrap().clone() }
}

#[async_trait]
impl MessagingApi for FakeMessenger {
    async fn send_markdown(&self, _token: &str, chat_id: &str, text: &str) -> Result<(), String> {
        if let Some(reason) = self.reject.lock().unwrap().clone() {
            return Err(reason);
        }
        self.sent.lock().unwrap().push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub messenger: Arc<FakeMessenger>,
    pub root: PathBuf,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value { serde_json::from_str(&self.body).unwrap() }
}

/// App over a JSON-file backend in a fresh temp dir.
pub async fn spawn_app(bot_token: Option<&str>) -> TestApp {
    let root = std::env::temp_dir().join(format!("clean_house_e2e_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.backend.kind = BackendKind::File;
    cfg.backend.file_dir = root.join("data").to_string_lossy().into_owned();
    cfg.storage.root_dir = root.join("storage").to_string_lossy().into_owned();
    cfg.server.public_dir = root.join("public").to_string_lossy().into_owned();
    cfg.telegram.bot_token = bot_token.map(str::to_string);

    let (backend, _) = service::runtime::open_backend(&cfg).await.unwrap();
    let messenger = Arc::new(FakeMessenger::default());
    let state = AppState::new(&cfg, backend, messenger.clone());
    let router = routes::build_router(state.clone(), &StaticDirs::from_config(&cfg));
    TestApp { router, state, messenger, root }
}

/// Minimal `application/x-www-form-urlencoded` encoder.
pub fn form_body(fields: &[(&str, &str)]) -> String {
    fn enc(s: &str) -> String {
        s.chars()
            .map(|c| match c {
                '%' => "%25".to_string(),
                '&' => "%26".to_string(),
                '=' => "%3D".to_string(),
                '+' => "%2B".to_string(),
                '#' => "%23".to_string(),
                ' ' => "+".to_string(),
                '\n' => "%0A".to_string(),
                c => c.to_string(),
            })
            .collect()
    }
    fields.iter().map(|(k, v)| format!("{}={}", enc(k), enc(v))).collect::<Vec<_>>().join("&")
}

pub const BOUNDARY: &str = "----clean-house-test-boundary";

/// One-file multipart body under the `file` field.
pub fn multipart_body(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n").as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let location = headers.get(header::LOCATION).map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, location, headers, body: String::from_utf8_lossy(&bytes).into_owned() }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let req = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body(fields)))
            .unwrap();
        self.send(req).await
    }

    pub async fn json(&self, method: Method, uri: &str, body: serde_json::Value) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    pub async fn post_multipart(&self, uri: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> TestResponse {
        let req = Request::post(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(multipart_body(file_name, content_type, bytes)))
            .unwrap();
        self.send(req).await
    }

    pub async fn cleanup(self) {
        let _ = tokio::fs::remove_dir_all(&self.root).await;
    }
}
