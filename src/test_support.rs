//! Helpers for tests that need a live HTTP peer: fake Azure DevOps and
//! completion endpoints, and the app itself.

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use crate::notes::{ChatCompletion, ChatMessage, GenerationError};

/// What a fake upstream saw on its last request.
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    pub path: String,
    pub params: HashMap<String, String>,
    pub authorization: String,
    pub content_type: String,
    pub body: serde_json::Value,
}

/// Shared slot a fake upstream writes into so the test can inspect it.
#[derive(Debug, Clone, Default)]
pub struct Captured(Arc<Mutex<Option<CapturedRequest>>>);

impl Captured {
    pub fn record(&self, path: String, params: HashMap<String, String>, headers: &HeaderMap) {
        *self.0.lock().unwrap() = Some(CapturedRequest {
            path,
            params,
            authorization: header_text(headers, "authorization"),
            content_type: header_text(headers, "content-type"),
            ..Default::default()
        });
    }

    pub fn record_body(&self, authorization: String, body: serde_json::Value) {
        *self.0.lock().unwrap() = Some(CapturedRequest {
            authorization,
            body,
            ..Default::default()
        });
    }

    pub fn take(&self) -> Option<CapturedRequest> {
        self.0.lock().unwrap().take()
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Serve `app` on an ephemeral local port and return its address.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

/// Serve `app` and return its base URL, e.g. `http://127.0.0.1:40123`.
pub async fn spawn_upstream(app: Router) -> String {
    format!("http://{}", spawn_server(app).await)
}

/// Canned backend that records what it was asked.
pub struct StubCompletion {
    reply: Result<String, u16>,
    pub seen: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl StubCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatCompletion for StubCompletion {
    async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<String, GenerationError> {
        self.seen
            .lock()
            .unwrap()
            .push((api_key.to_string(), messages.to_vec()));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(GenerationError::Status {
                status: *status,
                body: "invalid_api_key".to_string(),
            }),
        }
    }
}
