//! In-process application harness
//!
//! Requests go through `tower::ServiceExt::oneshot` on the real router, so
//! routing, the auth layer and error conversion are all exercised.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;

use church_admin::backend::routes::create_router;
use church_admin::backend::server::{build_state, AppState, ServerConfig, Stores};
use church_admin::shared::Role;

use super::auth_helpers::{auth_header, create_test_admin, TestAdmin, TEST_SECRET};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Account with the `Admin` role
    pub admin: TestAdmin,
    /// Authenticated account that lacks the `Admin` role
    pub moderator: TestAdmin,
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        access_secret: TEST_SECRET.to_string(),
        token_ttl: Duration::hours(1),
        database_url: None,
        bootstrap_admin: None,
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let state = build_state(&test_config(), Stores::memory());
        let admin = create_test_admin(state.admins.as_ref(), &state.issuer, "pastor", Role::Admin).await;
        let moderator = create_test_admin(state.admins.as_ref(), &state.issuer, "usher", Role::Moderator).await;
        let router = create_router(state.clone());
        Self {
            router,
            state,
            admin,
            moderator,
        }
    }

    /// Send a request and return the status and body
    ///
    /// JSON bodies are parsed; anything else comes back as a JSON string.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, auth_header(token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// Register a live session directly in the registry and return its outbound queue
    pub fn live_session(&self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.registry.register(tx);
        rx
    }

    pub fn registry(&self) -> Arc<church_admin::backend::realtime::ConnectionRegistry> {
        Arc::clone(&self.state.registry)
    }
}

/// Wait for the next broadcast frame on a live session
pub async fn next_frame(rx: &mut mpsc::UnboundedReceiver<String>) -> Value {
    let frame = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
        .await
        .expect("no broadcast within 2s")
        .expect("session queue closed");
    serde_json::from_str(&frame).expect("broadcast frame is not JSON")
}

/// Assert that nothing is broadcast within a short window
pub async fn assert_no_frame(rx: &mut mpsc::UnboundedReceiver<String>) {
    let waited = tokio::time::timeout(std::time::Duration::from_millis(150), rx.recv()).await;
    assert!(waited.is_err(), "unexpected broadcast: {:?}", waited);
}
