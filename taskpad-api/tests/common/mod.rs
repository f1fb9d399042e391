#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// - Router over the in-memory store
/// - Session token minting with the configured secret
/// - Request helpers returning status and parsed JSON body

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use taskpad_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskpad_shared::{
    auth::jwt::{create_token, Claims},
    store::MemoryTodoStore,
};
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret-at-least-32-bytes";

/// Test context containing the router and its store
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryTodoStore>,
}

impl TestContext {
    /// Creates a router over an empty in-memory store
    pub fn new() -> Self {
        let config = Config::from_lookup(|key: &str| match key {
            "TODO_STORE" => Some("memory".to_string()),
            "SESSION_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .expect("test configuration");

        let store = Arc::new(MemoryTodoStore::new());
        let app = build_router(AppState::new(store.clone(), config));

        Self { app, store }
    }

    /// Sends a request and returns its status and JSON body (`Null` if empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                panic!("non-JSON body: {}", String::from_utf8_lossy(&body))
            })
        };

        (status, json)
    }

    /// JSON request with an optional bearer session
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, bearer(user));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    /// Form POST with an optional cookie session
    pub async fn form(&self, uri: &str, user: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(user) = user {
            builder = builder.header(header::COOKIE, session_cookie(user));
        }

        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

/// Session token for `user` signed with the test secret
pub fn token_for(user: &str) -> String {
    create_token(&Claims::new(user, None), SECRET).unwrap()
}

/// `Authorization` header value for `user`
pub fn bearer(user: &str) -> String {
    format!("Bearer {}", token_for(user))
}

/// `Cookie` header value carrying the session for `user`
pub fn session_cookie(user: &str) -> String {
    format!("theme=dark; __session={}", token_for(user))
}
