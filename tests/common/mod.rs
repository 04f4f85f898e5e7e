#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use smart_inventory::{config::AppConfig, db, AppState};
use tower::ServiceExt;

/// Helper harness for spinning up the full router backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Same as [`TestApp::new`] but lets the caller tweak the configuration first.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        tweak(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = smart_inventory::build_router(state.clone());

        Self { router, state }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };
        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a raw body, for malformed JSON cases.
    pub async fn request_raw(&self, method: Method, uri: &str, raw: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw.to_string()))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends the request and returns status plus parsed JSON body.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (u16, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status().as_u16();
        (status, response_json(response).await)
    }

    /// Creates a supplier and returns its id.
    pub async fn create_supplier(&self, payload: Value) -> i64 {
        let (status, body) = self.call(Method::POST, "/api/suppliers", Some(payload)).await;
        assert_eq!(status, 201, "supplier create failed: {body}");
        body["data"]["id"].as_i64().expect("supplier id")
    }

    /// Creates an item and returns its id.
    pub async fn create_item(&self, payload: Value) -> i64 {
        let (status, body) = self.call(Method::POST, "/api/items", Some(payload)).await;
        assert_eq!(status, 201, "item create failed: {body}");
        body["data"]["id"].as_i64().expect("item id")
    }

    /// Creates an alert and returns its id.
    pub async fn create_alert(&self, payload: Value) -> i64 {
        let (status, body) = self.call(Method::POST, "/api/alerts", Some(payload)).await;
        assert_eq!(status, 201, "alert create failed: {body}");
        body["data"]["id"].as_i64().expect("alert id")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Field names reported in a validation error envelope.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
