//! Smart Inventory API Library
//!
//! Items, suppliers and stock alerts over a relational store, plus the
//! read-only dashboard reports built from them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::FieldError;
use crate::services::AppServices;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub services: AppServices,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        Self {
            services: AppServices::new(db.clone()),
            db,
            config,
            started_at: Instant::now(),
        }
    }

    pub fn item_service(&self) -> Arc<services::items::ItemService> {
        self.services.items.clone()
    }

    pub fn supplier_service(&self) -> Arc<services::suppliers::SupplierService> {
        self.services.suppliers.clone()
    }

    pub fn alert_service(&self) -> Arc<services::alerts::AlertService> {
        self.services.alerts.clone()
    }

    pub fn report_service(&self) -> Arc<services::reports::ReportService> {
        self.services.reports.clone()
    }
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    fn envelope(success: bool) -> Self {
        Self {
            success,
            data: None,
            message: None,
            count: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::envelope(true)
        }
    }

    /// Success without a payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::envelope(true)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::envelope(false)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Collection response carrying its `count`.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            count: Some(items.len()),
            data: Some(items),
            ..Self::envelope(true)
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_routes() -> Router<AppState> {
    let items = Router::new()
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route("/items/update-stock", post(handlers::items::update_stock))
        .route(
            "/items/:id",
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        );

    let suppliers = Router::new()
        .route(
            "/suppliers",
            get(handlers::suppliers::list_suppliers).post(handlers::suppliers::create_supplier),
        )
        .route(
            "/suppliers/:id",
            get(handlers::suppliers::get_supplier)
                .put(handlers::suppliers::update_supplier)
                .delete(handlers::suppliers::delete_supplier),
        );

    let alerts = Router::new()
        .route(
            "/alerts",
            get(handlers::alerts::list_alerts).post(handlers::alerts::create_alert),
        )
        .route(
            "/alerts/:id",
            get(handlers::alerts::get_alert).delete(handlers::alerts::delete_alert),
        )
        .route(
            "/alerts/:id/status",
            patch(handlers::alerts::update_alert_status),
        );

    let reports = Router::new()
        .route("/reports/full", get(handlers::reports::full_report))
        .route("/reports/inventory", get(handlers::reports::inventory_report))
        .route("/reports/suppliers", get(handlers::reports::supplier_report))
        .route("/reports/alerts", get(handlers::reports::alerts_report));

    Router::new()
        .merge(items)
        .merge(suppliers)
        .merge(alerts)
        .merge(reports)
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("Route not found")),
    )
}

/// CORS from config: explicit origins win, then the permissive fallback,
/// otherwise no cross-origin access.
pub fn build_cors_layer(cfg: &AppConfig) -> CorsLayer {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Full application router: `/api`, `/health`, Swagger UI and the
/// middleware stack, with state applied.
pub fn build_router(state: AppState) -> Router {
    let expose_internal_errors = state.config.expose_internal_errors();
    let cors_layer = build_cors_layer(&state.config);

    Router::new()
        .nest("/api", api_routes())
        .nest("/health", health::health_routes())
        .merge(openapi::swagger_ui())
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn_with_state(
            expose_internal_errors,
            middleware_helpers::error_verbosity_middleware,
        ))
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        // Outermost, so every other layer sees the request id
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-err"), async {
                ApiResponse::<()>::error("oops")
            })
            .await;

        assert!(!response.success);
        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
    }

    #[test]
    fn list_response_counts_items() {
        let response = ApiResponse::list(vec![1, 2, 3]);
        assert_eq!(response.count, Some(3));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert!(json.get("errors").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn message_response_omits_data() {
        let json =
            serde_json::to_value(ApiResponse::<()>::message("Item deleted successfully")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Item deleted successfully");
        assert!(json.get("data").is_none());
    }
}
