/*!
 * # Health Check Module
 *
 * - Basic health check (`/health`): overall status plus a database ping
 * - Liveness check (`/health/live`): process is up, no dependencies touched
 * - Version info (`/health/version`)
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{collections::HashMap, time::Instant};
use tracing::debug;
use utoipa::ToSchema;

use crate::{db, AppState};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthDetail {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub details: HashMap<String, HealthDetail>,
}

async fn database_detail(state: &AppState) -> HealthDetail {
    let started = Instant::now();
    match db::check_connection(&state.db).await {
        Ok(latency) => HealthDetail {
            status: HealthStatus::Up,
            message: None,
            latency_ms: latency.as_millis() as u64,
        },
        Err(_) => HealthDetail {
            status: HealthStatus::Down,
            message: Some("database unreachable".to_string()),
            latency_ms: started.elapsed().as_millis() as u64,
        },
    }
}

/// Collects component checks into one report
pub async fn collect_health(state: &AppState) -> HealthInfo {
    let mut details = HashMap::new();
    details.insert("database".to_string(), database_detail(state).await);

    let status = if details.values().any(|d| d.status == HealthStatus::Down) {
        HealthStatus::Down
    } else {
        HealthStatus::Up
    };

    HealthInfo {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        details,
    }
}

/// Service status with a database ping; 503 when any component is down
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All components healthy", body = HealthInfo),
        (status = 503, description = "A component is down", body = HealthInfo)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check endpoint called");
    let health = collect_health(&state).await;
    let status_code = match health.status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    metrics::gauge!(
        "inventory_health.up",
        if health.status == HealthStatus::Up { 1.0 } else { 0.0 }
    );
    (status_code, Json(health))
}

pub async fn liveness_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "alive": true,
            "uptime_seconds": state.started_at.elapsed().as_secs(),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness_check))
        .route("/version", get(version_info))
}
