use crate::{
    services::reports::{AlertReportRow, FullReport, InventoryReportRow, SupplierReportRow},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, response::Json};
use tracing::info;

/// Dashboard report: summary counts plus the three detail reports
#[utoipa::path(
    get,
    path = "/api/reports/full",
    responses(
        (status = 200, description = "Full report", body = ApiResponse<FullReport>),
        (status = 500, description = "Report generation failed", body = ApiResponse<serde_json::Value>)
    ),
    tag = "reports"
)]
pub async fn full_report(State(state): State<AppState>) -> ApiResult<FullReport> {
    let report = state.report_service().full_report().await?;
    info!(
        total_items = report.summary.total_items,
        active_alerts = report.summary.active_alerts,
        "Generated full report"
    );
    Ok(Json(ApiResponse::success(report)))
}

/// Every item with its supplier name and derived labels
#[utoipa::path(
    get,
    path = "/api/reports/inventory",
    responses(
        (status = 200, description = "Inventory report", body = ApiResponse<Vec<InventoryReportRow>>),
        (status = 500, description = "Report generation failed", body = ApiResponse<serde_json::Value>)
    ),
    tag = "reports"
)]
pub async fn inventory_report(State(state): State<AppState>) -> ApiResult<Vec<InventoryReportRow>> {
    let rows = state.report_service().inventory_report().await?;
    Ok(Json(ApiResponse::success(rows)))
}

#[utoipa::path(
    get,
    path = "/api/reports/suppliers",
    responses(
        (status = 200, description = "Supplier report", body = ApiResponse<Vec<SupplierReportRow>>),
        (status = 500, description = "Report generation failed", body = ApiResponse<serde_json::Value>)
    ),
    tag = "reports"
)]
pub async fn supplier_report(State(state): State<AppState>) -> ApiResult<Vec<SupplierReportRow>> {
    let rows = state.report_service().supplier_report().await?;
    Ok(Json(ApiResponse::success(rows)))
}

#[utoipa::path(
    get,
    path = "/api/reports/alerts",
    responses(
        (status = 200, description = "Alerts newest first", body = ApiResponse<Vec<AlertReportRow>>),
        (status = 500, description = "Report generation failed", body = ApiResponse<serde_json::Value>)
    ),
    tag = "reports"
)]
pub async fn alerts_report(State(state): State<AppState>) -> ApiResult<Vec<AlertReportRow>> {
    let rows = state.report_service().alerts_report().await?;
    Ok(Json(ApiResponse::success(rows)))
}
