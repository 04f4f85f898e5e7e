use crate::{
    entities::{alert, item, AlertSeverity, AlertStatus, AlertType},
    errors::ServiceError,
    handlers::common::{created_response, parse_id, parse_label, CreatedResult, ValidatedJson},
    services::alerts::{AlertFilter, NewAlert},
    ApiResponse, ApiResult, AppState,
};
use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 7,
    "itemName": "Laptop",
    "itemId": 1,
    "message": "Laptop stock is below reorder level",
    "type": "Low Stock",
    "status": "Active",
    "severity": "Medium",
    "item": {"id": 1, "name": "Laptop"},
    "createdAt": "2024-12-09T10:30:00Z",
    "updatedAt": "2024-12-09T10:30:00Z"
}))]
pub struct AlertResponse {
    pub id: i32,
    pub item_name: String,
    pub item_id: Option<i32>,
    pub message: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub status: AlertStatus,
    pub severity: AlertSeverity,
    pub item: Option<ItemRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(alert::Model, Option<item::Model>)> for AlertResponse {
    fn from((model, linked): (alert::Model, Option<item::Model>)) -> Self {
        Self {
            id: model.id,
            item_name: model.item_name,
            item_id: model.item_id,
            message: model.message,
            alert_type: model.alert_type,
            status: model.status,
            severity: model.severity,
            item: linked.map(|i| ItemRef {
                id: i.id,
                name: i.name,
            }),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertListQuery {
    /// Active, Resolved or Dismissed
    pub status: Option<String>,
    /// Low, Medium, High or Critical
    pub severity: Option<String>,
    /// Low Stock, Out of Stock, Reorder or Info
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub alert_type: Option<String>,
}

impl AlertListQuery {
    fn into_filter(self) -> Result<AlertFilter, ServiceError> {
        Ok(AlertFilter {
            status: parse_label(self.status.as_deref(), "status", "Invalid status")?,
            severity: parse_label(self.severity.as_deref(), "severity", "Invalid severity")?,
            alert_type: parse_label(self.alert_type.as_deref(), "type", "Invalid alert type")?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "itemName": "Laptop",
    "itemId": 1,
    "message": "Laptop stock is below reorder level",
    "severity": "High"
}))]
pub struct CreateAlertRequest {
    #[validate(
        required(message = "Item name is required"),
        length(min = 1, message = "Item name is required")
    )]
    pub item_name: Option<String>,
    pub item_id: Option<i32>,
    #[validate(
        required(message = "Message is required"),
        length(min = 1, message = "Message is required")
    )]
    pub message: Option<String>,
    /// Defaults to "Low Stock"
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    /// Defaults to "Medium"
    pub severity: Option<String>,
}

impl CreateAlertRequest {
    fn into_new_alert(self) -> Result<NewAlert, ServiceError> {
        Ok(NewAlert {
            alert_type: parse_label(self.alert_type.as_deref(), "type", "Invalid alert type")?,
            severity: parse_label(self.severity.as_deref(), "severity", "Invalid severity")?,
            item_name: self
                .item_name
                .ok_or_else(|| ServiceError::invalid_field("itemName", "Item name is required"))?,
            item_id: self.item_id,
            message: self
                .message
                .ok_or_else(|| ServiceError::invalid_field("message", "Message is required"))?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"status": "Resolved"}))]
pub struct UpdateAlertStatusRequest {
    /// Active, Resolved or Dismissed
    pub status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/alerts",
    params(AlertListQuery),
    responses(
        (status = 200, description = "Alerts listed newest first", body = ApiResponse<Vec<AlertResponse>>),
        (status = 400, description = "Unknown filter value", body = ApiResponse<serde_json::Value>)
    ),
    tag = "alerts"
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertListQuery>,
) -> ApiResult<Vec<AlertResponse>> {
    let alerts = state.alert_service().list_alerts(query.into_filter()?).await?;
    Ok(Json(ApiResponse::list(
        alerts.into_iter().map(AlertResponse::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/alerts/{id}",
    params(("id" = i32, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert fetched", body = ApiResponse<AlertResponse>),
        (status = 404, description = "Alert not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "alerts"
)]
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AlertResponse> {
    let id = parse_id(&id, "Alert")?;
    let alert = state.alert_service().get_alert(id).await?;
    Ok(Json(ApiResponse::success(AlertResponse::from(alert))))
}

#[utoipa::path(
    post,
    path = "/api/alerts",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created as Active", body = ApiResponse<AlertResponse>),
        (status = 400, description = "Validation error", body = ApiResponse<serde_json::Value>)
    ),
    tag = "alerts"
)]
pub async fn create_alert(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAlertRequest>,
) -> CreatedResult<AlertResponse> {
    let created = state
        .alert_service()
        .create_alert(payload.into_new_alert()?)
        .await?;
    Ok(created_response(
        ApiResponse::success(AlertResponse::from(created))
            .with_message("Alert created successfully"),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/alerts/{id}/status",
    params(("id" = i32, Path, description = "Alert ID")),
    request_body = UpdateAlertStatusRequest,
    responses(
        (status = 200, description = "Alert status updated", body = ApiResponse<AlertResponse>),
        (status = 400, description = "Invalid status", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Alert not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "alerts"
)]
pub async fn update_alert_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Option<ValidatedJson<UpdateAlertStatusRequest>>,
) -> ApiResult<AlertResponse> {
    // A missing or unreadable body carries no status either
    let raw = payload.and_then(|ValidatedJson(body)| body.status);
    let invalid = || ServiceError::BadRequest("Invalid status".to_string());
    let status = parse_label::<AlertStatus>(raw.as_deref(), "status", "Invalid status")
        .map_err(|_| invalid())?
        .ok_or_else(invalid)?;
    let id = parse_id(&id, "Alert")?;

    let updated = state.alert_service().update_status(id, status).await?;
    Ok(Json(
        ApiResponse::success(AlertResponse::from(updated))
            .with_message("Alert status updated successfully"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/alerts/{id}",
    params(("id" = i32, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Alert not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "alerts"
)]
pub async fn delete_alert(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, "Alert")?;
    state.alert_service().delete_alert(id).await?;
    Ok(Json(ApiResponse::message("Alert deleted successfully")))
}
