use crate::{
    entities::{item, supplier, SupplierType},
    errors::ServiceError,
    handlers::common::{
        created_response, double_option, parse_id, parse_label, CreatedResult, ValidatedJson,
    },
    services::{
        reports::ItemSummary,
        suppliers::{NewSupplier, SupplierChanges},
    },
    ApiResponse, ApiResult, AppState,
};
use axum::extract::{Path, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

const INVALID_TYPE: &str = "Invalid supplier type";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "name": "Acme Components",
    "type": "Local",
    "email": "orders@acme.example",
    "phone": "+1-555-0100",
    "address": "1 Industrial Way",
    "city": "Springfield",
    "country": "US",
    "items": [{"id": 1, "name": "Laptop", "quantity": 3}],
    "createdAt": "2024-12-09T10:30:00Z",
    "updatedAt": "2024-12-09T10:30:00Z"
}))]
pub struct SupplierResponse {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub supplier_type: SupplierType,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub items: Vec<ItemSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(supplier::Model, Vec<item::Model>)> for SupplierResponse {
    fn from((model, items): (supplier::Model, Vec<item::Model>)) -> Self {
        Self {
            id: model.id,
            name: model.name,
            supplier_type: model.supplier_type,
            email: model.email,
            phone: model.phone,
            address: model.address,
            city: model.city,
            country: model.country,
            items: items.iter().map(ItemSummary::from).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "name": "Acme Components",
    "type": "Local",
    "email": "orders@acme.example"
}))]
pub struct CreateSupplierRequest {
    #[validate(
        required(message = "Supplier name is required"),
        length(min = 3, max = 100, message = "Supplier name must be between 3 and 100 characters")
    )]
    pub name: Option<String>,
    /// Local, International or General (default)
    #[serde(rename = "type")]
    pub supplier_type: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl CreateSupplierRequest {
    fn into_new_supplier(self) -> Result<NewSupplier, ServiceError> {
        let supplier_type = parse_label(self.supplier_type.as_deref(), "type", INVALID_TYPE)?;
        Ok(NewSupplier {
            name: self
                .name
                .ok_or_else(|| ServiceError::invalid_field("name", "Supplier name is required"))?,
            supplier_type,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            country: self.country,
        })
    }
}

/// Partial supplier update; `null` clears an optional contact field.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"phone": null, "city": "Lisbon"}))]
pub struct UpdateSupplierRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Supplier name must be between 3 and 100 characters"
    ))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub supplier_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(email(message = "Invalid email format"))]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub country: Option<Option<String>>,
}

impl UpdateSupplierRequest {
    fn into_changes(self) -> Result<SupplierChanges, ServiceError> {
        Ok(SupplierChanges {
            supplier_type: parse_label(self.supplier_type.as_deref(), "type", INVALID_TYPE)?,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            country: self.country,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    responses(
        (status = 200, description = "Suppliers listed with their items", body = ApiResponse<Vec<SupplierResponse>>)
    ),
    tag = "suppliers"
)]
pub async fn list_suppliers(State(state): State<AppState>) -> ApiResult<Vec<SupplierResponse>> {
    let suppliers = state.supplier_service().list_suppliers().await?;
    Ok(Json(ApiResponse::list(
        suppliers.into_iter().map(SupplierResponse::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier fetched", body = ApiResponse<SupplierResponse>),
        (status = 404, description = "Supplier not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "suppliers"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SupplierResponse> {
    let id = parse_id(&id, "Supplier")?;
    let supplier = state.supplier_service().get_supplier(id).await?;
    Ok(Json(ApiResponse::success(SupplierResponse::from(supplier))))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = ApiResponse<SupplierResponse>),
        (status = 400, description = "Validation error", body = ApiResponse<serde_json::Value>)
    ),
    tag = "suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSupplierRequest>,
) -> CreatedResult<SupplierResponse> {
    let created = state
        .supplier_service()
        .create_supplier(payload.into_new_supplier()?)
        .await?;
    Ok(created_response(
        ApiResponse::success(SupplierResponse::from(created))
            .with_message("Supplier created successfully"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier ID")),
    request_body = UpdateSupplierRequest,
    responses(
        (status = 200, description = "Supplier updated", body = ApiResponse<SupplierResponse>),
        (status = 400, description = "Validation error", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Supplier not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateSupplierRequest>,
) -> ApiResult<SupplierResponse> {
    let id = parse_id(&id, "Supplier")?;
    let updated = state
        .supplier_service()
        .update_supplier(id, payload.into_changes()?)
        .await?;
    Ok(Json(
        ApiResponse::success(SupplierResponse::from(updated))
            .with_message("Supplier updated successfully"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier deleted; its items become unassigned", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Supplier not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "Supplier")?;
    state.supplier_service().delete_supplier(id).await?;
    Ok(Json(ApiResponse::message("Supplier deleted successfully")))
}
