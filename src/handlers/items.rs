use crate::{
    entities::{item, supplier},
    errors::ServiceError,
    handlers::common::{
        checked_integer, created_response, double_option, parse_id, validate_price,
        validate_quantity, validate_reorder_level, CreatedResult, ValidatedJson,
    },
    services::items::{ItemChanges, NewItem, StockChange},
    ApiResponse, ApiResult, AppState,
};
use axum::extract::{Path, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Supplier reference embedded in item payloads
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupplierRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "name": "Laptop",
    "sku": "LAP-001",
    "description": "14 inch business laptop",
    "quantity": 3,
    "price": "1000.00",
    "priority": false,
    "reorderLevel": 5,
    "supplierId": null,
    "supplier": null,
    "createdAt": "2024-12-09T10:30:00Z",
    "updatedAt": "2024-12-09T10:30:00Z"
}))]
pub struct ItemResponse {
    pub id: i32,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub quantity: i32,
    /// Two-decimal price, serialized as a string
    #[schema(value_type = String, example = "1000.00")]
    pub price: Decimal,
    pub priority: bool,
    pub reorder_level: i32,
    pub supplier_id: Option<i32>,
    pub supplier: Option<SupplierRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(item::Model, Option<supplier::Model>)> for ItemResponse {
    fn from((model, supplier): (item::Model, Option<supplier::Model>)) -> Self {
        let mut price = model.price;
        price.rescale(2);
        Self {
            id: model.id,
            name: model.name,
            sku: model.sku,
            description: model.description,
            quantity: model.quantity,
            price,
            priority: model.priority,
            reorder_level: model.reorder_level,
            supplier_id: model.supplier_id,
            supplier: supplier.map(|s| SupplierRef {
                id: s.id,
                name: s.name,
            }),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "name": "Laptop",
    "sku": "LAP-001",
    "quantity": 3,
    "price": 1000,
    "reorderLevel": 5
}))]
pub struct CreateItemRequest {
    #[validate(
        required(message = "Item name is required"),
        length(min = 3, max = 100, message = "Item name must be between 3 and 100 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "SKU is required"),
        length(min = 1, max = 255, message = "SKU must be between 1 and 255 characters")
    )]
    pub sku: Option<String>,
    pub description: Option<String>,
    #[validate(required(message = "Quantity is required"), custom = "validate_quantity")]
    #[schema(value_type = i32, example = 3)]
    pub quantity: Option<serde_json::Number>,
    #[validate(required(message = "Price is required"), custom = "validate_price")]
    #[schema(value_type = f64, example = 1000.0)]
    pub price: Option<Decimal>,
    pub priority: Option<bool>,
    #[validate(custom = "validate_reorder_level")]
    #[schema(value_type = Option<i32>, example = 5)]
    pub reorder_level: Option<serde_json::Number>,
    pub supplier_id: Option<i32>,
}

impl CreateItemRequest {
    fn into_new_item(self) -> Result<NewItem, ServiceError> {
        let missing =
            |field: &str| ServiceError::invalid_field(field, format!("{} is required", field));
        let quantity = self.quantity.ok_or_else(|| missing("quantity"))?;
        let reorder_level = self
            .reorder_level
            .as_ref()
            .map(|n| checked_integer(n, "reorderLevel"))
            .transpose()?;

        Ok(NewItem {
            name: self.name.ok_or_else(|| missing("name"))?,
            sku: self.sku.ok_or_else(|| missing("sku"))?,
            description: self.description,
            quantity: checked_integer(&quantity, "quantity")?,
            price: self.price.ok_or_else(|| missing("price"))?,
            priority: self.priority,
            reorder_level,
            supplier_id: self.supplier_id,
        })
    }
}

/// Partial item update. Omitted fields keep their stored value; `null`
/// clears `description` or `supplierId`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"quantity": 0, "priority": true}))]
pub struct UpdateItemRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Item name must be between 3 and 100 characters"
    ))]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 255, message = "SKU must be between 1 and 255 characters")
    )]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(custom = "validate_quantity")]
    #[schema(value_type = Option<i32>)]
    pub quantity: Option<serde_json::Number>,
    #[validate(custom = "validate_price")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub priority: Option<bool>,
    #[validate(custom = "validate_reorder_level")]
    #[schema(value_type = Option<i32>)]
    pub reorder_level: Option<serde_json::Number>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub supplier_id: Option<Option<i32>>,
}

impl UpdateItemRequest {
    fn into_changes(self) -> Result<ItemChanges, ServiceError> {
        Ok(ItemChanges {
            name: self.name,
            sku: self.sku,
            description: self.description,
            quantity: self
                .quantity
                .as_ref()
                .map(|n| checked_integer(n, "quantity"))
                .transpose()?,
            price: self.price,
            priority: self.priority,
            reorder_level: self
                .reorder_level
                .as_ref()
                .map(|n| checked_integer(n, "reorderLevel"))
                .transpose()?,
            supplier_id: self.supplier_id,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"itemId": 1, "quantity": 25}))]
pub struct UpdateStockRequest {
    pub item_id: Option<i32>,
    #[validate(custom = "validate_quantity")]
    #[schema(value_type = i32, example = 25)]
    pub quantity: Option<serde_json::Number>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdateResponse {
    pub item_id: i32,
    pub item_name: String,
    pub old_quantity: i32,
    pub new_quantity: i32,
}

impl From<StockChange> for StockUpdateResponse {
    fn from(change: StockChange) -> Self {
        Self {
            item_id: change.item_id,
            item_name: change.item_name,
            old_quantity: change.old_quantity,
            new_quantity: change.new_quantity,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "Items listed with their suppliers", body = ApiResponse<Vec<ItemResponse>>)
    ),
    tag = "items"
)]
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Vec<ItemResponse>> {
    let items = state.item_service().list_items().await?;
    Ok(Json(ApiResponse::list(
        items.into_iter().map(ItemResponse::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item fetched", body = ApiResponse<ItemResponse>),
        (status = 404, description = "Item not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ItemResponse> {
    let id = parse_id(&id, "Item")?;
    let item = state.item_service().get_item(id).await?;
    Ok(Json(ApiResponse::success(ItemResponse::from(item))))
}

#[utoipa::path(
    post,
    path = "/api/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ApiResponse<ItemResponse>),
        (status = 400, description = "Validation error or duplicate SKU", body = ApiResponse<serde_json::Value>)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> CreatedResult<ItemResponse> {
    let created = state
        .item_service()
        .create_item(payload.into_new_item()?)
        .await?;
    Ok(created_response(
        ApiResponse::success(ItemResponse::from(created)).with_message("Item created successfully"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<ItemResponse>),
        (status = 400, description = "Validation error or duplicate SKU", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Item not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateItemRequest>,
) -> ApiResult<ItemResponse> {
    let id = parse_id(&id, "Item")?;
    let updated = state
        .item_service()
        .update_item(id, payload.into_changes()?)
        .await?;
    Ok(Json(
        ApiResponse::success(ItemResponse::from(updated)).with_message("Item updated successfully"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Item not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "items"
)]
pub async fn delete_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, "Item")?;
    state.item_service().delete_item(id).await?;
    Ok(Json(ApiResponse::message("Item deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/items/update-stock",
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock updated", body = ApiResponse<StockUpdateResponse>),
        (status = 400, description = "Missing or invalid fields", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Item not found", body = ApiResponse<serde_json::Value>)
    ),
    tag = "items"
)]
pub async fn update_stock(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateStockRequest>,
) -> ApiResult<StockUpdateResponse> {
    // Ids start at 1, so a zero id counts as missing
    let item_id = payload.item_id.filter(|id| *id > 0);
    let (Some(item_id), Some(quantity)) = (item_id, payload.quantity) else {
        return Err(ServiceError::BadRequest(
            "itemId and quantity are required".to_string(),
        ));
    };
    let quantity = checked_integer(&quantity, "quantity")?;

    let change = state.item_service().update_stock(item_id, quantity).await?;
    Ok(Json(
        ApiResponse::success(StockUpdateResponse::from(change))
            .with_message("Stock updated successfully"),
    ))
}
