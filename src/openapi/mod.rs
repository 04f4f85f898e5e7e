use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Smart Inventory API",
        version = "1.0.0",
        description = r#"
# Smart Inventory API

Track stock items, the suppliers that provide them and the alerts raised
against them, plus read-only dashboard reports.

## Responses

Every endpoint answers with the same envelope:

```json
{
  "success": true,
  "data": {},
  "message": "Item created successfully",
  "count": 1,
  "meta": { "requestId": "9b1d...", "timestamp": "2024-01-01T00:00:00Z" }
}
```

Validation failures are `400` with `success: false` and an `errors`
array of `{ "field", "message" }` entries. Unknown ids are `404`.

## Derived labels

Inventory reports attach labels to each item: `Low Stock`,
`Out of Stock`, `High Priority` and `Fragile`.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "items", description = "Stock items and stock updates"),
        (name = "suppliers", description = "Supplier management"),
        (name = "alerts", description = "Stock alerts and their status"),
        (name = "reports", description = "Read-only dashboard reports"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Items
        crate::handlers::items::list_items,
        crate::handlers::items::get_item,
        crate::handlers::items::create_item,
        crate::handlers::items::update_item,
        crate::handlers::items::delete_item,
        crate::handlers::items::update_stock,

        // Suppliers
        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::get_supplier,
        crate::handlers::suppliers::create_supplier,
        crate::handlers::suppliers::update_supplier,
        crate::handlers::suppliers::delete_supplier,

        // Alerts
        crate::handlers::alerts::list_alerts,
        crate::handlers::alerts::get_alert,
        crate::handlers::alerts::create_alert,
        crate::handlers::alerts::update_alert_status,
        crate::handlers::alerts::delete_alert,

        // Reports
        crate::handlers::reports::full_report,
        crate::handlers::reports::inventory_report,
        crate::handlers::reports::supplier_report,
        crate::handlers::reports::alerts_report,

        crate::health::health_check,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::ResponseMeta,
            crate::errors::FieldError,

            crate::handlers::items::ItemResponse,
            crate::handlers::items::SupplierRef,
            crate::handlers::items::CreateItemRequest,
            crate::handlers::items::UpdateItemRequest,
            crate::handlers::items::UpdateStockRequest,
            crate::handlers::items::StockUpdateResponse,

            crate::handlers::suppliers::SupplierResponse,
            crate::handlers::suppliers::CreateSupplierRequest,
            crate::handlers::suppliers::UpdateSupplierRequest,

            crate::handlers::alerts::AlertResponse,
            crate::handlers::alerts::ItemRef,
            crate::handlers::alerts::CreateAlertRequest,
            crate::handlers::alerts::UpdateAlertStatusRequest,

            crate::services::reports::FullReport,
            crate::services::reports::ReportSummary,
            crate::services::reports::InventoryReportRow,
            crate::services::reports::SupplierReportRow,
            crate::services::reports::AlertReportRow,
            crate::services::reports::ItemSummary,
            crate::services::labels::ItemLabel,

            crate::entities::SupplierType,
            crate::entities::AlertType,
            crate::entities::AlertStatus,
            crate::entities::AlertSeverity,

            crate::health::HealthInfo,
            crate::health::HealthDetail,
            crate::health::HealthStatus,
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
