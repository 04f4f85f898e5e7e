use crate::{
    db::DbPool,
    entities::{alert, item, supplier, AlertSeverity, AlertStatus, AlertType, SupplierType},
    errors::ServiceError,
    services::labels::{compute_labels, ItemLabel},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DbErr, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

/// Supplier name shown for items without one.
pub const UNASSIGNED_SUPPLIER: &str = "Not assigned";

/// Service for the read-only dashboard reports
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

/// One inventory row with its derived labels
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "name": "Laptop",
    "sku": "LAP-001",
    "quantity": 3,
    "price": "1000.00",
    "supplier": "Not assigned",
    "labels": ["Low Stock"]
}))]
pub struct InventoryReportRow {
    pub id: i32,
    pub name: String,
    pub sku: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "1000.00")]
    pub price: Decimal,
    /// Supplier name or "Not assigned"
    pub supplier: String,
    pub labels: Vec<ItemLabel>,
}

/// Compact item reference used inside supplier payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemSummary {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
}

impl From<&item::Model> for ItemSummary {
    fn from(model: &item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            quantity: model.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierReportRow {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub supplier_type: SupplierType,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub items_count: usize,
    pub items: Vec<ItemSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertReportRow {
    pub id: i32,
    pub item_name: String,
    pub message: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_items: usize,
    pub total_suppliers: usize,
    pub active_alerts: usize,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
}

impl ReportSummary {
    pub fn from_rows(
        items: &[InventoryReportRow],
        suppliers: &[SupplierReportRow],
        alerts: &[AlertReportRow],
    ) -> Self {
        let with_label =
            |label: ItemLabel| items.iter().filter(|row| row.labels.contains(&label)).count();

        Self {
            total_items: items.len(),
            total_suppliers: suppliers.len(),
            active_alerts: alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Active)
                .count(),
            low_stock_items: with_label(ItemLabel::LowStock),
            out_of_stock_items: with_label(ItemLabel::OutOfStock),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullReport {
    pub timestamp: DateTime<Utc>,
    pub summary: ReportSummary,
    pub items: Vec<InventoryReportRow>,
    pub suppliers: Vec<SupplierReportRow>,
    pub alerts: Vec<AlertReportRow>,
}

pub fn inventory_row(model: item::Model, supplier: Option<supplier::Model>) -> InventoryReportRow {
    let labels = compute_labels(model.quantity, model.reorder_level, model.priority, &model.name);
    let mut price = model.price;
    price.rescale(2);

    InventoryReportRow {
        id: model.id,
        name: model.name,
        sku: model.sku,
        quantity: model.quantity,
        price,
        supplier: supplier
            .map(|s| s.name)
            .unwrap_or_else(|| UNASSIGNED_SUPPLIER.to_string()),
        labels,
    }
}

pub fn supplier_row(model: supplier::Model, items: Vec<item::Model>) -> SupplierReportRow {
    let items: Vec<ItemSummary> = items.iter().map(ItemSummary::from).collect();
    SupplierReportRow {
        id: model.id,
        name: model.name,
        supplier_type: model.supplier_type,
        email: model.email,
        phone: model.phone,
        items_count: items.len(),
        items,
    }
}

impl From<alert::Model> for AlertReportRow {
    fn from(model: alert::Model) -> Self {
        Self {
            id: model.id,
            item_name: model.item_name,
            message: model.message,
            alert_type: model.alert_type,
            severity: model.severity,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

fn report_failure(report: &'static str) -> impl FnOnce(DbErr) -> ServiceError {
    move |e| {
        error!(report, error = %e, "Report query failed");
        ServiceError::ReportError(format!("Failed to generate {} report", report))
    }
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Every item with supplier name and labels
    #[instrument(skip(self))]
    pub async fn inventory_report(&self) -> Result<Vec<InventoryReportRow>, ServiceError> {
        let db = &*self.db_pool;
        let rows = item::Entity::find()
            .find_also_related(supplier::Entity)
            .order_by_asc(item::Column::Id)
            .all(db)
            .await
            .map_err(report_failure("inventory"))?;

        Ok(rows
            .into_iter()
            .map(|(model, supplier)| inventory_row(model, supplier))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn supplier_report(&self) -> Result<Vec<SupplierReportRow>, ServiceError> {
        let db = &*self.db_pool;
        let rows = supplier::Entity::find()
            .find_with_related(item::Entity)
            .order_by_asc(supplier::Column::Id)
            .order_by_asc(item::Column::Id)
            .all(db)
            .await
            .map_err(report_failure("supplier"))?;

        Ok(rows
            .into_iter()
            .map(|(model, items)| supplier_row(model, items))
            .collect())
    }

    /// All alerts, newest first
    #[instrument(skip(self))]
    pub async fn alerts_report(&self) -> Result<Vec<AlertReportRow>, ServiceError> {
        let db = &*self.db_pool;
        let rows = alert::Entity::find()
            .order_by_desc(alert::Column::CreatedAt)
            .order_by_desc(alert::Column::Id)
            .all(db)
            .await
            .map_err(report_failure("alerts"))?;

        Ok(rows.into_iter().map(AlertReportRow::from).collect())
    }

    /// Runs the three reports concurrently; any failure fails the whole report.
    #[instrument(skip(self))]
    pub async fn full_report(&self) -> Result<FullReport, ServiceError> {
        let (items, suppliers, alerts) = tokio::try_join!(
            self.inventory_report(),
            self.supplier_report(),
            self.alerts_report()
        )
        .map_err(|e| {
            error!(error = %e, "Full report aborted");
            ServiceError::ReportError("Failed to generate full report".to_string())
        })?;

        let summary = ReportSummary::from_rows(&items, &suppliers, &alerts);
        info!(
            total_items = summary.total_items,
            active_alerts = summary.active_alerts,
            "Full report generated"
        );

        Ok(FullReport {
            timestamp: Utc::now(),
            summary,
            items,
            suppliers,
            alerts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item_model(id: i32, name: &str, quantity: i32, reorder_level: i32) -> item::Model {
        item::Model {
            id,
            name: name.to_string(),
            sku: format!("SKU-{}", id),
            description: None,
            quantity,
            price: dec!(1000),
            priority: false,
            reorder_level,
            supplier_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unassigned_item_row() {
        let row = inventory_row(item_model(1, "Laptop", 3, 5), None);
        assert_eq!(row.supplier, UNASSIGNED_SUPPLIER);
        assert_eq!(row.labels, vec![ItemLabel::LowStock]);
        assert_eq!(row.price.to_string(), "1000.00");
    }

    #[test]
    fn summary_counts_labels_and_active_alerts() {
        let items = vec![
            inventory_row(item_model(1, "Laptop", 3, 5), None),
            inventory_row(item_model(2, "Mouse", 0, 5), None),
            inventory_row(item_model(3, "Desk", 40, 5), None),
        ];
        let alert = |id, status| AlertReportRow {
            id,
            item_name: "Laptop".into(),
            message: "low".into(),
            alert_type: AlertType::LowStock,
            severity: AlertSeverity::Medium,
            status,
            created_at: Utc::now(),
        };
        let alerts = vec![
            alert(1, AlertStatus::Active),
            alert(2, AlertStatus::Resolved),
            alert(3, AlertStatus::Active),
        ];

        let summary = ReportSummary::from_rows(&items, &[], &alerts);
        assert_eq!(
            summary,
            ReportSummary {
                total_items: 3,
                total_suppliers: 0,
                active_alerts: 2,
                low_stock_items: 2,
                out_of_stock_items: 1,
            }
        );
    }

    #[test]
    fn supplier_row_counts_items() {
        let supplier = supplier::Model {
            id: 9,
            name: "Acme".into(),
            supplier_type: SupplierType::Local,
            email: Some("acme@example.com".into()),
            phone: None,
            address: None,
            city: None,
            country: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let row = supplier_row(supplier, vec![item_model(1, "Laptop", 3, 5)]);
        assert_eq!(row.items_count, 1);
        assert_eq!(row.items[0].name, "Laptop");

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["type"], "Local");
        assert_eq!(json["itemsCount"], 1);
    }
}
