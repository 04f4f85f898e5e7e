pub mod alerts;
pub mod items;
pub mod labels;
pub mod reports;
pub mod suppliers;

use crate::db::DbPool;
use std::sync::Arc;

/// Service container shared through `AppState`
#[derive(Clone)]
pub struct AppServices {
    pub items: Arc<items::ItemService>,
    pub suppliers: Arc<suppliers::SupplierService>,
    pub alerts: Arc<alerts::AlertService>,
    pub reports: Arc<reports::ReportService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            items: Arc::new(items::ItemService::new(db_pool.clone())),
            suppliers: Arc::new(suppliers::SupplierService::new(db_pool.clone())),
            alerts: Arc::new(alerts::AlertService::new(db_pool.clone())),
            reports: Arc::new(reports::ReportService::new(db_pool)),
        }
    }
}
