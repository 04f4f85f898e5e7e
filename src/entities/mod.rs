pub mod alert;
pub mod item;
pub mod supplier;

pub use alert::{AlertSeverity, AlertStatus, AlertType};
pub use supplier::SupplierType;
