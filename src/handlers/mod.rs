pub mod alerts;
pub mod common;
pub mod items;
pub mod reports;
pub mod suppliers;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
