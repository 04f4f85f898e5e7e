pub mod error_verbosity;
pub mod request_id;

pub use error_verbosity::error_verbosity_middleware;
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
