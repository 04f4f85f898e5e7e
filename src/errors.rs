use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{middleware_helpers::error_verbosity, ApiResponse};

/// Message returned for unclassified failures when details are hidden.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation Error";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"field": "quantity", "message": "Quantity must be a non-negative integer"}))]
pub struct FieldError {
    #[schema(example = "quantity")]
    pub field: String,
    #[schema(example = "Quantity must be a non-negative integer")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    DatabaseError(#[from] DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation Error")]
    ValidationError(Vec<FieldError>),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ReportError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let name = camel_case(field);
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", name));
                    FieldError::new(name.clone(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ServiceError::ValidationError(fields)
    }
}

impl ServiceError {
    /// Single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::ValidationError(vec![FieldError::new(field, message)])
    }

    pub fn not_found(entity: &str) -> Self {
        ServiceError::NotFound(format!("{} not found", entity))
    }

    /// Maps a write failure, turning unique-constraint violations into an
    /// `AlreadyExists` error on `unique_field`.
    pub fn from_write(err: DbErr, unique_field: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ServiceError::AlreadyExists(unique_field.to_string())
            }
            _ => ServiceError::DatabaseError(err),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::AlreadyExists(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::DatabaseError(_) | Self::ReportError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Server-side failures are masked unless the request runs with verbose errors.
    pub fn response_message(&self) -> String {
        if self.status_code().is_server_error() && !error_verbosity::internal_errors_exposed() {
            return INTERNAL_ERROR_MESSAGE.to_string();
        }
        self.to_string()
    }

    fn field_errors(&self) -> Option<Vec<FieldError>> {
        match self {
            Self::ValidationError(fields) => Some(fields.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let mut body = ApiResponse::<()>::error(self.response_message());
        body.errors = self.field_errors();

        (status, Json(body)).into_response()
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
