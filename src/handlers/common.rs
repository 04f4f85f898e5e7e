use crate::{
    errors::{FieldError, ServiceError},
    ApiResponse,
};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use sea_orm::ActiveEnum;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::{Validate, ValidationError};

/// Result of a create handler: 201 plus the envelope.
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ServiceError>;

/// Standard created response
pub fn created_response<T>(body: ApiResponse<T>) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(body))
}

/// JSON body extractor that runs `validator` rules and reports every
/// failure through the error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(map_json_rejection)?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

fn map_json_rejection(rejection: JsonRejection) -> ServiceError {
    ServiceError::ValidationError(vec![FieldError::new("body", rejection.body_text())])
}

/// Route ids are integers; anything else cannot match a record.
pub fn parse_id(raw: &str, entity: &str) -> Result<i32, ServiceError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ServiceError::not_found(entity))
}

/// Parses an optional enum label (e.g. "Low Stock") into its typed value.
pub fn parse_label<E>(
    raw: Option<&str>,
    field: &str,
    message: &str,
) -> Result<Option<E>, ServiceError>
where
    E: ActiveEnum<Value = String>,
{
    match raw {
        None => Ok(None),
        Some(value) => E::try_from_value(&value.to_string())
            .map(Some)
            .map_err(|_| ServiceError::invalid_field(field, message)),
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts only whole JSON numbers in `0..=i32::MAX`.
pub fn non_negative_integer(value: &serde_json::Number) -> Option<i32> {
    value
        .as_i64()
        .filter(|n| *n >= 0)
        .and_then(|n| i32::try_from(n).ok())
}

pub fn validate_quantity(value: &serde_json::Number) -> Result<(), ValidationError> {
    match non_negative_integer(value) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("quantity");
            err.message = Some("Quantity must be a non-negative integer".into());
            Err(err)
        }
    }
}

pub fn validate_reorder_level(value: &serde_json::Number) -> Result<(), ValidationError> {
    match non_negative_integer(value) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("reorder_level");
            err.message = Some("Reorder level must be a non-negative integer".into());
            Err(err)
        }
    }
}

/// Largest value a DECIMAL(10,2) column holds: 99999999.99, whose
/// mantissa 9_999_999_999 spans the low and mid words.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Prices are non-negative, carry at most two decimal places and fit the
/// stored DECIMAL(10,2).
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    let message = if value.is_sign_negative() && !value.is_zero() {
        "Price must be a non-negative number"
    } else if value.normalize().scale() > 2 {
        "Price must have at most two decimal places"
    } else if *value > MAX_PRICE {
        "Price must not exceed 99999999.99"
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("price");
    err.message = Some(message.into());
    Err(err)
}

/// Converts a field already checked by [`validate_quantity`] or
/// [`validate_reorder_level`].
pub fn checked_integer(value: &serde_json::Number, field: &str) -> Result<i32, ServiceError> {
    non_negative_integer(value).ok_or_else(|| {
        ServiceError::invalid_field(field, format!("{} must be a non-negative integer", field))
    })
}
