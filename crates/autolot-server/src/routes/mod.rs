//! Autolot API Routes
//!
//! - / - Endpoint index
//! - /api/health - Liveness plus store link state
//! - /api/vehicles - Listing, creation, lookup and partial update
//! - /api/filters - Distinct makes and years for filter dropdowns

pub mod filters;
pub mod health;
pub mod swagger;
pub mod vehicle;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};

use autolot::{ConnectionError, DomainError};

/// Error body returned by every handler
pub type ApiError = (StatusCode, String);

/// Map a domain failure to an HTTP status and message
pub fn api_error(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Connection(ConnectionError::Configuration(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        DomainError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

/// Unwrap a JSON body. Bodies that parse but don't fit the schema, such as
/// an unknown enum value or a non-numeric year, are validation errors.
pub fn json_body<T>(operation: &str, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection @ (JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_))) => {
            let err = DomainError::validation(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ));
            tracing::warn!(operation, "Rejected request: {}", err);
            Err(api_error(err))
        }
        Err(rejection) => {
            tracing::warn!(operation, "Rejected request: {}", rejection.body_text());
            Err((rejection.status(), rejection.body_text()))
        }
    }
}
