//! Error responses shared by the API routes.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use shared::registry::RegistryError;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// Error type returned by handlers.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Builds an error response.
pub fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Maps a rejected JSON body to a 400 response.
#[allow(clippy::needless_pass_by_value)]
pub fn invalid_json(rejection: JsonRejection) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "invalid_json", rejection.body_text())
}

/// Maps a registry error to its HTTP status and error code.
#[allow(clippy::needless_pass_by_value)]
pub fn registry_error(e: RegistryError) -> ApiError {
    let (status, code) = match e {
        RegistryError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        RegistryError::DuplicateBadge(_) | RegistryError::DuplicateEmail(_) => {
            (StatusCode::CONFLICT, "duplicate")
        }
        RegistryError::LastAdministrator => (StatusCode::CONFLICT, "last_administrator"),
        RegistryError::UnknownMetric { .. } => (StatusCode::BAD_REQUEST, "unknown_metric"),
        RegistryError::InvalidUnit(_)
        | RegistryError::InvalidEquipment(_)
        | RegistryError::InvalidEmployee(_)
        | RegistryError::InvalidCollection(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        RegistryError::Store(_) | RegistryError::Serialization { .. } => {
            tracing::error!(error = %e, "Registry storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
        }
    };
    api_error(status, code, e.to_string())
}
