//! Health check endpoint.
//!
//! Reports whether the service is up and its registry is readable.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when the registry can be read, "degraded" otherwise.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check handler.
///
/// Returns 503 when the backing store cannot be read, so load balancers stop
/// routing to an instance with a broken data file.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match state.run(|r| r.dashboard()).await {
        Ok(_) => (StatusCode::OK, "healthy"),
        Err((_, Json(e))) => {
            tracing::warn!(error = %e.message, "Health check could not read the registry");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            service: "predimaint-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
