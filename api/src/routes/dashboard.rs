//! Dashboard endpoint.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use shared::registry::DashboardCounts;

use super::error::ApiError;
use crate::state::AppState;

/// Creates the dashboard routes.
///
/// # Routes
///
/// - `GET /api/v1/dashboard` - Record counts per kind
pub fn dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/dashboard", get(get_dashboard))
        .with_state(state)
}

async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DashboardCounts>), ApiError> {
    let counts = state.run(|r| r.dashboard()).await?;
    Ok((StatusCode::OK, Json(counts)))
}
