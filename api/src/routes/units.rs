//! Unit management endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::Unit;

use super::error::{invalid_json, ApiError};
use crate::state::AppState;

/// Request body for creating a unit.
#[derive(Debug, Deserialize)]
pub struct CreateUnitRequest {
    /// Unit name.
    pub name: String,
}

/// Response listing units.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnitsResponse {
    /// The units, in registration order.
    pub units: Vec<Unit>,
    /// Number of units.
    pub total_count: usize,
}

/// Response for a deleted unit.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUnitResponse {
    /// The deleted unit id.
    pub id: String,
    /// Equipment removed along with the unit.
    pub equipment_removed: usize,
}

/// Creates the unit routes.
///
/// # Routes
///
/// - `GET /api/v1/units` - List units
/// - `POST /api/v1/units` - Register a unit
/// - `DELETE /api/v1/units/{id}` - Delete a unit and its equipment
pub fn units_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/units", get(list_units).post(create_unit))
        .route("/api/v1/units/{id}", delete(delete_unit))
        .with_state(state)
}

async fn list_units(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<UnitsResponse>), ApiError> {
    let units = state.run(|r| r.list_units()).await?;
    let total_count = units.len();
    Ok((StatusCode::OK, Json(UnitsResponse { units, total_count })))
}

async fn create_unit(
    State(state): State<AppState>,
    payload: Result<Json<CreateUnitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Unit>), ApiError> {
    let Json(request) = payload.map_err(invalid_json)?;
    let unit = state.run(move |r| r.add_unit(&request.name)).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

async fn delete_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeleteUnitResponse>), ApiError> {
    let unit_id = id.clone();
    let equipment_removed = state.run(move |r| r.delete_unit(&unit_id)).await?;
    Ok((
        StatusCode::OK,
        Json(DeleteUnitResponse {
            id,
            equipment_removed,
        }),
    ))
}
