//! Equipment management endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::{CustomField, Equipment, EquipmentDraft, EquipmentTemplate, MetricDescriptor};

use super::error::{invalid_json, ApiError};
use crate::state::AppState;

/// Request body for registering equipment.
#[derive(Debug, Deserialize)]
pub struct CreateEquipmentRequest {
    /// Owning unit.
    pub unit_id: String,
    /// Equipment fields.
    #[serde(flatten)]
    pub draft: EquipmentDraft,
}

/// Query parameters for listing equipment.
#[derive(Debug, Default, Deserialize)]
pub struct EquipmentQuery {
    /// Restrict to one unit.
    pub unit_id: Option<String>,
}

/// Response listing equipment.
#[derive(Debug, Serialize, Deserialize)]
pub struct EquipmentListResponse {
    /// Matching equipment.
    pub equipment: Vec<Equipment>,
    /// Number of matches.
    pub total_count: usize,
}

/// Response listing the metrics of one piece of equipment.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    /// Equipment id.
    pub equipment_id: String,
    /// Chartable metrics, fixed readings first.
    pub metrics: Vec<MetricDescriptor>,
}

/// A built-in equipment type as offered to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateResponse {
    /// Equipment type name.
    pub equipment_type: String,
    /// Fields prefilled for this type.
    pub fields: Vec<CustomField>,
}

/// Creates the equipment routes.
///
/// # Routes
///
/// - `GET /api/v1/equipment` - List equipment (`?unit_id=` filters)
/// - `POST /api/v1/equipment` - Register equipment
/// - `GET /api/v1/equipment/{id}` - Fetch one piece of equipment
/// - `DELETE /api/v1/equipment/{id}` - Delete it (collections are kept)
/// - `GET /api/v1/equipment/{id}/metrics` - Chartable metrics
/// - `GET /api/v1/equipment-templates` - Built-in equipment types
pub fn equipment_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/equipment",
            get(list_equipment).post(create_equipment),
        )
        .route(
            "/api/v1/equipment/{id}",
            get(get_equipment).delete(delete_equipment),
        )
        .route("/api/v1/equipment/{id}/metrics", get(list_metrics))
        .route("/api/v1/equipment-templates", get(list_templates))
        .with_state(state)
}

async fn list_equipment(
    State(state): State<AppState>,
    Query(query): Query<EquipmentQuery>,
) -> Result<(StatusCode, Json<EquipmentListResponse>), ApiError> {
    let equipment = state
        .run(move |r| r.list_equipment(query.unit_id.as_deref()))
        .await?;
    let total_count = equipment.len();
    Ok((
        StatusCode::OK,
        Json(EquipmentListResponse {
            equipment,
            total_count,
        }),
    ))
}

/// Registers equipment. When `custom_fields` is omitted the fields of the
/// matching built-in type are applied.
async fn create_equipment(
    State(state): State<AppState>,
    payload: Result<Json<CreateEquipmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Equipment>), ApiError> {
    let Json(request) = payload.map_err(invalid_json)?;
    let equipment = state
        .run(move |r| r.add_equipment(&request.unit_id, request.draft))
        .await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Equipment>), ApiError> {
    let equipment = state.run(move |r| r.get_equipment(&id)).await?;
    Ok((StatusCode::OK, Json(equipment)))
}

async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.run(move |r| r.delete_equipment(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MetricsResponse>), ApiError> {
    let equipment_id = id.clone();
    let metrics = state.run(move |r| r.metrics_for(&equipment_id)).await?;
    Ok((
        StatusCode::OK,
        Json(MetricsResponse {
            equipment_id: id,
            metrics,
        }),
    ))
}

async fn list_templates() -> Json<Vec<TemplateResponse>> {
    Json(
        EquipmentTemplate::all()
            .iter()
            .map(|t| TemplateResponse {
                equipment_type: t.equipment_type.to_string(),
                fields: t.custom_fields(),
            })
            .collect(),
    )
}
