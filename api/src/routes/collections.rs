//! Data collection endpoints.
//!
//! Collections are the readings taken by an employee on one piece of
//! equipment. Listings resolve display names so clients never have to join
//! records themselves.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::{CollectionDraft, CollectionView, DataCollection};
use shared::report::Report;

use super::error::{invalid_json, ApiError};
use crate::state::AppState;

/// Query parameters for listing collections.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionsQuery {
    /// Restrict to one piece of equipment.
    pub equipment_id: Option<String>,
}

/// Response listing collections, most recent first.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionsResponse {
    /// Collections with resolved names.
    pub collections: Vec<CollectionView>,
    /// Number of collections returned.
    pub total_count: usize,
}

/// Response for clearing the history.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    /// Collections removed.
    pub removed: usize,
}

/// Query parameters for a collection report.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Recipient put in the `mailto:` link.
    pub to: Option<String>,
}

/// A report together with a ready-to-open `mailto:` link.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    /// The report.
    #[serde(flatten)]
    pub report: Report,
    /// `mailto:` link carrying subject and body.
    pub mailto: String,
}

impl ReportResponse {
    pub(crate) fn new(report: Report, recipient: Option<&str>) -> Self {
        let mailto = report.mailto(recipient);
        Self { report, mailto }
    }
}

/// Creates the collection routes.
///
/// # Routes
///
/// - `GET /api/v1/collections` - List collections (`?equipment_id=` filters)
/// - `POST /api/v1/collections` - Record a collection
/// - `DELETE /api/v1/collections` - Clear the whole history
/// - `GET /api/v1/collections/{id}` - Fetch one collection
/// - `PUT /api/v1/collections/{id}` - Replace a collection's contents
/// - `DELETE /api/v1/collections/{id}` - Delete one collection
/// - `GET /api/v1/collections/{id}/report` - Report for one collection
pub fn collections_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/collections",
            get(list_collections)
                .post(record_collection)
                .delete(clear_collections),
        )
        .route(
            "/api/v1/collections/{id}",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
        .route("/api/v1/collections/{id}/report", get(collection_report))
        .with_state(state)
}

async fn list_collections(
    State(state): State<AppState>,
    Query(query): Query<CollectionsQuery>,
) -> Result<(StatusCode, Json<CollectionsResponse>), ApiError> {
    let mut collections = state.run(|r| r.list_collections()).await?;
    if let Some(ref equipment_id) = query.equipment_id {
        collections.retain(|v| &v.collection.equipment_id == equipment_id);
    }
    let total_count = collections.len();
    Ok((
        StatusCode::OK,
        Json(CollectionsResponse {
            collections,
            total_count,
        }),
    ))
}

async fn record_collection(
    State(state): State<AppState>,
    payload: Result<Json<CollectionDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<DataCollection>), ApiError> {
    let Json(draft) = payload.map_err(invalid_json)?;
    let collection = state.run(move |r| r.record_collection(draft)).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

async fn clear_collections(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ClearResponse>), ApiError> {
    let removed = state.run(|r| r.clear_collections()).await?;
    Ok((StatusCode::OK, Json(ClearResponse { removed })))
}

async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DataCollection>), ApiError> {
    let collection = state.run(move |r| r.get_collection(&id)).await?;
    Ok((StatusCode::OK, Json(collection)))
}

async fn update_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CollectionDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<DataCollection>), ApiError> {
    let Json(draft) = payload.map_err(invalid_json)?;
    let collection = state
        .run(move |r| r.update_collection(&id, draft))
        .await?;
    Ok((StatusCode::OK, Json(collection)))
}

async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.run(move |r| r.delete_collection(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn collection_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    let report = state.run(move |r| r.collection_report(&id)).await?;
    Ok((
        StatusCode::OK,
        Json(ReportResponse::new(report, query.to.as_deref())),
    ))
}
