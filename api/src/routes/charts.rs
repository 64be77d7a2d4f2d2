//! Measurement history chart endpoint.
//!
//! Serves render-ready chart layouts: axis domains, labeled ticks and pixel
//! positions for every observation of the selected metric.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::chart::{ChartDimensions, ChartOutcome};
use shared::models::MetricKey;

use super::error::{api_error, ApiError};
use crate::state::AppState;

/// Query parameters for a chart.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Metric key: `temperature`, `vibration`, `pressure` or a custom field name.
    #[serde(default = "default_metric")]
    pub metric: String,
    /// Total width in pixels.
    pub width: Option<f64>,
    /// Total height in pixels.
    pub height: Option<f64>,
}

fn default_metric() -> String {
    MetricKey::Temperature.as_str().to_string()
}

/// Chart response.
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    /// Equipment id.
    pub equipment_id: String,
    /// The charted metric.
    pub metric: MetricKey,
    /// Axis title for the metric.
    pub label: String,
    /// The layout, or the insufficient-data marker.
    pub chart: ChartOutcome,
}

/// Creates the chart routes.
///
/// # Routes
///
/// - `GET /api/v1/equipment/{id}/chart` - Chart of one metric
///   (`?metric=&width=&height=`)
pub fn chart_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/equipment/{id}/chart", get(get_chart))
        .with_state(state)
}

async fn get_chart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<(StatusCode, Json<ChartResponse>), ApiError> {
    let defaults = ChartDimensions::default();
    let dims = ChartDimensions::new(
        query.width.unwrap_or(defaults.width),
        query.height.unwrap_or(defaults.height),
    );
    if !dims.has_plot_area() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "invalid_dimensions",
            format!(
                "A {}x{} chart leaves no room inside its margins",
                dims.width, dims.height
            ),
        ));
    }

    let metric = MetricKey::parse(&query.metric);
    let (equipment_id, key) = (id.clone(), metric.clone());
    let (chart, metrics) = state
        .run(move |r| {
            let chart = r.chart(&equipment_id, &key, &dims)?;
            Ok((chart, r.metrics_for(&equipment_id)?))
        })
        .await?;

    let label = metrics
        .into_iter()
        .find(|m| m.key == metric)
        .map_or_else(|| metric.to_string(), |m| m.label());

    Ok((
        StatusCode::OK,
        Json(ChartResponse {
            equipment_id: id,
            metric,
            label,
            chart,
        }),
    ))
}
