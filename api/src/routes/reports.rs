//! Consolidated report endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::collections::ReportResponse;
use super::error::{api_error, ApiError};
use crate::state::AppState;

/// Query parameters for the daily report.
#[derive(Debug, Default, Deserialize)]
pub struct DailyReportQuery {
    /// Day to report on (`YYYY-MM-DD`, UTC); defaults to today.
    pub date: Option<NaiveDate>,
    /// Recipient put in the `mailto:` link.
    pub to: Option<String>,
}

/// Creates the report routes.
///
/// # Routes
///
/// - `GET /api/v1/reports/daily` - Every collection of one day (`?date=&to=`)
pub fn reports_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/reports/daily", get(daily_report))
        .with_state(state)
}

async fn daily_report(
    State(state): State<AppState>,
    Query(query): Query<DailyReportQuery>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    let day = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let report = state
        .run(move |r| r.daily_report(day))
        .await?
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                "no_collections",
                format!("No collections recorded on {day}"),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(ReportResponse::new(report, query.to.as_deref())),
    ))
}
