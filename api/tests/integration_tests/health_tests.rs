//! Integration tests for health check and general API functionality.
//!
//! Tests cover:
//! - Health check endpoint
//! - Empty registry behavior

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "predimaint-api");
}

#[tokio::test]
async fn test_empty_registry_returns_empty_results() {
    let (app, _state) = test_app();

    let (status, response) = get(app.clone(), "/api/v1/units").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);
    assert!(response["units"].as_array().unwrap().is_empty());

    let (status, response) = get(app.clone(), "/api/v1/equipment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);

    let (status, response) = get(app.clone(), "/api/v1/collections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);

    let (status, response) = get(app, "/api/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["units"], 0);
    assert_eq!(response["collections"], 0);
}
