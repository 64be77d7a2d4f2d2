//! Integration tests for measurement history charts.
//!
//! Tests cover:
//! - The insufficient-data outcome below two observations
//! - Axis domains, ticks and pixel positions for a ready chart
//! - Observations sorted by date regardless of recording order
//! - Custom metrics and unknown metrics

use axum::http::StatusCode;

use super::common::{collection_body, get, post_json, seed_plant, test_app, Plant};

async fn record(app: &axum::Router, plant: &Plant, date: &str, temperature: f64) {
    let (status, _) = post_json(
        app.clone(),
        "/api/v1/collections",
        collection_body(plant, date, temperature),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_chart_needs_two_observations() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;
    let uri = format!("/api/v1/equipment/{}/chart?metric=temperature", plant.motor_id);

    let (status, response) = get(app.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["chart"]["status"], "insufficient_data");

    record(&app, &plant, "2024-03-01T00:00:00Z", 10.0).await;
    let (_, response) = get(app, &uri).await;
    assert_eq!(response["chart"]["status"], "insufficient_data");
}

#[tokio::test]
async fn test_chart_frame_and_projection() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;

    // Recorded out of order; the chart follows the collection dates.
    record(&app, &plant, "2024-03-03T00:00:00Z", 15.0).await;
    record(&app, &plant, "2024-03-01T00:00:00Z", 10.0).await;
    record(&app, &plant, "2024-03-02T00:00:00Z", 20.0).await;

    let (status, response) = get(
        app,
        &format!("/api/v1/equipment/{}/chart?metric=temperature", plant.motor_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["label"], "Temperatura (°C)");

    let chart = &response["chart"];
    assert_eq!(chart["status"], "ready");
    assert_eq!(chart["frame"]["y_min"], 9.0);
    assert_eq!(chart["frame"]["y_max"], 21.0);

    let y_ticks: Vec<f64> = chart["frame"]["y_ticks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_f64().unwrap())
        .collect();
    assert_eq!(y_ticks, vec![9.0, 12.0, 15.0, 18.0, 21.0]);
    assert_eq!(chart["frame"]["x_ticks"].as_array().unwrap().len(), 3);

    let points = chart["points"].as_array().unwrap();
    let values: Vec<f64> = points.iter().map(|p| p["value"].as_f64().unwrap()).collect();
    assert_eq!(values, vec![10.0, 20.0, 15.0]);

    // First point sits on the left margin, last on the right edge of the plot.
    assert_eq!(points[0]["position"]["x"], 50.0);
    assert_eq!(points[2]["position"]["x"], 480.0);
    let y_top = points[1]["position"]["y"].as_f64().unwrap();
    let y_bottom = points[0]["position"]["y"].as_f64().unwrap();
    assert!(y_top < y_bottom);
    assert!(y_top >= 20.0 && y_bottom <= 200.0);

    let x_labels: Vec<&str> = chart["x_ticks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["label"].as_str().unwrap())
        .collect();
    assert_eq!(x_labels, vec!["03/01", "03/02", "03/03"]);
}

#[tokio::test]
async fn test_chart_flat_series_is_padded() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;
    record(&app, &plant, "2024-03-01T00:00:00Z", 50.0).await;
    record(&app, &plant, "2024-03-02T00:00:00Z", 50.0).await;

    let (_, response) = get(
        app,
        &format!("/api/v1/equipment/{}/chart", plant.motor_id),
    )
    .await;
    let frame = &response["chart"]["frame"];
    assert_eq!(frame["y_min"], 49.0);
    assert_eq!(frame["y_max"], 51.0);
}

#[tokio::test]
async fn test_chart_custom_metric() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;
    record(&app, &plant, "2024-03-01T00:00:00Z", 10.0).await;
    record(&app, &plant, "2024-03-02T00:00:00Z", 30.0).await;

    let (status, response) = get(
        app,
        &format!(
            "/api/v1/equipment/{}/chart?metric={}",
            plant.motor_id,
            urlencoding::encode("Corrente")
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["label"], "Corrente (A)");

    let values: Vec<f64> = response["chart"]["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![11.0, 13.0]);
}

#[tokio::test]
async fn test_chart_unknown_metric_rejected() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;

    let (status, response) = get(
        app,
        &format!(
            "/api/v1/equipment/{}/chart?metric={}",
            plant.motor_id,
            urlencoding::encode("Vazão")
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "unknown_metric");
}
