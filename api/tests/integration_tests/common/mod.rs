//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup, HTTP request helpers and record fixtures.

#![allow(dead_code)]

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};

/// Body limit used by the test router.
pub const TEST_BODY_LIMIT: usize = 1024 * 1024;

/// Creates a test router over a fresh in-memory registry.
///
/// # Returns
///
/// A tuple containing the configured router and the app state.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::with_in_memory_store();
    let router = create_router(state.clone(), TEST_BODY_LIMIT);
    (router, state)
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with JSON body.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Helper to make a PUT request with JSON body.
pub async fn put_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

/// Helper to make a GET request.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body
/// (`Null` when the body is not JSON).
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

/// Helper to make a DELETE request.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

/// Ids of the records created by [`seed_plant`].
pub struct Plant {
    /// The unit.
    pub unit_id: String,
    /// An electric motor in the unit.
    pub motor_id: String,
    /// An administrator technician.
    pub employee_id: String,
}

/// Registers one unit, one electric motor and one administrator through the API.
pub async fn seed_plant(app: &Router) -> Plant {
    let (status, unit) = post_json(app.clone(), "/api/v1/units", json!({"name": "Bloco A"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let unit_id = unit["id"].as_str().unwrap().to_string();

    let (status, motor) = post_json(
        app.clone(),
        "/api/v1/equipment",
        json!({
            "unit_id": unit_id,
            "name": "Motor 01",
            "equipment_type": "Motor Elétrico",
            "serial_number": "SN-001",
            "criticality": "High"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, employee) = post_json(
        app.clone(),
        "/api/v1/employees",
        json!({
            "name": "Ana Souza",
            "role": "Técnica",
            "employee_id": "1001",
            "email": "ana@plant.com",
            "is_admin": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    Plant {
        unit_id,
        motor_id: motor["id"].as_str().unwrap().to_string(),
        employee_id: employee["id"].as_str().unwrap().to_string(),
    }
}

/// Builds a collection body for the plant's motor.
pub fn collection_body(plant: &Plant, date: &str, temperature: f64) -> Value {
    json!({
        "equipment_id": plant.motor_id,
        "employee_id": plant.employee_id,
        "date": date,
        "measurements": {"vibration": 2.0, "temperature": temperature, "pressure": 3.0},
        "custom_values": {"Corrente": 10.0 + temperature / 10.0}
    })
}
