//! Integration tests for units, equipment and employees.
//!
//! Tests cover:
//! - Registration and listing
//! - Template fields applied to new equipment
//! - Unit deletion cascading to equipment
//! - Badge uniqueness and last-administrator protection

use axum::http::StatusCode;
use serde_json::json;

use super::common::{delete, get, post_json, seed_plant, test_app};

#[tokio::test]
async fn test_seeded_plant_is_counted() {
    let (app, _state) = test_app();
    seed_plant(&app).await;

    let (status, counts) = get(app, "/api/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counts["units"], 1);
    assert_eq!(counts["equipment"], 1);
    assert_eq!(counts["employees"], 1);
    assert_eq!(counts["collections"], 0);
}

#[tokio::test]
async fn test_equipment_gets_template_fields() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;

    let (status, motor) = get(app.clone(), &format!("/api/v1/equipment/{}", plant.motor_id)).await;
    assert_eq!(status, StatusCode::OK);
    let fields: Vec<&str> = motor["custom_fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["Corrente", "Tensão", "Rotação"]);

    // Explicit fields replace the template.
    let (status, pump) = post_json(
        app,
        "/api/v1/equipment",
        json!({
            "unit_id": plant.unit_id,
            "name": "Bomba 01",
            "equipment_type": "Bomba Centrífuga",
            "serial_number": "SN-002",
            "custom_fields": [{"name": "Vazão", "unit": "m³/h"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pump["custom_fields"].as_array().unwrap().len(), 1);
    assert_eq!(pump["criticality"], "Medium");
}

#[tokio::test]
async fn test_delete_unit_removes_its_equipment() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;

    let (status, response) = delete(app.clone(), &format!("/api/v1/units/{}", plant.unit_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["equipment_removed"], 1);

    let (_, equipment) = get(app.clone(), "/api/v1/equipment").await;
    assert_eq!(equipment["total_count"], 0);

    let (status, _) = get(app, &format!("/api/v1/equipment/{}", plant.motor_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_employee_rules() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;

    let (status, response) = post_json(
        app.clone(),
        "/api/v1/employees",
        json!({
            "name": "Bruno Lima",
            "role": "Técnico",
            "employee_id": "1001",
            "email": "bruno@plant.com"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["error"], "duplicate");

    let (status, response) =
        delete(app.clone(), &format!("/api/v1/employees/{}", plant.employee_id)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["error"], "last_administrator");

    let (status, bruno) = post_json(
        app.clone(),
        "/api/v1/employees",
        json!({
            "name": "Bruno Lima",
            "role": "Técnico",
            "employee_id": "1002",
            "email": "bruno@plant.com"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bruno["is_admin"], false);

    let bruno_id = bruno["id"].as_str().unwrap();
    let (status, _) = delete(app.clone(), &format!("/api/v1/employees/{bruno_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, employees) = get(app, "/api/v1/employees").await;
    assert_eq!(employees["total_count"], 1);
}

#[tokio::test]
async fn test_equipment_templates_listed() {
    let (app, _state) = test_app();

    let (status, templates) = get(app, "/api/v1/equipment-templates").await;
    assert_eq!(status, StatusCode::OK);
    let types: Vec<&str> = templates
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["equipment_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["Motor Elétrico", "Bomba Centrífuga", "Painel Elétrico"]);
}
