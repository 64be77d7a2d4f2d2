//! Integration tests for data collections.
//!
//! Tests cover:
//! - Recording and listing, newest first
//! - Filtering by equipment
//! - Editing and deleting
//! - Placeholder names once the equipment is gone

use axum::http::StatusCode;
use serde_json::json;

use super::common::{collection_body, delete, get, post_json, put_json, seed_plant, test_app};

#[tokio::test]
async fn test_collections_listed_newest_first() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;

    let (status, first) = post_json(
        app.clone(),
        "/api/v1/collections",
        collection_body(&plant, "2024-03-01T08:00:00Z", 60.0),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = post_json(
        app.clone(),
        "/api/v1/collections",
        collection_body(&plant, "2024-03-02T08:00:00Z", 62.0),
    )
    .await;

    let (status, list) = get(app, "/api/v1/collections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total_count"], 2);
    assert_eq!(list["collections"][0]["id"], second["id"]);
    assert_eq!(list["collections"][1]["id"], first["id"]);
    assert_eq!(list["collections"][0]["equipment_name"], "Motor 01");
    assert_eq!(list["collections"][0]["employee_name"], "Ana Souza");
}

#[tokio::test]
async fn test_collections_filtered_by_equipment() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;
    post_json(
        app.clone(),
        "/api/v1/collections",
        collection_body(&plant, "2024-03-01T08:00:00Z", 60.0),
    )
    .await;

    let (_, mine) = get(
        app.clone(),
        &format!("/api/v1/collections?equipment_id={}", plant.motor_id),
    )
    .await;
    assert_eq!(mine["total_count"], 1);

    let (_, other) = get(app, "/api/v1/collections?equipment_id=other").await;
    assert_eq!(other["total_count"], 0);
}

#[tokio::test]
async fn test_collection_rejected_for_unknown_records() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;

    let mut body = collection_body(&plant, "2024-03-01T08:00:00Z", 60.0);
    body["employee_id"] = json!("ghost");
    let (status, response) = post_json(app.clone(), "/api/v1/collections", body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "not_found");

    let mut body = collection_body(&plant, "2024-03-01T08:00:00Z", 60.0);
    body["photo"] = json!("https://example.com/photo.jpg");
    let (status, response) = post_json(app, "/api/v1/collections", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_error");
}

#[tokio::test]
async fn test_edit_and_delete_collection() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;
    let (_, created) = post_json(
        app.clone(),
        "/api/v1/collections",
        collection_body(&plant, "2024-03-01T08:00:00Z", 60.0),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let mut edited = collection_body(&plant, "2024-03-01T09:30:00Z", 64.5);
    edited["notes"] = json!("  Rolamento trocado ");
    let (status, updated) = put_json(app.clone(), &format!("/api/v1/collections/{id}"), edited).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "Rolamento trocado");

    let (_, fetched) = get(app.clone(), &format!("/api/v1/collections/{id}")).await;
    assert_eq!(fetched["measurements"]["temperature"], 64.5);

    let (status, _) = delete(app.clone(), &format!("/api/v1/collections/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = delete(app, &format!("/api/v1/collections/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_orphaned_collection_keeps_placeholder_names() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;
    post_json(
        app.clone(),
        "/api/v1/collections",
        collection_body(&plant, "2024-03-01T08:00:00Z", 60.0),
    )
    .await;

    let (status, _) = delete(app.clone(), &format!("/api/v1/equipment/{}", plant.motor_id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = get(app, "/api/v1/collections").await;
    assert_eq!(list["total_count"], 1);
    assert_eq!(list["collections"][0]["equipment_name"], "Equipamento Desconhecido");
    assert_eq!(list["collections"][0]["unit_name"], "Unidade Desconhecida");
}

#[tokio::test]
async fn test_clear_history() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;
    for day in 1..=3 {
        post_json(
            app.clone(),
            "/api/v1/collections",
            collection_body(&plant, &format!("2024-03-0{day}T08:00:00Z"), 60.0),
        )
        .await;
    }

    let (status, response) = delete(app.clone(), "/api/v1/collections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["removed"], 3);

    let (_, counts) = get(app, "/api/v1/dashboard").await;
    assert_eq!(counts["collections"], 0);
}
