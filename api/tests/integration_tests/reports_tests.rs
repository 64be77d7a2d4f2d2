//! Integration tests for collection and daily reports.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{collection_body, get, post_json, seed_plant, test_app};

#[tokio::test]
async fn test_collection_report_and_mailto() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;

    let mut body = collection_body(&plant, "2024-03-05T14:30:00Z", 70.0);
    body["notes"] = json!("Vibração acima do normal");
    let (_, created) = post_json(app.clone(), "/api/v1/collections", body).await;
    let id = created["id"].as_str().unwrap();

    let (status, report) = get(app, &format!("/api/v1/collections/{id}/report")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        report["subject"],
        "Relatório de Manutenção Preditiva - Bloco A / Motor 01 - 05/03/2024"
    );

    let text = report["body"].as_str().unwrap();
    assert!(text.contains("Colaborador: Ana Souza"));
    assert!(text.contains("Data da Coleta: 05/03/2024 14:30"));
    assert!(text.contains("- Temperatura: 70 °C"));
    assert!(text.contains("- Corrente: 17"));
    assert!(text.contains("Vibração acima do normal"));

    let mailto = report["mailto"].as_str().unwrap();
    assert!(mailto.starts_with("mailto:?subject=Relat%C3%B3rio"));
    assert!(!mailto.contains(' '));
}

#[tokio::test]
async fn test_daily_report_groups_one_day() {
    let (app, _state) = test_app();
    let plant = seed_plant(&app).await;
    for date in [
        "2024-03-05T06:00:00Z",
        "2024-03-05T18:00:00Z",
        "2024-03-06T06:00:00Z",
    ] {
        post_json(
            app.clone(),
            "/api/v1/collections",
            collection_body(&plant, date, 60.0),
        )
        .await;
    }

    let (status, report) = get(
        app.clone(),
        "/api/v1/reports/daily?date=2024-03-05&to=gestor@plant.com",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["subject"], "Relatório Diário de Coletas - 05/03/2024");
    let text = report["body"].as_str().unwrap();
    assert!(text.contains("## COLETA 2 ##"));
    assert!(!text.contains("## COLETA 3 ##"));
    assert!(text.contains("Observações:\nNenhuma"));
    assert!(report["mailto"]
        .as_str()
        .unwrap()
        .starts_with("mailto:gestor@plant.com?"));

    let (status, response) = get(app, "/api/v1/reports/daily?date=2024-03-07").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "no_collections");
}

#[tokio::test]
async fn test_report_for_missing_collection() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/api/v1/collections/123/report").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "not_found");
}
