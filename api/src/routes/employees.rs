//! Employee management endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::{Employee, EmployeeDraft};

use super::error::{invalid_json, ApiError};
use crate::state::AppState;

/// Response listing employees.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeesResponse {
    /// Registered employees.
    pub employees: Vec<Employee>,
    /// Number of employees.
    pub total_count: usize,
}

/// Creates the employee routes.
///
/// # Routes
///
/// - `GET /api/v1/employees` - List employees
/// - `POST /api/v1/employees` - Register an employee
/// - `DELETE /api/v1/employees/{id}` - Delete an employee
pub fn employees_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/employees", get(list_employees).post(create_employee))
        .route("/api/v1/employees/{id}", delete(delete_employee))
        .with_state(state)
}

async fn list_employees(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<EmployeesResponse>), ApiError> {
    let employees = state.run(|r| r.list_employees()).await?;
    let total_count = employees.len();
    Ok((
        StatusCode::OK,
        Json(EmployeesResponse {
            employees,
            total_count,
        }),
    ))
}

/// Registers an employee. Badge numbers and e-mails must be unique.
async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let Json(draft) = payload.map_err(invalid_json)?;
    let employee = state.run(move |r| r.add_employee(draft)).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Deletes an employee. Refuses to remove the last administrator.
async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.run(move |r| r.delete_employee(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::send;
    use serde_json::json;

    fn ana() -> serde_json::Value {
        json!({
            "name": "Ana Souza",
            "role": "Técnica",
            "employee_id": "1001",
            "email": "ana@plant.com",
            "is_admin": true
        })
    }

    #[tokio::test]
    async fn test_create_and_list_employees() {
        let state = AppState::with_in_memory_store();

        let (status, created) = send(
            employees_routes(state.clone()),
            "POST",
            "/api/v1/employees",
            Some(ana()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["is_admin"], true);

        let (status, body) =
            send(employees_routes(state), "GET", "/api/v1/employees", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["employees"][0]["email"], "ana@plant.com");
    }

    #[tokio::test]
    async fn test_duplicate_badge_conflict() {
        let state = AppState::with_in_memory_store();
        send(employees_routes(state.clone()), "POST", "/api/v1/employees", Some(ana())).await;

        let mut other = ana();
        other["email"] = json!("outra@plant.com");
        let (status, body) =
            send(employees_routes(state), "POST", "/api/v1/employees", Some(other)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate");
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let mut body = ana();
        body["email"] = json!("not-an-email");
        let (status, body) = send(
            employees_routes(AppState::with_in_memory_store()),
            "POST",
            "/api/v1/employees",
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_last_admin_protected() {
        let state = AppState::with_in_memory_store();
        let (_, created) =
            send(employees_routes(state.clone()), "POST", "/api/v1/employees", Some(ana())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            employees_routes(state),
            "DELETE",
            &format!("/api/v1/employees/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "last_administrator");
    }
}
