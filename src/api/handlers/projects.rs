use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::super::{request::RequestBody, ApiError, ProxyServer};
use super::{connect, path_id};
use crate::odoo::{ListOption, OdooClient};

/// POST /api/projects/:employee_id - 직원의 활성 프로젝트 목록
pub async fn get_employee_projects(
    State(state): State<ProxyServer>,
    Path(employee_id): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    list_response("projects", projects(&state, &employee_id, &body).await)
}

/// POST /api/activities/:employee_id/:project_id - 프로젝트의 활동 목록
pub async fn get_project_activities(
    State(state): State<ProxyServer>,
    Path((employee_id, project_id)): Path<(String, String)>,
    body: Bytes,
) -> impl IntoResponse {
    list_response(
        "activities",
        activities(&state, &employee_id, &project_id, &body).await,
    )
}

async fn projects(state: &ProxyServer, employee_id: &str, bytes: &[u8]) -> Result<Vec<ListOption>, ApiError> {
    let employee_id = path_id(employee_id, "employee_id")?;
    let client = connect_from_body(state, bytes).await?;
    Ok(client.get_employee_all_project(employee_id).await)
}

async fn activities(
    state: &ProxyServer,
    employee_id: &str,
    project_id: &str,
    bytes: &[u8],
) -> Result<Vec<ListOption>, ApiError> {
    let employee_id = path_id(employee_id, "employee_id")?;
    let project_id = path_id(project_id, "project_id")?;
    let client = connect_from_body(state, bytes).await?;
    Ok(client.get_employee_all_actividad(employee_id, project_id).await)
}

async fn connect_from_body(state: &ProxyServer, bytes: &[u8]) -> Result<OdooClient, ApiError> {
    let body = RequestBody::parse(bytes)?;
    body.require(&["username", "password"])?;
    let username: String = body.field("username")?;
    let password: String = body.field("password")?;
    let target = body.target(&state.config.remote);
    connect(state, &target, &username, &password).await
}

fn list_response(key: &str, result: Result<Vec<ListOption>, ApiError>) -> axum::response::Response {
    match result {
        Ok(items) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                key: items
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch {}: {}", key, e);
            e.into_response()
        }
    }
}
