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
use crate::odoo::Record;

/// POST /api/employee/:uid - uid에 연결된 직원 조회
///
/// The user's login is looked up with the configured default credentials,
/// then the employee is read over a second connection as that user.
pub async fn get_employee_info(
    State(state): State<ProxyServer>,
    Path(uid): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    match employee(&state, &uid, &body).await {
        Ok(employee) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "employee": employee
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch employee for uid {}: {}", uid, e);
            e.into_response()
        }
    }
}

async fn employee(state: &ProxyServer, uid: &str, bytes: &[u8]) -> Result<Option<Record>, ApiError> {
    let uid = path_id(uid, "uid")?;
    let body = RequestBody::parse(bytes)?;
    body.require(&["password"])?;
    let password: String = body.field("password")?;
    let target = body.target(&state.config.remote);

    let defaults = &state.config.remote;
    let lookup = connect(state, &target, &defaults.username, &defaults.password).await?;
    let login = lookup
        .get_user_login(uid)
        .await
        .ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    let client = connect(state, &target, &login, &password).await?;
    Ok(client.get_employee_by_user_id(uid).await)
}
