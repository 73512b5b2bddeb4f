use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use super::super::{request::RequestBody, ApiError, ProxyServer};
use crate::odoo::OdooClient;

/// POST /api/authenticate - 자격 증명 확인 + 관리자 여부
///
/// Wrong credentials answer 200 with `success: false`; every body carries
/// `uid` and `isAdmin` so clients can read them unconditionally.
pub async fn authenticate(State(state): State<ProxyServer>, body: Bytes) -> impl IntoResponse {
    match login(&state, &body).await {
        Ok(Some((uid, is_admin))) => {
            tracing::info!("Authentication succeeded. uid: {}, admin: {}", uid, is_admin);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "uid": uid,
                    "isAdmin": is_admin
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": false,
                "uid": null,
                "isAdmin": false,
                "error": "Usuario o contraseña incorrectos"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Authentication request failed: {}", e);
            let mut body = e.to_json();
            body["uid"] = Value::Null;
            body["isAdmin"] = Value::Bool(false);
            (e.status_code(), Json(body)).into_response()
        }
    }
}

async fn login(state: &ProxyServer, bytes: &[u8]) -> Result<Option<(i64, bool)>, ApiError> {
    let body = RequestBody::parse(bytes)?;
    body.require(&["username", "password"])?;
    let username: String = body.field("username")?;
    let password: String = body.field("password")?;
    if username.is_empty() {
        return Err(ApiError::MissingField("username".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::MissingField("password".to_string()));
    }

    let target = body.target(&state.config.remote);
    tracing::info!("Authenticating '{}' against {} ({})", username, target.url, target.db);

    let mut client = OdooClient::with_timeout(
        &target.url,
        &target.db,
        &username,
        &password,
        state.config.request_timeout(),
    )?;
    let Some(uid) = client.authenticate().await else {
        return Ok(None);
    };

    let is_admin = client.is_admin(uid).await;
    Ok(Some((uid, is_admin)))
}
