use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use super::super::{request::RequestBody, ApiError, ProxyServer};
use super::connect;
use crate::odoo::AttendanceEntry;

const REQUIRED_FIELDS: [&str; 7] = [
    "username",
    "password",
    "employee_id",
    "project_id",
    "actividad_id",
    "next_action",
    "observations",
];

/// POST /api/attendance - 수동 출퇴근 등록
pub async fn register_attendance(State(state): State<ProxyServer>, body: Bytes) -> impl IntoResponse {
    match register(&state, &body).await {
        Ok(Some(result)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "result": result
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": false,
                "result": null,
                "error": "Odoo no pudo registrar la asistencia"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to register attendance: {}", e);
            e.into_response()
        }
    }
}

async fn register(state: &ProxyServer, bytes: &[u8]) -> Result<Option<Value>, ApiError> {
    let body = RequestBody::parse(bytes)?;
    body.require(&REQUIRED_FIELDS)?;

    let username: String = body.field("username")?;
    let password: String = body.field("password")?;
    let entry = entry_from_body(&body)?;
    let target = body.target(&state.config.remote);

    let client = connect(state, &target, &username, &password).await?;
    tracing::info!(
        "Registering attendance for employee {} (project {}, activity {}, action {})",
        entry.employee_id,
        entry.project_id,
        entry.actividad_id,
        entry.next_action
    );
    Ok(client.attendance_manual(&entry).await)
}

fn entry_from_body(body: &RequestBody) -> Result<AttendanceEntry, ApiError> {
    Ok(AttendanceEntry {
        employee_id: body.field("employee_id")?,
        longitude: body.optional("longitude", 0.0)?,
        latitude: body.optional("latitude", 0.0)?,
        message: body.optional("message", String::new())?,
        project_id: body.field("project_id")?,
        actividad_id: body.field("actividad_id")?,
        next_action: body.field("next_action")?,
        observations: body.field("observations")?,
        no_calidad: body.optional("no_calidad", false)?,
        checkout: body.optional("checkout", false)?,
        cambio: body.optional("cambio", false)?,
        avance: body.optional("avance", 0.0)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_defaults() {
        let body = RequestBody::parse(
            br#"{"employee_id":7,"project_id":1,"actividad_id":2,"next_action":"check_in","observations":""}"#,
        )
        .unwrap();
        let entry = entry_from_body(&body).unwrap();
        assert_eq!(entry.employee_id, 7);
        assert_eq!(entry.longitude, 0.0);
        assert_eq!(entry.message, "");
        assert!(!entry.checkout);
        assert_eq!(entry.avance, 0.0);
    }

    #[test]
    fn test_entry_wrong_type_names_field() {
        let body = RequestBody::parse(
            br#"{"employee_id":7,"project_id":"x","actividad_id":2,"next_action":"a","observations":""}"#,
        )
        .unwrap();
        match entry_from_body(&body) {
            Err(ApiError::InvalidField(field)) => assert_eq!(field, "project_id"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
