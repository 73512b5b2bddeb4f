//! Bodies of the one-shot programs. Each returns whether the command
//! succeeded; regular output goes to `out`, diagnostics to `err`.

use crate::ConnectionArgs;
use serde_json::Value;
use std::io::Write;

/// Server version, then the credentials' uid.
pub async fn auth(conn: &ConnectionArgs, out: &mut dyn Write) -> anyhow::Result<bool> {
    writeln!(out, "{}", conn.summary())?;
    let mut client = conn.client()?;

    let version = client.version().await;
    if version.is_empty() {
        writeln!(out, "No se pudo conectar con el servidor Odoo: {}", client.url())?;
        return Ok(false);
    }
    let server_version = version
        .get("server_version")
        .and_then(Value::as_str)
        .unwrap_or("desconocida");
    writeln!(out, "Versión de Odoo: {}", server_version)?;

    match client.authenticate().await {
        Some(uid) => {
            writeln!(out, "UID: {}", uid)?;
            writeln!(out, "{}", uid)?;
            Ok(true)
        }
        None => {
            writeln!(out, "Error de autenticación. Credenciales incorrectas o sin permisos.")?;
            writeln!(out, "None")?;
            Ok(false)
        }
    }
}

/// Projects of the employee linked to the authenticated user, as JSON.
pub async fn projects(conn: &ConnectionArgs, out: &mut dyn Write, err: &mut dyn Write) -> anyhow::Result<bool> {
    let mut client = conn.client()?;
    let Some(uid) = client.authenticate().await else {
        writeln!(err, "ERROR: Autenticación fallida")?;
        return Ok(false);
    };

    let employee_id = client
        .get_employee_by_user_id(uid)
        .await
        .and_then(|employee| employee.get("id").and_then(Value::as_i64));
    let Some(employee_id) = employee_id else {
        writeln!(err, "ERROR: Empleado no encontrado")?;
        return Ok(false);
    };

    let projects = client.get_employee_all_project(employee_id).await;
    writeln!(out, "{}", serde_json::to_string(&projects)?)?;
    Ok(true)
}

/// Activities of one project, as JSON.
pub async fn activities(
    conn: &ConnectionArgs,
    employee_id: i64,
    project_id: i64,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<bool> {
    let mut client = conn.client()?;
    if client.authenticate().await.is_none() {
        writeln!(err, "ERROR: Autenticación fallida")?;
        return Ok(false);
    }

    let activities = client.get_employee_all_actividad(employee_id, project_id).await;
    writeln!(out, "{}", serde_json::to_string(&activities)?)?;
    Ok(true)
}
