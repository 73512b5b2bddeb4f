//! Attendance-kiosk wrappers around the generic client calls.

use super::{Condition, OdooClient, Query, Record, RemoteMethod};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const EMPLOYEE_MODEL: &str = "hr.employee";
pub const ATTENDANCE_MODEL: &str = "hr.attendance";
pub const USERS_MODEL: &str = "res.users";

/// Odoo "Settings / Administration" group
pub const ADMIN_GROUP_ID: i64 = 1;

/// Entry of a select widget: `value` and `label` carry the same display text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOption {
    pub id: i64,
    pub value: String,
    pub label: String,
}

/// Inputs of `hr.employee.attendance_manual`
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceEntry {
    pub employee_id: i64,
    pub longitude: f64,
    pub latitude: f64,
    pub message: String,
    pub project_id: i64,
    pub actividad_id: i64,
    pub next_action: String,
    pub observations: String,
    pub no_calidad: bool,
    pub checkout: bool,
    pub cambio: bool,
    pub avance: f64,
}

impl AttendanceEntry {
    /// The 13 positional arguments expected by the remote method
    pub fn to_args(&self) -> Vec<Value> {
        vec![
            json!([self.employee_id]),
            json!(self.employee_id),
            json!(self.longitude),
            json!(self.latitude),
            json!(self.message),
            json!(self.project_id),
            json!(self.actividad_id),
            json!(self.next_action),
            json!(self.observations),
            json!(self.no_calidad),
            json!(self.checkout),
            json!(self.cambio),
            json!(self.avance),
        ]
    }
}

#[derive(Deserialize)]
struct RemoteOption {
    id: i64,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    label: Value,
}

impl OdooClient {
    pub async fn get_employee_by_user_id(&self, user_id: i64) -> Option<Record> {
        let query = Query::new(EMPLOYEE_MODEL)
            .filter(Condition::eq("user_id", user_id))
            .fields(&["id", "name", "user_id"])
            .limit(1);
        self.search_read(&query).await.into_iter().next()
    }

    /// Login name of a user, used to reconnect as that user
    pub async fn get_user_login(&self, user_id: i64) -> Option<String> {
        let query = Query::new(USERS_MODEL)
            .filter(Condition::eq("id", user_id))
            .fields(&["login"])
            .limit(1);
        self.search_read(&query)
            .await
            .into_iter()
            .next()
            .and_then(|user| user.get("login").and_then(Value::as_str).map(str::to_string))
    }

    /// True when the user belongs to the administration group. Lookup
    /// failures count as non-admin.
    pub async fn is_admin(&self, user_id: i64) -> bool {
        let query = Query::new(USERS_MODEL)
            .filter(Condition::eq("id", user_id))
            .fields(&["groups_id"])
            .limit(1);
        let users = self.search_read(&query).await;
        let Some(groups) = users.first().and_then(|u| u.get("groups_id")).and_then(Value::as_array) else {
            return false;
        };
        groups.iter().any(|group| group_id(group) == Some(ADMIN_GROUP_ID))
    }

    /// Active projects of an employee
    pub async fn get_employee_all_project(&self, employee_id: i64) -> Vec<ListOption> {
        let result = self
            .call_method(
                ATTENDANCE_MODEL,
                RemoteMethod::GetEmployeeAllProject,
                vec![json!(employee_id)],
                Map::new(),
            )
            .await;
        list_options(result, "projects")
            .into_iter()
            .map(|opt| ListOption {
                label: opt.value.clone(),
                ..opt
            })
            .collect()
    }

    /// Activities of one project. A remote failure yields an empty list,
    /// indistinguishable from a project without activities.
    pub async fn get_employee_all_actividad(&self, employee_id: i64, project_id: i64) -> Vec<ListOption> {
        let result = self
            .call_method(
                ATTENDANCE_MODEL,
                RemoteMethod::GetEmployeeAllActividad,
                vec![json!([]), json!(employee_id), json!(project_id)],
                Map::new(),
            )
            .await;
        list_options(result, "activities")
    }

    /// Whether the kiosk must ask the employee for a progress percentage
    pub async fn get_pedir_avance(&self, employee_id: i64) -> Option<Value> {
        self.call_method(
            ATTENDANCE_MODEL,
            RemoteMethod::GetPedirAvance,
            vec![json!(employee_id)],
            Map::new(),
        )
        .await
    }

    pub async fn attendance_manual(&self, entry: &AttendanceEntry) -> Option<Value> {
        self.call_method(
            EMPLOYEE_MODEL,
            RemoteMethod::AttendanceManual,
            entry.to_args(),
            Map::new(),
        )
        .await
    }
}

fn group_id(group: &Value) -> Option<i64> {
    match group {
        Value::Array(pair) => pair.first().and_then(Value::as_i64),
        other => other.as_i64(),
    }
}

// Odoo renders empty char fields as `false`
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null | Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

fn list_options(result: Option<Value>, what: &str) -> Vec<ListOption> {
    let items = match result {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::error!("Unexpected {} payload: {}", what, other);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RemoteOption>(item.clone()) {
            Ok(opt) => Some(opt),
            Err(e) => {
                tracing::warn!("Skipping malformed {} entry {}: {}", what, item, e);
                None
            }
        })
        .map(|opt| {
            let value = display_text(&opt.value);
            let label = match display_text(&opt.label) {
                label if label.is_empty() => value.clone(),
                label => label,
            };
            ListOption { id: opt.id, value, label }
        })
        .collect()
}
