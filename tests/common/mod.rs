//! In-process stand-in for an Odoo server speaking XML-RPC.
//!
//! Supports `version` / `authenticate` on `/xmlrpc/2/common` and a small
//! `execute_kw` surface on `/xmlrpc/2/object`: generic CRUD over in-memory
//! tables (only the `=` domain operator) plus the attendance methods.

#![allow(dead_code)]

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse, routing::post, Router};
use odoo_proxy::protocol::xmlrpc;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

pub type StubState = Arc<Mutex<StubOdoo>>;

pub struct StubUser {
    pub uid: i64,
    pub login: String,
    pub password: String,
}

pub struct StubOdoo {
    pub db: String,
    pub users: Vec<StubUser>,
    pub tables: HashMap<String, BTreeMap<i64, Map<String, Value>>>,
    pub projects: Vec<(i64, String)>,
    pub activities: HashMap<i64, Vec<(i64, String)>>,
    pub attendance_calls: Vec<Vec<Value>>,
    pub execute_calls: usize,
    next_id: i64,
}

impl StubOdoo {
    pub fn new(db: &str) -> Self {
        Self {
            db: db.to_string(),
            users: Vec::new(),
            tables: HashMap::new(),
            projects: Vec::new(),
            activities: HashMap::new(),
            attendance_calls: Vec::new(),
            execute_calls: 0,
            next_id: 100,
        }
    }

    pub fn with_user(mut self, uid: i64, login: &str, password: &str, groups: Value) -> Self {
        self.users.push(StubUser {
            uid,
            login: login.to_string(),
            password: password.to_string(),
        });
        self.insert("res.users", uid, json!({ "login": login, "groups_id": groups }));
        self
    }

    pub fn with_employee(mut self, id: i64, name: &str, user_id: i64) -> Self {
        self.insert("hr.employee", id, json!({ "name": name, "user_id": user_id }));
        self
    }

    pub fn with_projects(mut self, projects: &[(i64, &str)]) -> Self {
        self.projects = projects.iter().map(|(id, name)| (*id, name.to_string())).collect();
        self
    }

    pub fn with_activities(mut self, project_id: i64, activities: &[(i64, &str)]) -> Self {
        self.activities.insert(
            project_id,
            activities.iter().map(|(id, name)| (*id, name.to_string())).collect(),
        );
        self
    }

    fn insert(&mut self, model: &str, id: i64, fields: Value) {
        let mut record = fields.as_object().cloned().unwrap_or_default();
        record.insert("id".to_string(), json!(id));
        self.tables.entry(model.to_string()).or_default().insert(id, record);
    }

    fn authenticate(&self, params: &[Value]) -> Value {
        let db = params.first().and_then(Value::as_str).unwrap_or_default();
        let login = params.get(1).and_then(Value::as_str).unwrap_or_default();
        let password = params.get(2).and_then(Value::as_str).unwrap_or_default();
        if db != self.db {
            return json!(false);
        }
        self.users
            .iter()
            .find(|u| u.login == login && u.password == password)
            .map(|u| json!(u.uid))
            .unwrap_or(json!(false))
    }

    fn execute_kw(&mut self, params: &[Value]) -> Result<Value, String> {
        self.execute_calls += 1;
        let uid = params.get(1).and_then(Value::as_i64).unwrap_or_default();
        let password = params.get(2).and_then(Value::as_str).unwrap_or_default();
        if !self.users.iter().any(|u| u.uid == uid && u.password == password) {
            return Err("Access Denied".to_string());
        }

        let model = params.get(3).and_then(Value::as_str).unwrap_or_default().to_string();
        let method = params.get(4).and_then(Value::as_str).unwrap_or_default().to_string();
        let args = params.get(5).and_then(Value::as_array).cloned().unwrap_or_default();
        let kwargs = params.get(6).and_then(Value::as_object).cloned().unwrap_or_default();

        match (model.as_str(), method.as_str()) {
            ("hr.attendance", "get_employee_all_project") => Ok(Value::Array(
                self.projects
                    .iter()
                    .map(|(id, name)| json!({ "id": id, "value": name, "label": name }))
                    .collect(),
            )),
            ("hr.attendance", "get_employee_all_actividad") => {
                let project_id = args.get(2).and_then(Value::as_i64).unwrap_or_default();
                let activities = self
                    .activities
                    .get(&project_id)
                    .ok_or_else(|| format!("project.project({}) does not exist", project_id))?;
                Ok(Value::Array(
                    activities
                        .iter()
                        .map(|(id, desc)| json!({ "id": id, "value": desc, "label": desc }))
                        .collect(),
                ))
            }
            ("hr.attendance", "get_pedir_avance") => Ok(json!(true)),
            ("hr.employee", "attendance_manual") => {
                if args.len() != 13 {
                    return Err(format!("attendance_manual expects 13 arguments, got {}", args.len()));
                }
                let employee_id = args[1].clone();
                self.attendance_calls.push(args);
                Ok(json!({ "registered": true, "employee_id": employee_id }))
            }
            (_, "check_access_rights") => Ok(json!(true)),
            (_, "search") => {
                let rows = self.matching(&model, args.first(), &kwargs)?;
                Ok(Value::Array(rows.iter().map(|r| r["id"].clone()).collect()))
            }
            (_, "search_read") => {
                let rows = self.matching(&model, args.first(), &kwargs)?;
                Ok(Value::Array(rows.iter().map(|r| project(r, &kwargs)).collect()))
            }
            (_, "read") => {
                let ids = args.first().and_then(Value::as_array).cloned().unwrap_or_default();
                let table = self.tables.get(&model);
                Ok(Value::Array(
                    ids.iter()
                        .filter_map(|id| table.and_then(|t| t.get(&id.as_i64().unwrap_or_default())))
                        .map(|r| project(r, &kwargs))
                        .collect(),
                ))
            }
            (_, "create") => {
                let values = args.first().cloned().unwrap_or_else(|| json!({}));
                self.next_id += 1;
                let id = self.next_id;
                self.insert(&model, id, values);
                Ok(json!(id))
            }
            (_, "write") => {
                let ids = args.first().and_then(Value::as_array).cloned().unwrap_or_default();
                let values = args.get(1).and_then(Value::as_object).cloned().unwrap_or_default();
                let table = self.tables.entry(model.clone()).or_default();
                for id in ids.iter().filter_map(Value::as_i64) {
                    let record = table.get_mut(&id).ok_or_else(|| format!("record {} does not exist", id))?;
                    record.extend(values.clone());
                }
                Ok(json!(true))
            }
            (_, "unlink") => {
                let ids = args.first().and_then(Value::as_array).cloned().unwrap_or_default();
                let table = self.tables.entry(model.clone()).or_default();
                for id in ids.iter().filter_map(Value::as_i64) {
                    table.remove(&id);
                }
                Ok(json!(true))
            }
            (model, method) => Err(format!("The method '{}' does not exist on the model '{}'", method, model)),
        }
    }

    fn matching(
        &self,
        model: &str,
        domain: Option<&Value>,
        kwargs: &Map<String, Value>,
    ) -> Result<Vec<Map<String, Value>>, String> {
        let conditions = domain.and_then(Value::as_array).cloned().unwrap_or_default();
        let mut rows = Vec::new();
        if let Some(table) = self.tables.get(model) {
            for record in table.values() {
                let mut keep = true;
                for condition in &conditions {
                    let term = condition.as_array().ok_or("invalid domain term")?;
                    let field = term.first().and_then(Value::as_str).ok_or("invalid field")?;
                    let operator = term.get(1).and_then(Value::as_str).ok_or("invalid operator")?;
                    if operator != "=" {
                        return Err(format!("operator {} not supported by stub", operator));
                    }
                    keep &= record.get(field) == term.get(2);
                }
                if keep {
                    rows.push(record.clone());
                }
            }
        }

        let offset = kwargs.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
        let limit = kwargs.get("limit").and_then(Value::as_u64).map(|l| l as usize);
        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }
}

fn project(record: &Map<String, Value>, kwargs: &Map<String, Value>) -> Value {
    let Some(fields) = kwargs.get("fields").and_then(Value::as_array) else {
        return Value::Object(record.clone());
    };
    let mut out = Map::new();
    out.insert("id".to_string(), record["id"].clone());
    for field in fields.iter().filter_map(Value::as_str) {
        out.insert(field.to_string(), record.get(field).cloned().unwrap_or(json!(false)));
    }
    Value::Object(out)
}

async fn common_endpoint(State(state): State<StubState>, body: String) -> impl IntoResponse {
    let xml = match xmlrpc::decode_call(&body) {
        Ok((method, params)) => {
            let stub = state.lock().unwrap();
            match method.as_str() {
                "version" => xmlrpc::encode_response(&json!({
                    "server_version": "18.0",
                    "server_serie": "18.0",
                    "protocol_version": 1
                })),
                "authenticate" => xmlrpc::encode_response(&stub.authenticate(&params)),
                other => xmlrpc::encode_fault(1, &format!("unknown method {}", other)),
            }
        }
        Err(e) => xmlrpc::encode_fault(1, &e.to_string()),
    };
    ([(CONTENT_TYPE, "text/xml")], xml)
}

async fn object_endpoint(State(state): State<StubState>, body: String) -> impl IntoResponse {
    let xml = match xmlrpc::decode_call(&body) {
        Ok((method, params)) if method == "execute_kw" => {
            let mut stub = state.lock().unwrap();
            match stub.execute_kw(&params) {
                Ok(value) => xmlrpc::encode_response(&value),
                Err(message) => xmlrpc::encode_fault(2, &message),
            }
        }
        Ok((method, _)) => xmlrpc::encode_fault(1, &format!("unknown method {}", method)),
        Err(e) => xmlrpc::encode_fault(1, &e.to_string()),
    };
    ([(CONTENT_TYPE, "text/xml")], xml)
}

/// Start the stub on an ephemeral port. Returns its base URL and shared state.
pub async fn start_stub_odoo(stub: StubOdoo) -> (String, StubState) {
    let state: StubState = Arc::new(Mutex::new(stub));
    let app = Router::new()
        .route("/xmlrpc/2/common", post(common_endpoint))
        .route("/xmlrpc/2/object", post(object_endpoint))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}
