//! Odoo external API client.
//!
//! Wraps the two XML-RPC endpoints (`/xmlrpc/2/common` and `/xmlrpc/2/object`)
//! behind typed methods. Every public operation logs remote failures and
//! returns an empty / `None` / `false` value instead of an error, so callers
//! never see a `ProtocolError`.

pub mod attendance;
pub mod query;

pub use attendance::{AttendanceEntry, ListOption};
pub use query::{Condition, Query};

use crate::protocol::transport::{http_client, DEFAULT_TIMEOUT};
use crate::protocol::{ProtocolError, XmlRpcEndpoint};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// A record as returned by `read` / `search_read`
pub type Record = Map<String, Value>;

/// Model methods this client is allowed to invoke through `execute_kw`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMethod {
    CheckAccessRights,
    Search,
    Read,
    SearchRead,
    Create,
    Write,
    Unlink,
    GetEmployeeAllProject,
    GetEmployeeAllActividad,
    GetPedirAvance,
    AttendanceManual,
}

impl RemoteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckAccessRights => "check_access_rights",
            Self::Search => "search",
            Self::Read => "read",
            Self::SearchRead => "search_read",
            Self::Create => "create",
            Self::Write => "write",
            Self::Unlink => "unlink",
            Self::GetEmployeeAllProject => "get_employee_all_project",
            Self::GetEmployeeAllActividad => "get_employee_all_actividad",
            Self::GetPedirAvance => "get_pedir_avance",
            Self::AttendanceManual => "attendance_manual",
        }
    }
}

impl std::fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection to one Odoo database with one set of credentials.
///
/// The session uid is filled in by [`OdooClient::authenticate`]; until then
/// every model operation returns its empty value without touching the network.
#[derive(Debug)]
pub struct OdooClient {
    url: String,
    db: String,
    username: String,
    password: String,
    uid: Option<i64>,
    common: XmlRpcEndpoint,
    object: XmlRpcEndpoint,
}

impl OdooClient {
    pub fn new(url: &str, db: &str, username: &str, password: &str) -> Result<Self, ProtocolError> {
        Self::with_timeout(url, db, username, password, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        url: &str,
        db: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, ProtocolError> {
        let url = url.trim_end_matches('/').to_string();
        let http = http_client(timeout)?;
        let common = XmlRpcEndpoint::new(format!("{}/xmlrpc/2/common", url), http.clone());
        let object = XmlRpcEndpoint::new(format!("{}/xmlrpc/2/object", url), http);

        tracing::info!("Odoo connection prepared: {} (db: {})", url, db);
        Ok(Self {
            url,
            db: db.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            uid: None,
            common,
            object,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn db(&self) -> &str {
        &self.db
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn uid(&self) -> Option<i64> {
        self.uid
    }

    pub fn is_authenticated(&self) -> bool {
        self.uid.is_some()
    }

    /// `common.authenticate`. Returns the uid on success; rejection and
    /// transport errors both leave the client unauthenticated.
    pub async fn authenticate(&mut self) -> Option<i64> {
        let params = [
            json!(self.db),
            json!(self.username),
            json!(self.password),
            json!({}),
        ];

        self.uid = match self.common.call("authenticate", &params).await {
            Ok(value) => match value.as_i64().filter(|uid| *uid > 0) {
                Some(uid) => {
                    tracing::info!("Authenticated '{}' on {} (uid {})", self.username, self.db, uid);
                    Some(uid)
                }
                None => {
                    tracing::error!("Authentication rejected for '{}' on {}", self.username, self.db);
                    None
                }
            },
            Err(e) => {
                tracing::error!("Authentication error for '{}': {}", self.username, e);
                None
            }
        };
        self.uid
    }

    /// `common.version`, or an empty object when the server is unreachable
    pub async fn version(&self) -> Record {
        match self.common.call("version", &[]).await {
            Ok(Value::Object(info)) => {
                tracing::info!("Server version: {:?}", info.get("server_version"));
                info
            }
            Ok(other) => {
                tracing::error!("Unexpected version payload: {}", other);
                Map::new()
            }
            Err(e) => {
                tracing::error!("Failed to query server version: {}", e);
                Map::new()
            }
        }
    }

    pub async fn check_access_rights(&self, model: &str, operation: &str) -> bool {
        let mut kwargs = Map::new();
        kwargs.insert("raise_exception".to_string(), json!(false));
        let result = self
            .execute_as::<bool>(model, RemoteMethod::CheckAccessRights, vec![json!(operation)], kwargs)
            .await;
        unwrap_or_log(result, "check_access_rights", model)
    }

    pub async fn search(&self, query: &Query) -> Vec<i64> {
        let result = self
            .execute_as(&query.model, RemoteMethod::Search, vec![query.domain_value()], query.search_kwargs())
            .await;
        unwrap_or_log(result, "search", &query.model)
    }

    /// Records for `ids`, in server order. An empty id list short-circuits.
    pub async fn read(&self, model: &str, ids: &[i64], fields: &[&str]) -> Vec<Record> {
        if ids.is_empty() {
            tracing::debug!("read on {} skipped: no ids", model);
            return Vec::new();
        }

        let mut kwargs = Map::new();
        if !fields.is_empty() {
            kwargs.insert("fields".to_string(), json!(fields));
        }
        let result = self
            .execute_as(model, RemoteMethod::Read, vec![json!(ids)], kwargs)
            .await;
        unwrap_or_log(result, "read", model)
    }

    pub async fn search_read(&self, query: &Query) -> Vec<Record> {
        let result = self
            .execute_as(
                &query.model,
                RemoteMethod::SearchRead,
                vec![query.domain_value()],
                query.search_read_kwargs(),
            )
            .await;
        unwrap_or_log(result, "search_read", &query.model)
    }

    pub async fn create(&self, model: &str, values: &Record) -> Option<i64> {
        let result = self
            .execute_as::<i64>(model, RemoteMethod::Create, vec![Value::Object(values.clone())], Map::new())
            .await;
        match result {
            Ok(id) => {
                tracing::info!("Created {} record {}", model, id);
                Some(id)
            }
            Err(e) => {
                tracing::error!("create on {} failed: {}", model, e);
                None
            }
        }
    }

    pub async fn write(&self, model: &str, ids: &[i64], values: &Record) -> bool {
        let result = self
            .execute_as::<bool>(
                model,
                RemoteMethod::Write,
                vec![json!(ids), Value::Object(values.clone())],
                Map::new(),
            )
            .await;
        let ok = unwrap_or_log(result, "write", model);
        if ok {
            tracing::info!("Updated {} records {:?}", model, ids);
        }
        ok
    }

    pub async fn unlink(&self, model: &str, ids: &[i64]) -> bool {
        let result = self
            .execute_as::<bool>(model, RemoteMethod::Unlink, vec![json!(ids)], Map::new())
            .await;
        let ok = unwrap_or_log(result, "unlink", model);
        if ok {
            tracing::info!("Deleted {} records {:?}", model, ids);
        }
        ok
    }

    /// Invoke a model method with positional and keyword arguments.
    /// The raw remote value is returned uninterpreted.
    pub async fn call_method(
        &self,
        model: &str,
        method: RemoteMethod,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Option<Value> {
        match self.execute_kw(model, method, args, kwargs).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("{}.{} failed: {}", model, method, e);
                None
            }
        }
    }

    async fn execute_kw(
        &self,
        model: &str,
        method: RemoteMethod,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value, ProtocolError> {
        let uid = self.uid.ok_or(ProtocolError::NotAuthenticated)?;
        let params = [
            json!(self.db),
            json!(uid),
            json!(self.password),
            json!(model),
            json!(method.as_str()),
            Value::Array(args),
            Value::Object(kwargs),
        ];
        self.object.call("execute_kw", &params).await
    }

    async fn execute_as<T: DeserializeOwned>(
        &self,
        model: &str,
        method: RemoteMethod,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<T, ProtocolError> {
        let value = self.execute_kw(model, method, args, kwargs).await?;
        serde_json::from_value(value)
            .map_err(|e| ProtocolError::Decode(format!("unexpected {} result: {}", method, e)))
    }
}

fn unwrap_or_log<T: Default>(result: Result<T, ProtocolError>, operation: &str, model: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!("{} on {} failed: {}", operation, model, e);
        T::default()
    })
}
