use super::error::ApiError;
use crate::config::{RemoteDefaults, RemoteTarget};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Parsed JSON object body of a proxy request
#[derive(Debug, Clone)]
pub struct RequestBody(Map<String, Value>);

impl RequestBody {
    pub fn parse(bytes: &[u8]) -> Result<Self, ApiError> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Err(ApiError::MissingBody),
        }
    }

    fn present(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Fails on the first field, in the given order, that is absent or null.
    pub fn require(&self, fields: &[&str]) -> Result<(), ApiError> {
        match fields.iter().find(|f| self.present(f).is_none()) {
            Some(missing) => Err(ApiError::MissingField(missing.to_string())),
            None => Ok(()),
        }
    }

    pub fn field<T: DeserializeOwned>(&self, name: &str) -> Result<T, ApiError> {
        let value = self
            .present(name)
            .ok_or_else(|| ApiError::MissingField(name.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|_| ApiError::InvalidField(name.to_string()))
    }

    pub fn optional<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T, ApiError> {
        match self.present(name) {
            Some(_) => self.field(name),
            None => Ok(default),
        }
    }

    /// `url` / `db` from the body, falling back to the configured defaults
    pub fn target(&self, defaults: &RemoteDefaults) -> RemoteTarget {
        defaults.target(self.text("url"), self.text("db"))
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.present(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}
