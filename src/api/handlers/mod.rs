pub mod attendance;
pub mod auth;
pub mod employee;
pub mod health;
pub mod projects;

use super::{ApiError, ProxyServer};
use crate::config::RemoteTarget;
use crate::odoo::OdooClient;

/// Numeric id from a URL segment; a malformed id is `InvalidField(name)`
pub(crate) fn path_id(raw: &str, name: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::InvalidField(name.to_string()))
}

/// Fresh, authenticated connection for one request
pub(crate) async fn connect(
    state: &ProxyServer,
    target: &RemoteTarget,
    username: &str,
    password: &str,
) -> Result<OdooClient, ApiError> {
    let mut client = OdooClient::with_timeout(
        &target.url,
        &target.db,
        username,
        password,
        state.config.request_timeout(),
    )?;

    if client.authenticate().await.is_none() {
        return Err(ApiError::AuthenticationFailed);
    }
    Ok(client)
}
