use super::{xmlrpc, ProtocolError};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;

/// Timeout applied when the caller does not configure one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by the two endpoints of one connection
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ProtocolError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ProtocolError::from)
}

/// One XML-RPC endpoint (`.../xmlrpc/2/common` or `.../xmlrpc/2/object`)
#[derive(Debug, Clone)]
pub struct XmlRpcEndpoint {
    url: String,
    http: reqwest::Client,
}

impl XmlRpcEndpoint {
    pub fn new(url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform a single call. Parameters are never logged; they carry the password.
    pub async fn call(&self, method: &str, params: &[Value]) -> Result<Value, ProtocolError> {
        tracing::debug!("XML-RPC {} -> {}", method, self.url);

        let body = xmlrpc::encode_call(method, params);
        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ProtocolError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        xmlrpc::decode_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_url() {
        let http = http_client(DEFAULT_TIMEOUT).unwrap();
        let endpoint = XmlRpcEndpoint::new("http://localhost:8069/xmlrpc/2/common", http);
        assert_eq!(endpoint.url(), "http://localhost:8069/xmlrpc/2/common");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let http = http_client(Duration::from_secs(2)).unwrap();
        let endpoint = XmlRpcEndpoint::new("http://127.0.0.1:9/xmlrpc/2/common", http);
        let result = endpoint.call("version", &[]).await;
        assert!(matches!(result, Err(ProtocolError::Transport(_))));
    }
}
