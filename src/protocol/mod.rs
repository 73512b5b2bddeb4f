pub mod transport;
pub mod xmlrpc;

use thiserror::Error;

pub use transport::XmlRpcEndpoint;

/// Errors raised while talking to the remote XML-RPC endpoints
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Remote fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("Malformed XML-RPC payload: {0}")]
    Decode(String),

    #[error("Not authenticated")]
    NotAuthenticated,
}

impl From<reqwest::Error> for ProtocolError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<quick_xml::Error> for ProtocolError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
