//! Proxy handler errors. Each variant maps to an HTTP status code and a
//! `{success: false, error}` JSON body.

use crate::protocol::ProtocolError;
use axum::http::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("No se recibieron datos JSON")]
    MissingBody,

    #[error("Campo requerido faltante: {0}")]
    MissingField(String),

    #[error("Campo con formato inválido: {0}")]
    InvalidField(String),

    #[error("{0}")]
    NotFound(String),

    #[error("No se pudo autenticar con Odoo")]
    AuthenticationFailed,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingBody | Self::MissingField(_) | Self::InvalidField(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AuthenticationFailed | Self::Protocol(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "success": false,
            "error": self.to_string(),
        })
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = axum::Json(self.to_json());
        (status, body).into_response()
    }
}
