pub mod error;
pub mod handlers;
pub mod request;

pub use error::ApiError;

use crate::config::ProxyConfig;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Proxy server state. Holds only the immutable configuration; every request
/// builds its own Odoo connection.
#[derive(Clone)]
pub struct ProxyServer {
    pub config: Arc<ProxyConfig>,
}

impl ProxyServer {
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health::health_check))
            .route("/api/authenticate", post(handlers::auth::authenticate))
            .route("/api/employee/:uid", post(handlers::employee::get_employee_info))
            .route("/api/projects/:employee_id", post(handlers::projects::get_employee_projects))
            .route(
                "/api/activities/:employee_id/:project_id",
                post(handlers::projects::get_project_activities),
            )
            .route("/api/attendance", post(handlers::attendance::register_attendance))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(self.clone())
    }

    pub async fn start(self) -> Result<()> {
        let listen_addr = self.config.listen_addr();
        tracing::info!(
            "Odoo proxy starting on {} (default server: {}, db: {})",
            listen_addr,
            self.config.remote.url,
            self.config.remote.db
        );

        let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
        tracing::info!("Odoo proxy listening on http://{}", listen_addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}
