use odoo_proxy::api::ProxyServer;
use odoo_proxy::config::ProxyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProxyConfig::load()?;
    odoo_proxy::telemetry::init(config.log_filter());
    tracing::info!("Odoo proxy starting (debug: {})", config.debug);
    tracing::debug!("Configuration: {:?}", config);

    let server = ProxyServer::new(config);
    if let Err(e) = server.start().await {
        tracing::error!("Proxy server error: {}", e);
        return Err(e);
    }

    tracing::info!("Odoo proxy shutting down");
    Ok(())
}
