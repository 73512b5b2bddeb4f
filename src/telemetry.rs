//! Shared tracing setup for the proxy and the CLI programs.

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `default_filter` applies.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
