//! Arguments and helpers shared by the one-shot Odoo programs.

pub mod commands;

use clap::Args;
use odoo_proxy::odoo::OdooClient;
use std::process::ExitCode;

/// Positional connection parameters: `<url> <db> <username> <password>`
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Odoo server URL, e.g. http://localhost:8069
    pub url: String,
    /// Database name
    pub db: String,
    /// Login of the Odoo user
    pub username: String,
    /// Password or API key
    pub password: String,
}

impl ConnectionArgs {
    pub fn client(&self) -> anyhow::Result<OdooClient> {
        Ok(OdooClient::new(&self.url, &self.db, &self.username, &self.password)?)
    }

    /// Human-readable summary with the password masked
    pub fn summary(&self) -> String {
        format!(
            "Parámetros recibidos:\n  url: {}\n  db: {}\n  username: {}\n  password: {}",
            self.url,
            self.db,
            self.username,
            mask(&self.password)
        )
    }
}

fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count().min(8))
}

pub fn init_logging() {
    odoo_proxy::telemetry::init("warn");
}

pub fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
