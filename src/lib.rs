pub mod api;
pub mod config;
pub mod odoo;
pub mod protocol;
pub mod telemetry;
