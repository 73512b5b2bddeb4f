use clap::Parser;
use odoo_proxy_cli::{commands, exit_code, ConnectionArgs};
use std::process::ExitCode;

/// Check connectivity and credentials against an Odoo server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    conn: ConnectionArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    odoo_proxy_cli::init_logging();

    let ok = commands::auth(&args.conn, &mut std::io::stdout()).await?;
    Ok(exit_code(ok))
}
