use clap::Parser;
use odoo_proxy_cli::{commands, exit_code, ConnectionArgs};
use std::process::ExitCode;

/// Print the projects of the authenticated user's employee as JSON
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

    let ok = commands::projects(&args.conn, &mut std::io::stdout(), &mut std::io::stderr()).await?;
    Ok(exit_code(ok))
}
