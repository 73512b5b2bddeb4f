use clap::Parser;
use odoo_proxy_cli::{commands, exit_code, ConnectionArgs};
use std::process::ExitCode;

/// Print the activities of one project as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    conn: ConnectionArgs,
    /// hr.employee id
    employee_id: i64,
    /// project.project id
    project_id: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    odoo_proxy_cli::init_logging();

    let ok = commands::activities(
        &args.conn,
        args.employee_id,
        args.project_id,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await?;
    Ok(exit_code(ok))
}
