//! agmon - command line tool for agricultural monitoring payloads.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "agmon",
    version,
    about = "Validation metrics and growth analysis for satellite vegetation data"
)]
struct Cli {
    #[command(subcommand)]
    command: agmon_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("agmon {}", env!("CARGO_PKG_VERSION"));
    agmon_cmd::run(cli.command).await
}
