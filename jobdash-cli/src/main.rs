//! Jobdash CLI
//!
//! Command-line interface for the Jobdash job dashboard.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "jobdash")]
#[command(about = "Job dashboard CLI: list, add and retry jobs", long_about = None)]
struct Cli {
    /// Dashboard server URL
    #[arg(long, env = "JOBDASH_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config { server_url: cli.url };

    handle_command(cli.command, &config).await
}
