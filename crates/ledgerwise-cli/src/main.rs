//! Ledgerwise CLI - Monthly financial summary and insights
//!
//! Usage:
//!   ledgerwise report --user alice             Report for the current month
//!   ledgerwise report --month 2026-09 --json   Report for September as JSON
//!   ledgerwise stats --month 2026-09           Totals only
//!   ledgerwise ai-test                         Check the text-generation backend

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let user = cli.user.as_deref();

    match cli.command {
        Commands::Report { month, local, json } => {
            let as_of = commands::resolve_month(month.as_deref())?;
            commands::cmd_report(&config, &cli.file, user, as_of, local, json).await
        }
        Commands::Stats { month, json } => {
            let as_of = commands::resolve_month(month.as_deref())?;
            commands::cmd_stats(&config, &cli.file, user, as_of, json)
        }
        Commands::Prompt { month } => {
            let as_of = commands::resolve_month(month.as_deref())?;
            commands::cmd_prompt(&config, &cli.file, user, as_of)
        }
        Commands::AiTest => commands::cmd_ai_test(&config).await,
    }
}
