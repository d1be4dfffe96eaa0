//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ledgerwise - Monthly financial summary and insights
#[derive(Parser)]
#[command(name = "ledgerwise")]
#[command(about = "Monthly financial summary and insight engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger CSV file (date,type,amount,category[,user])
    #[arg(
        short,
        long,
        default_value = "ledger.csv",
        env = "LEDGERWISE_LEDGER",
        global = true
    )]
    pub file: PathBuf,

    /// Config file (defaults to the user config directory, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Caller identity; reports are scoped to this user
    #[arg(short, long, env = "LEDGERWISE_USER", global = true)]
    pub user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the monthly report with insights
    Report {
        /// Month to report on (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Use local rule-based insights even if a text-generation backend is configured
        #[arg(long)]
        local: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show monthly totals without insights
    Stats {
        /// Month to summarize (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the prompt that would be sent to the text-generation backend
    Prompt {
        /// Month to build the prompt for (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Test the configured text-generation backend
    AiTest,
}
