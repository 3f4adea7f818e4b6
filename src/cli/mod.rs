//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Mascara using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Mascara - schema-agnostic PII anonymization
#[derive(Parser, Debug)]
#[command(name = "mascara")]
#[command(version, about, long_about = None)]
#[command(author = "Mascara Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "mascara.toml", env = "MASCARA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MASCARA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a document file and write the rewritten records
    Run(commands::run::RunArgs),

    /// Classify fields only and show what a run would substitute
    Inspect(commands::inspect::InspectArgs),
}
