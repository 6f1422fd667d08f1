//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for fauna-dump using clap.

pub mod commands;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::domain::DumpError;
use clap::{Parser, Subcommand};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// fauna-dump - export Fauna collections to CSV
#[derive(Parser, Debug)]
#[command(name = "fauna-dump")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "FAUNA_DUMP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FAUNA_DUMP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export collections to CSV files
    Export(commands::export::ExportArgs),

    /// List collections and whether they are selected for export
    Collections(commands::collections::CollectionsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Print an error and return its exit code
pub(crate) fn fail(context: &str, error: &DumpError) -> i32 {
    tracing::error!(error = %error, "{context}");
    eprintln!("❌ {context}");
    eprintln!("   Error: {error}");
    error.exit_code()
}

/// Split a comma-separated CLI list, dropping blanks
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
