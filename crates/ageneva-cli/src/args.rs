//! Command-line argument parsing

use crate::commands::Command;
use clap::{Parser, ValueEnum};

/// ageneva - application-layer Geneva for HTTP
///
/// Mutates outgoing HTTP/1.x requests with Geneva strategies so that
/// censoring middleboxes fail to match hostnames and keywords, and
/// normalizes mutated requests back into RFC-conformant form.
#[derive(Parser, Debug)]
#[command(name = "ageneva")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Log file path
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<String>,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}
