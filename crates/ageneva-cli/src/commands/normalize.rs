//! Normalize command - repair a mutated request

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use ageneva_core::normalize_request;

use super::apply::{read_input, write_output};

/// Normalize command arguments
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Request file to read (default: stdin)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// File to write the normalized request to (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute normalize command
pub fn execute(args: NormalizeArgs) -> Result<()> {
    let raw = read_input(&args.input)?;
    let normalized = normalize_request(&raw).context("Failed to normalize request")?;
    write_output(&args.output, &normalized)
}
