//! Apply command - mutate a raw request

use anyhow::{Context, Result};
use clap::Args;
use std::io::{Read, Write};
use std::path::PathBuf;

use ageneva_core::Strategy;

use super::StrategyPick;

/// Apply command arguments
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub pick: StrategyPick,

    /// Request file to read (default: stdin)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// File to write the mutated request to (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute apply command
pub fn execute(args: ApplyArgs) -> Result<()> {
    let strategy = Strategy::new(&args.pick.resolve()?)?;

    let raw = read_input(&args.input)?;
    let mutated = strategy
        .apply_to_bytes(&raw)
        .context("Failed to apply strategy")?;
    write_output(&args.output, &mutated)
}

pub(super) fn read_input(input: &Option<PathBuf>) -> Result<Vec<u8>> {
    match input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

pub(super) fn write_output(output: &Option<PathBuf>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            std::io::stdout()
                .write_all(bytes)
                .context("Failed to write stdout")
        }
    }
}
