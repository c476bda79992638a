//! Logging initialization
//!
//! Diagnostics always go to stderr: `apply` and `normalize` write raw
//! request bytes to stdout, and interleaving log lines with them would
//! corrupt the output.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{Args, LogFormat};

/// Initialize the tracing subscriber from CLI arguments. An explicit
/// RUST_LOG wins over the verbosity flags, and an optional log file
/// receives a plain-text copy regardless of the stderr format.
pub fn init(args: &Args) -> Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => {
            EnvFilter::try_new(verbosity_filter(args)).context("Failed to build log filter")?
        }
    };

    let file_copy = match &args.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {path}"))?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(args.verbose >= 2);

    let registry = tracing_subscriber::registry().with(filter).with(file_copy);
    match args.log_format {
        LogFormat::Text => registry.with(stderr).init(),
        LogFormat::Json => registry.with(stderr.json()).init(),
        LogFormat::Compact => registry.with(stderr.compact()).init(),
    }

    Ok(())
}

/// Map the verbosity flags to filter directives. `-v` raises the
/// strategy engine to debug (rule decisions, lossy-path diagnostics),
/// `-vv` to trace (trigger matches, buffered flushes), without pulling
/// in every dependency's output.
fn verbosity_filter(args: &Args) -> &'static str {
    if args.quiet {
        return "error";
    }

    match args.verbose {
        0 => "info",
        1 => "info,ageneva_core=debug",
        2 => "debug,ageneva_core=trace",
        _ => "trace",
    }
}
