//! ageneva CLI
//!
//! Command-line interface for applying, normalizing, and inspecting
//! Geneva HTTP strategies.

mod args;
mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(&args)?;

    let result = run(args);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    match args.command {
        commands::Command::Run(run_args) => commands::run::execute(run_args),
        commands::Command::Apply(apply_args) => commands::apply::execute(apply_args),
        commands::Command::Normalize(norm_args) => commands::normalize::execute(norm_args),
        commands::Command::Check(check_args) => commands::check::execute(check_args),
        commands::Command::Config(config_args) => commands::config::execute(config_args),
        commands::Command::List(list_args) => commands::list::execute(list_args),
        commands::Command::Completions(comp_args) => commands::completions::execute(comp_args),
    }
}
