//! CLI commands

pub mod apply;
pub mod check;
pub mod completions;
pub mod config;
pub mod list;
pub mod normalize;
pub mod run;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use ageneva_core::catalog;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a local relay that applies a strategy to outbound requests
    Run(run::RunArgs),

    /// Apply a strategy to a raw HTTP request
    Apply(apply::ApplyArgs),

    /// Normalize a mutated HTTP request
    Normalize(normalize::NormalizeArgs),

    /// Check that strategies survive normalization
    Check(check::CheckArgs),

    /// Relay configuration management
    Config(config::ConfigArgs),

    /// List the built-in strategy catalog
    List(list::ListArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Flags selecting the strategy a command applies
#[derive(clap::Args, Debug)]
pub struct StrategyPick {
    /// Strategy string in Geneva syntax
    #[arg(short, long, conflicts_with = "country")]
    pub strategy: Option<String>,

    /// Use a strategy from the built-in catalog for this country
    #[arg(short, long)]
    pub country: Option<String>,

    /// Index into the country's strategy list
    #[arg(short, long, default_value = "0", requires = "country")]
    pub index: usize,
}

impl StrategyPick {
    /// Resolve the flags to a strategy string.
    pub fn resolve(&self) -> Result<String> {
        if let Some(strategy) = &self.strategy {
            return Ok(strategy.clone());
        }

        let Some(country) = &self.country else {
            bail!("either --strategy or --country is required");
        };
        let list = catalog::strategies_for(country)
            .with_context(|| format!("no strategies for country {country:?}"))?;
        let strategy = list.get(self.index).with_context(|| {
            format!(
                "index {} out of range: {} has {} strategies",
                self.index,
                country,
                list.len()
            )
        })?;
        Ok((*strategy).to_string())
    }
}
