//! List command - browse the strategy catalog

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ageneva_core::catalog;

/// List command arguments
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Country to list strategies for (default: all countries)
    pub country: Option<String>,
}

/// Execute list command
pub fn execute(args: ListArgs) -> Result<()> {
    match args.country {
        Some(country) => {
            let list = catalog::strategies_for(&country)
                .with_context(|| format!("no strategies for country {country:?}"))?;

            println!("{} ({} strategies)", country.cyan().bold(), list.len());
            for (i, strategy) in list.iter().enumerate() {
                println!("  {:>3}  {}", i, strategy);
            }
        }
        None => {
            println!("{}", "Built-in strategy catalog".cyan().bold());
            println!();
            for country in catalog::countries() {
                let list = catalog::strategies_for(country).unwrap_or_default();
                println!("  {:<14} {} strategies", country, list.len());
            }
            println!();
            println!("Use 'ageneva list <country>' to see the strategies.");
        }
    }

    Ok(())
}
