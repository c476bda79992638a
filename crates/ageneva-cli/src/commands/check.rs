//! Check command - verify strategies survive normalization

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use ageneva_core::catalog;
use ageneva_core::check::check_strategy;

/// Check command arguments
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Strategy string to check
    #[arg(short, long, conflicts_with = "country")]
    pub strategy: Option<String>,

    /// Check every catalog strategy for this country
    #[arg(short, long)]
    pub country: Option<String>,

    /// Print the normalized request for each canonical request
    #[arg(long)]
    pub show_normalized: bool,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let strategies: Vec<(String, String)> = match (&args.strategy, &args.country) {
        (Some(strategy), None) => vec![("strategy".to_string(), strategy.clone())],
        (None, Some(country)) => {
            let list = catalog::strategies_for(country)
                .with_context(|| format!("no strategies for country {country:?}"))?;
            list.iter()
                .enumerate()
                .map(|(i, s)| (format!("{country}[{i}]"), (*s).to_string()))
                .collect()
        }
        _ => bail!("either --strategy or --country is required"),
    };

    let mut failures = 0;
    for (label, strategy) in &strategies {
        let report = check_strategy(strategy)
            .with_context(|| format!("{label} is not a valid strategy: {strategy}"))?;

        if report.passed() {
            let restored = report.outcomes.iter().all(|o| o.restored());
            let note = if restored {
                "restored".green()
            } else {
                "inferred".yellow()
            };
            println!("{} {} ({}) {}", "✓".green(), label, note, strategy.dimmed());
        } else {
            failures += 1;
            println!("{} {} {}", "✗".red(), label, strategy.dimmed());
        }

        for outcome in &report.outcomes {
            if let Some(failure) = &outcome.failure {
                println!("    {}: {}", outcome.name, failure.red());
            } else if !outcome.diffs.is_empty() {
                println!("    {}: {}", outcome.name, outcome.diffs.join(", ").yellow());
            }

            if args.show_normalized {
                if let Some(normalized) = &outcome.normalized {
                    println!("    {}: {:?}", outcome.name, normalized);
                }
            }
        }
    }

    println!();
    if failures > 0 {
        println!(
            "{}",
            format!("{failures} of {} strategies failed", strategies.len()).red()
        );
        bail!("check failed");
    }

    println!(
        "{}",
        format!("All {} strategies passed", strategies.len()).green()
    );
    Ok(())
}
