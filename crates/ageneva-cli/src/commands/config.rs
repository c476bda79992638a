//! Config command - relay configuration management

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Generate a template configuration
    Generate {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate
        file: PathBuf,
    },
}

/// Execute config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Generate { output } => generate(output),
        ConfigAction::Validate { file } => validate(file),
    }
}

fn generate(output: Option<PathBuf>) -> Result<()> {
    let config = Config {
        upstream: Some("example.com:80".to_string()),
        country: Some("China".to_string()),
        ..Config::default()
    };

    let toml = config.to_toml()?;
    let content = format!(
        "# ageneva relay configuration\n\
         # Set either 'strategy' or 'country' (with an optional 'index').\n\n\
         {toml}"
    );

    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Configuration file generated: {}", path.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}

fn validate(file: PathBuf) -> Result<()> {
    let config = Config::load(&file)?;
    config
        .validate()
        .context("Configuration validation failed")?;

    println!("✓ Configuration is valid");
    println!("  listen:   {}", config.listen);
    if let Some(upstream) = &config.upstream {
        println!("  upstream: {upstream}");
    }

    Ok(())
}
