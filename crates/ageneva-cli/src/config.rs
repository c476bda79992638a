//! Relay configuration file support
//!
//! The `run` command can load its settings from a TOML file instead of
//! flags, which keeps long strategy strings out of shell history.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the relay listens on
    pub listen: String,

    /// Upstream address requests are forwarded to
    pub upstream: Option<String>,

    /// Strategy string in Geneva syntax
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Country whose catalog strategies to use instead of `strategy`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Index into the country's strategy list
    pub index: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            upstream: None,
            strategy: None,
            country: None,
            index: 0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Validate the configuration: an upstream is required, exactly one
    /// strategy source must be set, and the strategy must parse.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.is_none() {
            bail!("config must set 'upstream'");
        }

        match (&self.strategy, &self.country) {
            (Some(_), Some(_)) => bail!("config must set only one of 'strategy' and 'country'"),
            (None, None) => bail!("config must set 'strategy' or 'country'"),
            (Some(strategy), None) => {
                ageneva_core::Strategy::new(strategy).context("invalid 'strategy' in config")?;
            }
            (None, Some(country)) => {
                let list = ageneva_core::catalog::strategies_for(country)
                    .with_context(|| format!("unknown country {country:?} in config"))?;
                if self.index >= list.len() {
                    bail!(
                        "index {} out of range: {} has {} strategies",
                        self.index,
                        country,
                        list.len()
                    );
                }
            }
        }

        Ok(())
    }
}
