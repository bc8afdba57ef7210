//! CLI settings layered from `SEEDGEN_*` environment variables.
//!
//! Command-line flags override anything read here.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use seedgen_core::wif::Network;
use seedgen_core::GeneratorConfig;

#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// Word-list file replacing the built-in English list.
    pub wordlist: Option<PathBuf>,
    /// Tracing filter directive.
    pub log_level: Option<String>,
    /// Collector budget in milliseconds.
    pub collect_budget_ms: Option<u64>,
    /// Attempt bound for custom searches.
    pub max_attempts: Option<u32>,
    /// Default network for WIF export.
    pub network: Option<Network>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which returns the value of a variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let wordlist = lookup("SEEDGEN_WORDLIST").map(PathBuf::from);
        let log_level = lookup("SEEDGEN_LOG");

        let collect_budget_ms = lookup("SEEDGEN_COLLECT_BUDGET_MS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("SEEDGEN_COLLECT_BUDGET_MS must be a non-negative integer")?;

        let max_attempts = lookup("SEEDGEN_MAX_ATTEMPTS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("SEEDGEN_MAX_ATTEMPTS must be a non-negative integer")?;

        let network = lookup("SEEDGEN_NETWORK")
            .map(|v| parse_network(&v))
            .transpose()?;

        Ok(Settings {
            wordlist,
            log_level,
            collect_budget_ms,
            max_attempts,
            network,
        })
    }

    /// Build the core generator config from these settings.
    pub fn generator_config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        if let Some(ms) = self.collect_budget_ms {
            config = config.with_collect_budget(Duration::from_millis(ms));
        }
        if let Some(attempts) = self.max_attempts {
            config.max_attempts = attempts;
        }
        if let Some(network) = self.network {
            config.network = network;
        }
        config
    }
}

/// Parse network string to Network enum.
pub fn parse_network(s: &str) -> Result<Network> {
    match s.to_lowercase().as_str() {
        "mainnet" => Ok(Network::Mainnet),
        "testnet" => Ok(Network::Testnet),
        _ => bail!("Invalid network (must be 'mainnet' or 'testnet')"),
    }
}
