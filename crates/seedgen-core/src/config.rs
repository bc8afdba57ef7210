//! Generator configuration.
//!
//! Provides [`GeneratorConfig`] with defaults for entropy collection, the
//! custom search bound and WIF export. Binaries layer environment variables
//! and command-line flags on top.

use std::time::Duration;

use crate::constants::DEFAULT_MAX_ATTEMPTS;
use crate::entropy::{CollectorConfig, EntropyProfile};
use crate::wif::Network;

/// Configuration for a [`Generator`](crate::Generator).
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Concurrent collector settings used by random generation.
    pub collector: CollectorConfig,
    /// Attempt bound for custom mnemonic searches.
    pub max_attempts: u32,
    /// Entropy profile for each custom search attempt.
    pub search_profile: EntropyProfile,
    /// Export WIF keys for compressed public keys.
    pub compressed: bool,
    /// Network WIF keys are exported for.
    pub network: Network,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            collector: CollectorConfig::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            search_profile: EntropyProfile::Quick,
            compressed: true,
            network: Network::Mainnet,
        }
    }
}

impl GeneratorConfig {
    /// Short collector budget and small worker pool, for tests and tools
    /// that generate many mnemonics.
    pub fn fast() -> Self {
        Self {
            collector: CollectorConfig {
                budget: Duration::from_millis(50),
                max_samples: 16,
                ..CollectorConfig::default()
            },
            ..Self::default()
        }
    }

    /// Replace the collector's time budget.
    pub fn with_collect_budget(mut self, budget: Duration) -> Self {
        self.collector.budget = budget;
        self
    }

    pub fn testnet(&self) -> bool {
        self.network == Network::Testnet
    }
}
