//! High-level generation API.
//!
//! [`Generator`] ties the pieces together: it draws entropy, encodes
//! mnemonics, runs custom searches and derives keys. The word-list is loaded
//! once and shared read-only.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GeneratorConfig;
use crate::entropy::{EntropyProfile, EntropySource, SystemEntropy};
use crate::error::SeedgenError;
use crate::keys::{self, MasterKey, Seed};
use crate::mnemonic::{Mnemonic, MnemonicCodec, WordCount};
use crate::search::{CustomRequest, CustomSearch};
use crate::wif::{self, Network};
use crate::wordlist::WordList;

/// Everything derived from one mnemonic, ready for display or JSON output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyReport {
    pub mnemonic: String,
    pub word_count: usize,
    pub created_at: NaiveDateTime,
    pub seed_hex: String,
    pub private_key_hex: String,
    pub chain_code_hex: String,
    pub wif: String,
    pub network: Network,
    pub compressed: bool,
}

impl KeyReport {
    /// Derive the seed, master key and WIF of `mnemonic` created at `created`.
    pub fn new(mnemonic: &Mnemonic, created: NaiveDateTime, compressed: bool, network: Network) -> Self {
        let (seed, master) = keys::derive(mnemonic, created);
        Self {
            mnemonic: mnemonic.to_string(),
            word_count: mnemonic.words().len(),
            created_at: created,
            seed_hex: seed.to_hex(),
            private_key_hex: master.private_key_hex(),
            chain_code_hex: master.chain_code_hex(),
            wif: wif::encode_for(master.private_key(), compressed, network),
            network,
            compressed,
        }
    }
}

impl fmt::Debug for KeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyReport")
            .field("word_count", &self.word_count)
            .field("created_at", &self.created_at)
            .field("network", &self.network)
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}

/// Mnemonic generator over an injected word-list.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    codec: MnemonicCodec,
}

impl Generator {
    pub fn new(config: GeneratorConfig, wordlist: Arc<WordList>) -> Self {
        Self {
            config,
            codec: MnemonicCodec::new(wordlist),
        }
    }

    /// A generator over the built-in English word-list.
    pub fn english(config: GeneratorConfig) -> Self {
        Self::new(config, Arc::new(WordList::english()))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn codec(&self) -> &MnemonicCodec {
        &self.codec
    }

    /// Generate a mnemonic from every entropy lane, including the collector.
    pub fn generate_random(&self, word_count: WordCount) -> (Mnemonic, NaiveDateTime) {
        let mut source = SystemEntropy::new(EntropyProfile::Full, self.config.collector.clone());
        self.generate_random_with(&mut source, word_count)
    }

    /// [`generate_random`](Self::generate_random) drawing from `source`.
    pub fn generate_random_with<S: EntropySource + ?Sized>(
        &self,
        source: &mut S,
        word_count: WordCount,
    ) -> (Mnemonic, NaiveDateTime) {
        let entropy = source.draw(word_count);
        let mnemonic = self.codec.encode(&entropy);
        let created = now();
        info!(words = word_count.words(), "generated mnemonic");
        (mnemonic, created)
    }

    /// Find a 12-word mnemonic with `words[i]` at 1-based `positions[i]`.
    pub fn generate_custom<S: AsRef<str>>(
        &self,
        words: &[S],
        positions: &[usize],
    ) -> Result<(Mnemonic, NaiveDateTime), SeedgenError> {
        let request = CustomRequest::new(words, positions);
        let mut source = SystemEntropy::new(self.config.search_profile, self.config.collector.clone());
        self.generate_custom_with(&request, &mut source)
    }

    /// [`generate_custom`](Self::generate_custom) drawing from `source`.
    pub fn generate_custom_with<S: EntropySource + ?Sized>(
        &self,
        request: &CustomRequest,
        source: &mut S,
    ) -> Result<(Mnemonic, NaiveDateTime), SeedgenError> {
        let search = CustomSearch::new(&self.codec, request, source, self.config.max_attempts)?;
        let mnemonic = search.run()?;
        info!(fixed = request.words().len(), "generated custom mnemonic");
        Ok((mnemonic, now()))
    }

    /// Seed and master key of `mnemonic` created at `created`.
    pub fn derive(&self, mnemonic: &Mnemonic, created: NaiveDateTime) -> (Seed, MasterKey) {
        keys::derive(mnemonic, created)
    }

    pub fn to_wif(&self, private_key: &[u8; 32], compressed: bool, testnet: bool) -> String {
        wif::encode_wif(private_key, compressed, testnet)
    }

    pub fn verify(&self, mnemonic: &Mnemonic) -> bool {
        self.codec.verify(mnemonic)
    }

    /// Derive a [`KeyReport`] using the configured WIF options.
    pub fn report(&self, mnemonic: &Mnemonic, created: NaiveDateTime) -> KeyReport {
        KeyReport::new(mnemonic, created, self.config.compressed, self.config.network)
    }
}

/// Local wall-clock time truncated to whole seconds.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
