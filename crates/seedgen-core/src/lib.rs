//! # seedgen-core
//! Mnemonic generation from mixed entropy.
//!
//! Collects entropy from many independent lanes (including a set of
//! concurrent worker threads), folds it into 128 or 256 bits, encodes it as a
//! BIP-39 style mnemonic, and derives a seed, master key and WIF string.
//!
//! # Modules
//!
//! - [`constants`]: Fixed sizes, salts, version bytes and collector defaults
//! - [`error`]: `SeedgenError` and the per-concern error enums
//! - [`wordlist`]: Injected 2048-word dictionary
//! - [`entropy`]: Lanes, concurrent collector and XOR/SHA-256 mixer
//! - [`mnemonic`]: Entropy ⇄ mnemonic codec with checksum verification
//! - [`keys`]: PBKDF2 seed and HMAC-SHA512 master key derivation
//! - [`wif`]: Base58Check Wallet-Import-Format encoding
//! - [`search`]: Bounded search for mnemonics containing chosen words
//! - [`config`]: `GeneratorConfig` defaults and presets
//! - [`generator`]: High-level `Generator` facade

pub mod config;
pub mod constants;
pub mod entropy;
pub mod error;
pub mod generator;
pub mod keys;
pub mod mnemonic;
pub mod search;
pub mod wif;
pub mod wordlist;

// Re-exports for convenient access
pub use config::GeneratorConfig;
pub use entropy::{CollectorConfig, EntropyCollector, EntropyProfile, EntropySource, SystemEntropy};
pub use error::{MnemonicError, SeedgenError, ValidationError, WifError, WordListError};
pub use generator::{Generator, KeyReport};
pub use keys::{MasterKey, Seed};
pub use mnemonic::{Entropy, Mnemonic, MnemonicCodec, WordCount};
pub use search::{CustomRequest, CustomSearch};
pub use wif::{DecodedWif, Network};
pub use wordlist::WordList;
