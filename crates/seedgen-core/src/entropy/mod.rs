//! Entropy acquisition.
//!
//! [`SystemEntropy`] gathers a fixed set of lanes ([`sources`]), optionally
//! runs the concurrent [`collector`], and folds everything with the
//! [`mixer`]. Anything that needs fresh entropy takes an [`EntropySource`] so
//! tests can substitute deterministic draws.

pub mod collector;
pub mod mixer;
pub mod sample;
pub mod sources;

pub use collector::{CollectionReport, CollectorConfig, EntropyCollector, WorkerKind, WorkerPlan};
pub use mixer::{EntropyPool, mix_lanes};
pub use sample::{EntropySample, SampleSource};
pub use sources::Lane;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::constants::LANE_WIDTH;
use crate::mnemonic::{Entropy, WordCount};

/// A supplier of fresh mnemonic entropy.
pub trait EntropySource {
    /// Draw new entropy sized for `word_count`. Must not fail.
    fn draw(&mut self, word_count: WordCount) -> Entropy;
}

/// Which lanes [`SystemEntropy`] gathers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyProfile {
    /// Every lane, including the concurrent collector.
    #[default]
    Full,
    /// Every lane except the collector, which is replaced by an OS RNG draw.
    Quick,
}

/// The production entropy source: host lanes, collector, XOR/SHA-256 mix.
#[derive(Debug, Clone, Default)]
pub struct SystemEntropy {
    profile: EntropyProfile,
    collector: EntropyCollector,
}

impl SystemEntropy {
    pub fn new(profile: EntropyProfile, collector: CollectorConfig) -> Self {
        Self {
            profile,
            collector: EntropyCollector::new(collector),
        }
    }

    pub fn profile(&self) -> EntropyProfile {
        self.profile
    }

    /// Gather every lane for one generation call.
    pub fn gather(&self, word_count: WordCount) -> EntropyPool {
        let target = word_count.entropy_len();
        let mut pool = EntropyPool::new();

        pool.push(Lane::or_random("wall_clock", LANE_WIDTH, sources::wall_clock()));
        pool.push(Lane::new("perf_counter", sources::perf_counter()));
        pool.push(Lane::or_random("os_rng", target, sources::os_random(target)));
        pool.push(Lane::new("digit_batch", sources::digit_batch()));
        pool.push(Lane::or_random("process_cpu", LANE_WIDTH, sources::process_cpu_time()));
        pool.push(Lane::or_random("network", LANE_WIDTH, sources::network_identity()));
        pool.push(Lane::or_random("system", LANE_WIDTH, sources::system_info()));
        pool.push(Lane::or_random("process", LANE_WIDTH, sources::process_info()));
        pool.push(Lane::or_random("environment", LANE_WIDTH, sources::environment()));
        pool.push(Lane::new("delay_trace", sources::delay_trace()));
        match self.profile {
            EntropyProfile::Full => {
                pool.push(Lane::new("collector", self.collector.collect(target)));
            }
            EntropyProfile::Quick => {
                pool.push(Lane::or_random("collector", target, sources::os_random(target)));
            }
        }
        pool.push(Lane::or_random("filesystem", LANE_WIDTH, sources::filesystem_metadata()));

        let substituted = pool.substituted();
        if !substituted.is_empty() {
            debug!(?substituted, "entropy lanes replaced with random bytes");
        }
        pool
    }
}

impl EntropySource for SystemEntropy {
    fn draw(&mut self, word_count: WordCount) -> Entropy {
        self.gather(word_count).mix(word_count)
    }
}

/// Compress `input` to exactly `len` bytes with SHA-256.
///
/// The first block is `SHA-256(input)`; block `i > 0` is
/// `SHA-256(input || i as u32 BE)`.
pub fn compress(input: &[u8], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len.next_multiple_of(32));
    let mut counter = 0u32;
    while out.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(input);
        if counter > 0 {
            hasher.update(counter.to_be_bytes());
        }
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(len);
    out
}
