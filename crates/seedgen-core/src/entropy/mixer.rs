//! XOR-then-hash folding of entropy lanes.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::entropy::sources::Lane;
use crate::mnemonic::{Entropy, WordCount};

/// The lanes gathered for one generation call. Never persisted.
#[derive(Debug, Default)]
pub struct EntropyPool {
    lanes: Vec<Lane>,
}

impl EntropyPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, lane: Lane) {
        self.lanes.push(lane);
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Names of lanes whose reader failed and were filled with random bytes.
    pub fn substituted(&self) -> Vec<&'static str> {
        self.lanes
            .iter()
            .filter(|l| l.is_substituted())
            .map(Lane::name)
            .collect()
    }

    /// Fold every lane into entropy for `word_count`.
    pub fn mix(&self, word_count: WordCount) -> Entropy {
        Entropy::from_mixed(mix_lanes(&self.lanes, word_count.entropy_len()))
    }
}

/// Replicate each lane cyclically to `target` bytes, XOR them position-wise,
/// then SHA-256 the result and keep the first `target` bytes (`target <= 32`).
pub fn mix_lanes(lanes: &[Lane], target: usize) -> Vec<u8> {
    let mut acc = vec![0u8; target];
    for lane in lanes {
        let bytes = lane.bytes();
        if bytes.is_empty() {
            continue;
        }
        for (i, b) in acc.iter_mut().enumerate() {
            *b ^= bytes[i % bytes.len()];
        }
    }
    let digest = Sha256::digest(&acc);
    acc.zeroize();
    digest[..target].to_vec()
}
