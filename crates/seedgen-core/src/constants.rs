//! Fixed parameters. Anything that affects derived output is part of the
//! external contract and must not change between releases.

use std::time::Duration;

/// Number of words in a valid dictionary.
pub const WORDLIST_LEN: usize = 2048;

/// Bits encoded by a single mnemonic word.
pub const BITS_PER_WORD: usize = 11;

/// Entropy length for the 12-word profile.
pub const ENTROPY_LEN_12: usize = 16;

/// Entropy length for the 24-word profile.
pub const ENTROPY_LEN_24: usize = 32;

// -----------------------------------------------------------------------------
// Key derivation
// -----------------------------------------------------------------------------

/// Prefix of the PBKDF2 salt. The creation timestamp follows it.
pub const SALT_PREFIX: &str = "mnemonic";

/// `chrono` format of the creation timestamp inside the salt (whole seconds).
pub const SALT_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Human-readable creation time format, as printed and accepted by tools.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// PBKDF2-HMAC-SHA512 iteration count.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Seed length in bytes.
pub const SEED_LEN: usize = 64;

/// HMAC-SHA512 key for master key derivation.
pub const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

// -----------------------------------------------------------------------------
// WIF
// -----------------------------------------------------------------------------

/// Version byte prepended to mainnet private keys.
pub const WIF_MAINNET_VERSION: u8 = 0x80;

/// Version byte prepended to testnet private keys.
pub const WIF_TESTNET_VERSION: u8 = 0xEF;

/// Suffix marking a private key for compressed public key use.
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// Length of the double-SHA-256 checksum appended to a WIF payload.
pub const WIF_CHECKSUM_LEN: usize = 4;

// -----------------------------------------------------------------------------
// Custom search
// -----------------------------------------------------------------------------

/// Default attempt bound for the custom mnemonic search.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Word count used by the custom mnemonic search.
pub const CUSTOM_SEARCH_WORDS: usize = 12;

// -----------------------------------------------------------------------------
// Entropy collection
// -----------------------------------------------------------------------------

/// Wall-clock budget for one `collect` call.
pub const COLLECT_BUDGET: Duration = Duration::from_millis(500);

/// The collector stops draining after this many samples.
pub const MAX_SAMPLES: usize = 50;

/// Upper bound on concurrently running collector workers.
pub const MAX_WORKERS: usize = 8;

/// Minimum automatic worker count, enough for one worker of each kind.
pub const MIN_WORKERS: usize = 3;

/// Shared deadline for joining all workers after the stop flag is raised.
pub const JOIN_GRACE: Duration = Duration::from_millis(20);

/// CPU workers emit a sample every this many hash iterations.
pub const CPU_SAMPLE_INTERVAL: u64 = 1_000;

/// Hard iteration cap for a CPU worker.
pub const CPU_MAX_ITERATIONS: u64 = 200_000;

/// Size of the memory worker's scratch buffer.
pub const MEMORY_BUFFER_LEN: usize = 1 << 20;

/// Memory workers emit a sample every this many accesses.
pub const MEMORY_SAMPLE_INTERVAL: u64 = 10_000;

/// Hard access cap for a memory worker.
pub const MEMORY_MAX_ACCESSES: u64 = 1_000_000;

/// Size of the block the IO worker writes and reads back.
pub const IO_BLOCK_LEN: usize = 4096;

/// Random bytes carried by an `io_error` fallback sample.
pub const IO_FALLBACK_LEN: usize = 32;

// -----------------------------------------------------------------------------
// Deterministic lanes
// -----------------------------------------------------------------------------

/// Width of the fixed lanes (hash lanes keep this many digest bytes).
pub const LANE_WIDTH: usize = 8;

/// Number of random decimal digits hashed by the digit-batch lane.
pub const DIGIT_BATCH_LEN: usize = 10_000;

/// Number of randomized sleeps in the delay-trace lane.
pub const DELAY_ROUNDS: usize = 8;

/// Upper bound for one randomized sleep, in microseconds.
pub const DELAY_MAX_MICROS: u64 = 500;
