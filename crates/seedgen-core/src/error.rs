//! Error types for seedgen.
//!
//! Only [`ValidationError`], [`SeedgenError::Exhausted`] and input errors
//! from parsing cross the public API. [`SourceError`] is internal: entropy
//! lanes and collector workers recover from it by substituting random bytes.

use thiserror::Error;

/// A malformed custom-mnemonic request. Detected before any attempt runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("position {position} out of range 1..={max}")] PositionOutOfRange { position: usize, max: usize },
    #[error("{words} custom words but {positions} positions")] CountMismatch { words: usize, positions: usize },
    #[error("duplicate position {0}")] DuplicatePosition(usize),
    #[error("word not in dictionary: {0}")] UnknownWord(String),
}

/// Errors from decoding or constructing mnemonics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("invalid word count: {0} (expected 12 or 24)")] InvalidWordCount(usize),
    #[error("invalid entropy length: {0} bytes (expected 16 or 32)")] InvalidEntropyLength(usize),
    #[error("word not in dictionary: {0}")] UnknownWord(String),
    #[error("checksum mismatch")] ChecksumMismatch,
}

/// Errors from loading an injected word-list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordListError {
    #[error("expected {expected} words, got {got}")] WrongLength { expected: usize, got: usize },
    #[error("duplicate word: {0}")] DuplicateWord(String),
    #[error("invalid word on line {line}: {word:?}")] InvalidWord { line: usize, word: String },
    #[error("I/O error: {0}")] Io(String),
}

/// Errors from decoding a WIF string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WifError {
    #[error("invalid base58: {0}")] InvalidBase58(String),
    #[error("invalid payload length: {0}")] InvalidLength(usize),
    #[error("invalid checksum")] InvalidChecksum,
    #[error("unknown version byte: {0:#04x}")] UnknownVersion(u8),
    #[error("invalid compression flag: {0:#04x}")] InvalidCompressionFlag(u8),
    #[error("invalid private key length: {0}")] InvalidKeyLength(usize),
}

/// Failure of a single entropy lane or collector worker.
///
/// Never returned from the public API; callers substitute random bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("source unavailable: {0}")] Unavailable(&'static str),
    #[error("I/O failure: {0}")] Io(String),
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e.to_string())
    }
}

/// Errors returned by seedgen operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedgenError {
    /// The custom-mnemonic request was rejected before searching.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The custom search ran out of attempts.
    #[error("no valid mnemonic found after {attempts} attempts")]
    Exhausted {
        /// Number of independent draws performed.
        attempts: u32,
    },

    /// Mnemonic construction or decoding failed.
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    /// The injected word-list is malformed.
    #[error(transparent)]
    WordList(#[from] WordListError),

    /// A WIF string could not be decoded.
    #[error(transparent)]
    Wif(#[from] WifError),
}
