//! Entropy ⇄ mnemonic codec.
//!
//! A mnemonic is `entropy || checksum` split into 11-bit groups, each group
//! indexing the word-list. The checksum is the leading `entropy_bits / 32`
//! bits of SHA-256(entropy): 4 bits for 12 words, 8 bits for 24 words.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{BITS_PER_WORD, ENTROPY_LEN_12, ENTROPY_LEN_24};
use crate::error::MnemonicError;
use crate::wordlist::WordList;

/// Supported mnemonic lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WordCount {
    /// 128 bits of entropy, 4 checksum bits.
    #[default]
    Twelve,
    /// 256 bits of entropy, 8 checksum bits.
    TwentyFour,
}

impl WordCount {
    /// Number of words in the mnemonic.
    pub fn words(self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::TwentyFour => 24,
        }
    }

    /// Entropy length in bytes.
    pub fn entropy_len(self) -> usize {
        match self {
            WordCount::Twelve => ENTROPY_LEN_12,
            WordCount::TwentyFour => ENTROPY_LEN_24,
        }
    }

    /// Number of checksum bits appended to the entropy.
    pub fn checksum_bits(self) -> usize {
        self.entropy_len() * 8 / 32
    }

    /// Profile for an entropy length of 16 or 32 bytes.
    pub fn from_entropy_len(len: usize) -> Result<Self, MnemonicError> {
        match len {
            ENTROPY_LEN_12 => Ok(WordCount::Twelve),
            ENTROPY_LEN_24 => Ok(WordCount::TwentyFour),
            other => Err(MnemonicError::InvalidEntropyLength(other)),
        }
    }
}

impl TryFrom<usize> for WordCount {
    type Error = MnemonicError;

    fn try_from(words: usize) -> Result<Self, Self::Error> {
        match words {
            12 => Ok(WordCount::Twelve),
            24 => Ok(WordCount::TwentyFour),
            other => Err(MnemonicError::InvalidWordCount(other)),
        }
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words())
    }
}

/// 16 or 32 bytes of mnemonic entropy. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Entropy {
    bytes: Vec<u8>,
}

impl Entropy {
    /// Wrap raw entropy, rejecting lengths other than 16 or 32.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, MnemonicError> {
        WordCount::from_entropy_len(bytes.len())?;
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Wrap mixer output, whose length comes from a [`WordCount`].
    pub(crate) fn from_mixed(bytes: Vec<u8>) -> Self {
        debug_assert!(WordCount::from_entropy_len(bytes.len()).is_ok());
        Self { bytes }
    }

    /// Raw entropy bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The word count this entropy encodes to.
    pub fn word_count(&self) -> WordCount {
        match self.bytes.len() {
            ENTROPY_LEN_24 => WordCount::TwentyFour,
            _ => WordCount::Twelve,
        }
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entropy")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// An ordered sequence of 12 or 24 lowercase words.
///
/// Holding a `Mnemonic` does not imply its checksum is valid; use
/// [`MnemonicCodec::verify`].
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic {
    words: Vec<String>,
}

impl Mnemonic {
    /// Parse a phrase, normalizing whitespace and case.
    ///
    /// Only the word count is checked here.
    pub fn parse(phrase: &str) -> Result<Self, MnemonicError> {
        let words: Vec<String> = phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        Self::from_words(words)
    }

    /// Build a mnemonic from individual words.
    pub fn from_words(words: Vec<String>) -> Result<Self, MnemonicError> {
        WordCount::try_from(words.len())?;
        Ok(Self { words })
    }

    /// The words in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The word at 1-based `position`.
    pub fn word_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.words.get(i))
            .map(String::as_str)
    }

    /// Number of words.
    pub fn word_count(&self) -> WordCount {
        match self.words.len() {
            24 => WordCount::TwentyFour,
            _ => WordCount::Twelve,
        }
    }

    /// Overwrite the word at 1-based `position`. Out-of-range positions are
    /// ignored; callers validate positions first.
    pub(crate) fn replace(&mut self, position: usize, word: &str) {
        if let Some(slot) = position.checked_sub(1).and_then(|i| self.words.get_mut(i)) {
            slot.clear();
            slot.push_str(word);
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.words.len())
            .finish_non_exhaustive()
    }
}

/// Bidirectional mapping between entropy and mnemonics over one word-list.
#[derive(Clone, Debug)]
pub struct MnemonicCodec {
    wordlist: Arc<WordList>,
}

impl MnemonicCodec {
    pub fn new(wordlist: Arc<WordList>) -> Self {
        Self { wordlist }
    }

    /// The dictionary this codec encodes against.
    pub fn wordlist(&self) -> &WordList {
        &self.wordlist
    }

    /// Encode entropy and its checksum as words.
    pub fn encode(&self, entropy: &Entropy) -> Mnemonic {
        let count = entropy.word_count();
        let mut combined = Vec::with_capacity(entropy.as_bytes().len() + 32);
        combined.extend_from_slice(entropy.as_bytes());
        combined.extend_from_slice(&checksum_digest(entropy.as_bytes()));

        let words = (0..count.words())
            .map(|i| {
                let index = read_bits(&combined, i * BITS_PER_WORD, BITS_PER_WORD);
                self.wordlist.word(index).to_string()
            })
            .collect();
        Mnemonic { words }
    }

    /// Recover the entropy of a mnemonic, checking every word and the checksum.
    pub fn decode(&self, mnemonic: &Mnemonic) -> Result<Entropy, MnemonicError> {
        self.decode_words(mnemonic.words())
    }

    /// [`decode`](Self::decode) for an unchecked word sequence.
    pub fn decode_words<S: AsRef<str>>(&self, words: &[S]) -> Result<Entropy, MnemonicError> {
        let count = WordCount::try_from(words.len())?;
        let total_bits = count.words() * BITS_PER_WORD;
        let mut bits = vec![0u8; total_bits.div_ceil(8)];

        for (i, word) in words.iter().enumerate() {
            let word = word.as_ref();
            let index = self
                .wordlist
                .index_of(word)
                .ok_or_else(|| MnemonicError::UnknownWord(word.to_string()))?;
            write_bits(&mut bits, i * BITS_PER_WORD, BITS_PER_WORD, index);
        }

        let entropy_len = count.entropy_len();
        let checksum_len = count.checksum_bits();
        let actual = read_bits(&bits, entropy_len * 8, checksum_len);
        let expected = read_bits(&checksum_digest(&bits[..entropy_len]), 0, checksum_len);

        let entropy = Entropy {
            bytes: bits[..entropy_len].to_vec(),
        };
        bits.zeroize();

        if actual != expected {
            return Err(MnemonicError::ChecksumMismatch);
        }
        Ok(entropy)
    }

    /// Whether `mnemonic` has a valid word count, known words and checksum.
    pub fn verify(&self, mnemonic: &Mnemonic) -> bool {
        self.decode(mnemonic).is_ok()
    }

    /// [`verify`](Self::verify) for an unchecked word sequence.
    pub fn verify_words<S: AsRef<str>>(&self, words: &[S]) -> bool {
        self.decode_words(words).is_ok()
    }

    /// Hash arbitrary caller bytes down to the entropy size, then encode.
    pub fn generate_from_entropy(&self, bytes: &[u8], word_count: WordCount) -> Mnemonic {
        let digest = Sha256::digest(bytes);
        let entropy = Entropy {
            bytes: digest[..word_count.entropy_len()].to_vec(),
        };
        self.encode(&entropy)
    }
}

fn checksum_digest(entropy: &[u8]) -> [u8; 32] {
    Sha256::digest(entropy).into()
}

/// Read `len` (<= 16) bits starting at bit `start`, most significant first.
fn read_bits(bytes: &[u8], start: usize, len: usize) -> u16 {
    (start..start + len).fold(0u16, |acc, pos| {
        let bit = (bytes[pos / 8] >> (7 - pos % 8)) & 1;
        (acc << 1) | u16::from(bit)
    })
}

/// Write the low `len` bits of `value` starting at bit `start`.
fn write_bits(bytes: &mut [u8], start: usize, len: usize, value: u16) {
    for j in 0..len {
        let pos = start + j;
        if (value >> (len - 1 - j)) & 1 == 1 {
            bytes[pos / 8] |= 1 << (7 - pos % 8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_12: &str = "abandon abandon abandon abandon abandon abandon \
                           abandon abandon abandon abandon abandon about";

    fn codec() -> MnemonicCodec {
        MnemonicCodec::new(Arc::new(WordList::english()))
    }

    fn encode_hex(hex_entropy: &str) -> String {
        let bytes = hex::decode(hex_entropy).unwrap();
        codec().encode(&Entropy::from_slice(&bytes).unwrap()).to_string()
    }

    #[test]
    fn zero_entropy_golden_12() {
        let phrase = encode_hex("00000000000000000000000000000000");
        assert_eq!(phrase, ZERO_12.split_whitespace().collect::<Vec<_>>().join(" "));
        assert!(codec().verify(&Mnemonic::parse(&phrase).unwrap()));
    }

    #[test]
    fn zero_entropy_golden_24() {
        let phrase = encode_hex(&"00".repeat(32));
        let words: Vec<&str> = phrase.split(' ').collect();
        assert_eq!(words.len(), 24);
        assert!(words[..23].iter().all(|w| *w == "abandon"));
        assert_eq!(words[23], "art");
    }

    #[test]
    fn known_vectors() {
        assert_eq!(
            encode_hex("7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f"),
            "legal winner thank year wave sausage worth useful legal winner thank yellow"
        );
        assert_eq!(
            encode_hex("ffffffffffffffffffffffffffffffff"),
            "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong"
        );
    }

    #[test]
    fn matches_bip39_crate() {
        let bytes: Vec<u8> = (0u8..32).map(|i| i.wrapping_mul(37).wrapping_add(11)).collect();
        for len in [16usize, 32] {
            let ours = codec().encode(&Entropy::from_slice(&bytes[..len]).unwrap());
            let theirs = bip39::Mnemonic::from_entropy_in(bip39::Language::English, &bytes[..len])
                .unwrap();
            assert_eq!(ours.to_string(), theirs.to_string());
        }
    }

    #[test]
    fn decode_recovers_entropy() {
        let bytes = [0x5Au8; 32];
        let entropy = Entropy::from_slice(&bytes).unwrap();
        let mnemonic = codec().encode(&entropy);
        let decoded = codec().decode(&mnemonic).unwrap();
        assert_eq!(decoded.as_bytes(), &bytes);
    }

    #[test]
    fn bad_checksum_fails_verify() {
        let phrase = vec!["abandon"; 12].join(" ");
        let mnemonic = Mnemonic::parse(&phrase).unwrap();
        assert!(!codec().verify(&mnemonic));
        assert_eq!(codec().decode(&mnemonic).unwrap_err(), MnemonicError::ChecksumMismatch);
    }

    #[test]
    fn unknown_word_fails_without_error() {
        let mut words: Vec<&str> = ZERO_12.split_whitespace().collect();
        words[4] = "notaword";
        assert!(!codec().verify_words(&words));
        assert_eq!(
            codec().decode_words(&words).unwrap_err(),
            MnemonicError::UnknownWord("notaword".into())
        );
    }

    #[test]
    fn wrong_word_count_fails_verify() {
        let words = vec!["abandon"; 13];
        assert!(!codec().verify_words(&words));
        assert!(!codec().verify_words::<&str>(&[]));
    }

    #[test]
    fn checksum_bit_flip_fails_verify() {
        let codec = codec();
        for len in [16usize, 32] {
            let entropy = Entropy::from_slice(&vec![0xC3; len]).unwrap();
            let mnemonic = codec.encode(&entropy);
            let cs_bits = entropy.word_count().checksum_bits();
            let last = mnemonic.words().last().unwrap().clone();
            let last_index = codec.wordlist().index_of(&last).unwrap();
            for bit in 0..cs_bits {
                let flipped = codec.wordlist().word(last_index ^ (1 << bit)).to_string();
                let mut words = mnemonic.words().to_vec();
                *words.last_mut().unwrap() = flipped;
                assert!(!codec.verify_words(&words), "bit {bit} of {len}-byte checksum");
            }
        }
    }

    #[test]
    fn generate_from_entropy_hashes_input() {
        let codec = codec();
        let a = codec.generate_from_entropy(b"caller bytes", WordCount::Twelve);
        let b = codec.generate_from_entropy(b"caller bytes", WordCount::Twelve);
        let c = codec.generate_from_entropy(b"caller bytes", WordCount::TwentyFour);
        assert_eq!(a, b);
        assert_eq!(a.words().len(), 12);
        assert_eq!(c.words().len(), 24);
        assert!(codec.verify(&a) && codec.verify(&c));

        let digest = Sha256::digest(b"caller bytes");
        let expected = codec.encode(&Entropy::from_slice(&digest[..16]).unwrap());
        assert_eq!(a, expected);
    }

    #[test]
    fn parse_normalizes_whitespace_and_case() {
        let messy = ZERO_12.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" \t ");
        let mnemonic = Mnemonic::parse(&messy).unwrap();
        assert!(codec().verify(&mnemonic));
        assert_eq!(mnemonic.word_at(12), Some("about"));
        assert_eq!(mnemonic.word_at(0), None);
    }

    #[test]
    fn parse_rejects_bad_count() {
        assert_eq!(
            Mnemonic::parse("abandon abandon").unwrap_err(),
            MnemonicError::InvalidWordCount(2)
        );
    }

    #[test]
    fn entropy_rejects_bad_length() {
        assert_eq!(
            Entropy::from_slice(&[0u8; 20]).unwrap_err(),
            MnemonicError::InvalidEntropyLength(20)
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let entropy = Entropy::from_slice(&[0xAB; 16]).unwrap();
        assert!(format!("{entropy:?}").contains("REDACTED"));
        let mnemonic = codec().encode(&entropy);
        assert!(!format!("{mnemonic:?}").contains(mnemonic.words()[0].as_str()));
    }

    #[test]
    fn word_count_profiles() {
        assert_eq!(WordCount::Twelve.checksum_bits(), 4);
        assert_eq!(WordCount::TwentyFour.checksum_bits(), 8);
        assert_eq!(WordCount::try_from(24).unwrap(), WordCount::TwentyFour);
        assert!(WordCount::try_from(18).is_err());
    }
}
