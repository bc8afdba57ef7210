//! Bounded search for a mnemonic containing chosen words.
//!
//! Each attempt draws a fresh 12-word mnemonic, overwrites the requested
//! positions and keeps the result only if the checksum still verifies.
//! Attempts are independent, so a request that changes the entropy bits
//! succeeds with probability about 1/16 per attempt for 12 words.

use std::collections::HashSet;

use tracing::debug;

use crate::constants::CUSTOM_SEARCH_WORDS;
use crate::entropy::EntropySource;
use crate::error::{SeedgenError, ValidationError};
use crate::mnemonic::{Mnemonic, MnemonicCodec, WordCount};
use crate::wordlist::WordList;

/// Words to place at 1-based positions of a 12-word mnemonic.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CustomRequest {
    words: Vec<String>,
    positions: Vec<usize>,
}

impl CustomRequest {
    /// Pair `words[i]` with `positions[i]`. Words are lowercased.
    pub fn new<S: AsRef<str>>(words: &[S], positions: &[usize]) -> Self {
        Self {
            words: words.iter().map(|w| w.as_ref().trim().to_lowercase()).collect(),
            positions: positions.to_vec(),
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Reject malformed requests before any attempt is made.
    pub fn validate(&self, wordlist: &WordList) -> Result<(), ValidationError> {
        if self.words.len() != self.positions.len() {
            return Err(ValidationError::CountMismatch {
                words: self.words.len(),
                positions: self.positions.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.positions.len());
        for &position in &self.positions {
            if !(1..=CUSTOM_SEARCH_WORDS).contains(&position) {
                return Err(ValidationError::PositionOutOfRange {
                    position,
                    max: CUSTOM_SEARCH_WORDS,
                });
            }
            if !seen.insert(position) {
                return Err(ValidationError::DuplicatePosition(position));
            }
        }

        if let Some(word) = self.words.iter().find(|w| !wordlist.contains(w)) {
            return Err(ValidationError::UnknownWord(word.clone()));
        }
        Ok(())
    }

    fn apply(&self, mnemonic: &mut Mnemonic) {
        for (word, &position) in self.words.iter().zip(&self.positions) {
            mnemonic.replace(position, word);
        }
    }
}

/// The attempts of one custom search, in order.
///
/// Yields `Some(mnemonic)` for an attempt whose result verifies and `None`
/// for a rejected one. Ends after `max_attempts` items.
pub struct CustomSearch<'a, S: EntropySource + ?Sized> {
    codec: &'a MnemonicCodec,
    request: &'a CustomRequest,
    source: &'a mut S,
    attempts: u32,
    max_attempts: u32,
}

impl<'a, S: EntropySource + ?Sized> CustomSearch<'a, S> {
    /// Validate `request` and prepare a search of at most `max_attempts` draws.
    pub fn new(
        codec: &'a MnemonicCodec,
        request: &'a CustomRequest,
        source: &'a mut S,
        max_attempts: u32,
    ) -> Result<Self, ValidationError> {
        request.validate(codec.wordlist())?;
        Ok(Self {
            codec,
            request,
            source,
            attempts: 0,
            max_attempts,
        })
    }

    /// Draws performed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run until the first verifying mnemonic or until attempts run out.
    pub fn run(mut self) -> Result<Mnemonic, SeedgenError> {
        while let Some(outcome) = self.next() {
            if let Some(mnemonic) = outcome {
                debug!(attempt = self.attempts, "custom mnemonic found");
                return Ok(mnemonic);
            }
        }
        Err(SeedgenError::Exhausted {
            attempts: self.attempts,
        })
    }
}

impl<S: EntropySource + ?Sized> Iterator for CustomSearch<'_, S> {
    type Item = Option<Mnemonic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;

        let entropy = self.source.draw(WordCount::Twelve);
        let mut mnemonic = self.codec.encode(&entropy);
        self.request.apply(&mut mnemonic);
        Some(self.codec.verify(&mnemonic).then_some(mnemonic))
    }
}

/// Find a verifying 12-word mnemonic with `request`'s words in place.
pub fn search<S: EntropySource + ?Sized>(
    codec: &MnemonicCodec,
    request: &CustomRequest,
    source: &mut S,
    max_attempts: u32,
) -> Result<Mnemonic, SeedgenError> {
    CustomSearch::new(codec, request, source, max_attempts)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::Entropy;
    use std::sync::Arc;

    /// Always draws the same bytes and counts draws.
    struct FixedSource {
        byte: u8,
        draws: u32,
    }

    impl FixedSource {
        fn new(byte: u8) -> Self {
            Self { byte, draws: 0 }
        }
    }

    impl EntropySource for FixedSource {
        fn draw(&mut self, word_count: WordCount) -> Entropy {
            self.draws += 1;
            Entropy::from_slice(&vec![self.byte; word_count.entropy_len()]).unwrap()
        }
    }

    fn codec() -> MnemonicCodec {
        MnemonicCodec::new(Arc::new(WordList::english()))
    }

    #[test]
    fn rejects_position_out_of_range() {
        let codec = codec();
        for bad in [0, 13] {
            let request = CustomRequest::new(&["abandon"], &[bad]);
            let mut source = FixedSource::new(0);
            let err = search(&codec, &request, &mut source, 5).unwrap_err();
            assert_eq!(
                err,
                SeedgenError::Validation(ValidationError::PositionOutOfRange { position: bad, max: 12 })
            );
            assert_eq!(source.draws, 0);
        }
    }

    #[test]
    fn rejects_count_mismatch() {
        let request = CustomRequest::new(&["abandon", "zoo"], &[1]);
        assert_eq!(
            request.validate(&WordList::english()),
            Err(ValidationError::CountMismatch { words: 2, positions: 1 })
        );
    }

    #[test]
    fn rejects_duplicate_position() {
        let request = CustomRequest::new(&["abandon", "zoo"], &[4, 4]);
        assert_eq!(
            request.validate(&WordList::english()),
            Err(ValidationError::DuplicatePosition(4))
        );
    }

    #[test]
    fn rejects_unknown_word() {
        let request = CustomRequest::new(&["notaword"], &[2]);
        assert_eq!(
            request.validate(&WordList::english()),
            Err(ValidationError::UnknownWord("notaword".into()))
        );
    }

    #[test]
    fn words_are_normalized() {
        let request = CustomRequest::new(&[" Zoo "], &[3]);
        assert_eq!(request.words().to_vec(), vec!["zoo".to_string()]);
        assert!(request.validate(&WordList::english()).is_ok());
    }

    #[test]
    fn exhausts_after_exactly_max_attempts() {
        // "abandon" in the checksum slot never verifies for all-zero entropy.
        let codec = codec();
        let request = CustomRequest::new(&["abandon"], &[12]);
        let mut source = FixedSource::new(0);
        let err = search(&codec, &request, &mut source, 5).unwrap_err();
        assert_eq!(err, SeedgenError::Exhausted { attempts: 5 });
        assert_eq!(source.draws, 5);
    }

    #[test]
    fn zero_attempts_exhausts_immediately() {
        let codec = codec();
        let request = CustomRequest::new(&["about"], &[12]);
        let mut source = FixedSource::new(0);
        let err = search(&codec, &request, &mut source, 0).unwrap_err();
        assert_eq!(err, SeedgenError::Exhausted { attempts: 0 });
        assert_eq!(source.draws, 0);
    }

    #[test]
    fn succeeds_on_first_verifying_attempt() {
        let codec = codec();
        let request = CustomRequest::new(&["about"], &[12]);
        let mut source = FixedSource::new(0);
        let mnemonic = search(&codec, &request, &mut source, 5).unwrap();
        assert_eq!(source.draws, 1);
        assert_eq!(mnemonic.word_at(12), Some("about"));
        assert!(codec.verify(&mnemonic));
    }

    #[test]
    fn unchanged_word_verifies_immediately() {
        // Word 1 of the all-zero mnemonic is already "abandon".
        let codec = codec();
        let request = CustomRequest::new(&["abandon"], &[1]);
        let mut source = FixedSource::new(0);
        let mnemonic = search(&codec, &request, &mut source, 3).unwrap();
        assert_eq!(mnemonic.word_at(1), Some("abandon"));
    }

    #[test]
    fn iterator_reports_each_attempt() {
        let codec = codec();
        let request = CustomRequest::new(&["abandon"], &[12]);
        let mut source = FixedSource::new(0);
        let search = CustomSearch::new(&codec, &request, &mut source, 4).unwrap();
        let outcomes: Vec<_> = search.collect();
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(Option::is_none));
    }

    #[test]
    fn live_source_finds_leading_abandon() {
        let codec = codec();
        let request = CustomRequest::new(&["abandon"], &[1]);
        let mut source = crate::entropy::SystemEntropy::new(
            crate::entropy::EntropyProfile::Quick,
            crate::entropy::CollectorConfig::default(),
        );
        match search(&codec, &request, &mut source, 1000) {
            Ok(m) => {
                assert_eq!(m.word_at(1), Some("abandon"));
                assert!(codec.verify(&m));
            }
            Err(e) => assert_eq!(e, SeedgenError::Exhausted { attempts: 1000 }),
        }
    }
}
