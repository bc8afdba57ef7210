//! Shared test helpers for integration and property tests.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use seedgen_core::{Entropy, EntropySource, MnemonicCodec, WordCount, WordList};

/// Codec over the built-in English word-list.
pub fn english_codec() -> MnemonicCodec {
    MnemonicCodec::new(Arc::new(WordList::english()))
}

/// A fixed creation time.
pub fn fixed_time(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .unwrap_or_default()
}

/// Draws the same byte for every position, counting draws.
#[derive(Debug, Default)]
pub struct ConstantSource {
    pub byte: u8,
    pub draws: u32,
}

impl ConstantSource {
    pub fn new(byte: u8) -> Self {
        Self { byte, draws: 0 }
    }
}

impl EntropySource for ConstantSource {
    fn draw(&mut self, word_count: WordCount) -> Entropy {
        self.draws += 1;
        entropy_of(self.byte, word_count)
    }
}

/// Replays scripted fill bytes in order, then repeats the last one.
#[derive(Debug)]
pub struct ScriptedSource {
    script: VecDeque<u8>,
    last: u8,
    pub draws: u32,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = u8>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: 0,
            draws: 0,
        }
    }
}

impl EntropySource for ScriptedSource {
    fn draw(&mut self, word_count: WordCount) -> Entropy {
        self.draws += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        entropy_of(self.last, word_count)
    }
}

fn entropy_of(byte: u8, word_count: WordCount) -> Entropy {
    let bytes = vec![byte; word_count.entropy_len()];
    match Entropy::from_slice(&bytes) {
        Ok(entropy) => entropy,
        Err(e) => panic!("entropy length is fixed by word count: {e}"),
    }
}
