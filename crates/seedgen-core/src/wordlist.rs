//! The 2048-word mnemonic dictionary.
//!
//! The dictionary is injected at construction time and shared read-only
//! (usually behind an `Arc`). [`WordList::english`] provides the canonical
//! English list; [`WordList::parse`] accepts any newline-delimited list that
//! satisfies the same shape.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use bip39::Language;

use crate::constants::WORDLIST_LEN;
use crate::error::WordListError;

/// An ordered list of exactly 2048 unique lowercase words.
#[derive(Clone)]
pub struct WordList {
    words: Vec<String>,
    /// Reverse lookup: word -> index.
    index: HashMap<String, u16>,
}

impl WordList {
    /// The canonical BIP-39 English word-list.
    pub fn english() -> Self {
        let words = Language::English.word_list().iter().map(|w| w.to_string()).collect();
        Self::from_words_unchecked(words)
    }

    /// Parse a newline-delimited word-list. Line `n` (zero-based) is index `n`.
    ///
    /// Trailing blank lines are ignored; any other blank line, uppercase or
    /// whitespace-containing word, duplicate, or count other than 2048 is
    /// rejected.
    pub fn parse(text: &str) -> Result<Self, WordListError> {
        let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        if lines.len() != WORDLIST_LEN {
            return Err(WordListError::WrongLength {
                expected: WORDLIST_LEN,
                got: lines.len(),
            });
        }

        let mut words = Vec::with_capacity(WORDLIST_LEN);
        for (i, line) in lines.iter().enumerate() {
            let valid = !line.is_empty()
                && line.chars().all(|c| !c.is_whitespace() && !c.is_uppercase());
            if !valid {
                return Err(WordListError::InvalidWord {
                    line: i + 1,
                    word: line.to_string(),
                });
            }
            words.push(line.to_string());
        }

        let list = Self::from_words_unchecked(words);
        if list.index.len() != WORDLIST_LEN {
            let mut seen = std::collections::HashSet::new();
            let dup = list
                .words
                .iter()
                .find(|w| !seen.insert(w.as_str()))
                .cloned()
                .unwrap_or_default();
            return Err(WordListError::DuplicateWord(dup));
        }
        Ok(list)
    }

    /// Read and parse a word-list file.
    pub fn from_file(path: &Path) -> Result<Self, WordListError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| WordListError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&text)
    }

    fn from_words_unchecked(words: Vec<String>) -> Self {
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i as u16))
            .collect();
        Self { words, index }
    }

    /// The word at `index`. Panics if `index >= 2048`; codec indices are
    /// 11-bit values and always in range.
    pub fn word(&self, index: u16) -> &str {
        &self.words[usize::from(index)]
    }

    /// The dictionary index of `word`, if present.
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.index.get(word).copied()
    }

    /// Whether `word` is in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Number of words (always 2048).
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate the words in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordList")
            .field("len", &self.words.len())
            .field("first", &self.words.first())
            .finish()
    }
}
