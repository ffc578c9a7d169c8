//! Word sources for hangman

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// A word and the hint shown alongside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(default)]
    pub hint: String,
}

impl WordEntry {
    pub fn new(word: &str, hint: &str) -> Self {
        Self {
            word: word.to_string(),
            hint: hint.to_string(),
        }
    }
}

/// Supplies the next word to guess. Always yields a word.
pub trait WordSource {
    fn next_word(&mut self, rng: &mut Pcg32) -> WordEntry;
}

const FALLBACK_WORDS: &[(&str, &str)] = &[
    ("rust", "Reddish coating on old iron"),
    ("planet", "Orbits a star"),
    ("guitar", "Six strings and a sound hole"),
    ("harbor", "Where ships shelter"),
    ("violet", "A flower and a colour"),
    ("compass", "Always points north"),
    ("lantern", "Portable light"),
    ("glacier", "Slow river of ice"),
    ("pepper", "Salt's partner"),
    ("falcon", "Fast bird of prey"),
    ("puzzle", "Pieces that fit together"),
    ("meadow", "Grassy field"),
];

/// Shuffled deck of words, reshuffled when exhausted
#[derive(Debug, Clone, PartialEq)]
pub struct WordList {
    entries: Vec<WordEntry>,
    order: Vec<usize>,
    cursor: usize,
}

impl WordList {
    /// Build from entries, keeping only purely alphabetic words (lowercased).
    /// An empty result falls back to the built-in list.
    pub fn new(entries: Vec<WordEntry>) -> Self {
        let entries: Vec<WordEntry> = entries
            .into_iter()
            .filter(|e| !e.word.is_empty() && e.word.chars().all(|c| c.is_ascii_alphabetic()))
            .map(|e| WordEntry {
                word: e.word.to_ascii_lowercase(),
                hint: e.hint,
            })
            .collect();
        if entries.is_empty() {
            log::warn!("Word list is empty, using built-in words");
            return Self::fallback();
        }
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<WordEntry>) -> Self {
        let len = entries.len();
        Self {
            entries,
            order: (0..len).collect(),
            // Exhausted, so the first draw shuffles
            cursor: len,
        }
    }

    /// Built-in word list
    pub fn fallback() -> Self {
        Self::from_entries(
            FALLBACK_WORDS
                .iter()
                .map(|(word, hint)| WordEntry::new(word, hint))
                .collect(),
        )
    }

    /// Parse a JSON array of `{ "word": ..., "hint": ... }` objects
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: Vec<WordEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Parse shell-supplied words, logging and falling back on errors
    pub fn load(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(list)) => list,
            Some(Err(e)) => {
                log::warn!("Ignoring malformed word list: {}", e);
                Self::fallback()
            }
            None => Self::fallback(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::fallback()
    }
}

impl WordSource for WordList {
    fn next_word(&mut self, rng: &mut Pcg32) -> WordEntry {
        if self.cursor >= self.order.len() {
            self.order.shuffle(rng);
            self.cursor = 0;
        }
        let index = self.order[self.cursor];
        self.cursor += 1;
        self.entries[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_deals_every_word_before_repeating() {
        let mut list = WordList::fallback();
        let mut rng = Pcg32::seed_from_u64(3);
        let first: HashSet<String> = (0..list.len())
            .map(|_| list.next_word(&mut rng).word)
            .collect();
        assert_eq!(first.len(), list.len());

        // Reshuffled, still drawn from the same set
        let next = list.next_word(&mut rng);
        assert!(first.contains(&next.word));
    }

    #[test]
    fn test_empty_list_falls_back() {
        let list = WordList::new(Vec::new());
        assert_eq!(list, WordList::fallback());
        assert!(!list.is_empty());
    }

    #[test]
    fn test_from_json_filters_and_lowercases() {
        let list = WordList::from_json(
            r#"[
                { "word": "Crab", "hint": "Walks sideways" },
                { "word": "two words", "hint": "skipped" },
                { "word": "otter" }
            ]"#,
        )
        .expect("valid word list");
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries()[0], WordEntry::new("crab", "Walks sideways"));
        assert_eq!(list.entries()[1].hint, "");
    }

    #[test]
    fn test_load_malformed() {
        assert!(WordList::from_json("not json").is_err());
        assert_eq!(WordList::load(Some("not json")), WordList::fallback());
    }
}
