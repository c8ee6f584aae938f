//! Cross-referencing counted lemmas against vocabulary lists.

use crate::input::{self, InputError};
use crate::normalizer::FrequencyMap;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// A named set of lowercase words, one per line in its source file.
#[derive(Debug, Clone)]
pub struct VocabularySet {
    name: String,
    words: HashSet<String>,
}

impl VocabularySet {
    pub fn parse(name: impl Into<String>, content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self {
            name: name.into(),
            words,
        }
    }

    /// Load a vocabulary file, naming the set after the file name up to its first dot.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = input::read_utf8(path)?;
        let set = Self::parse(vocabulary_name(path), &content);
        log::debug!("Loaded vocabulary '{}' with {} words", set.name, set.len());
        Ok(set)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Counted lemmas that appear in this vocabulary, most frequent first.
    pub fn match_counts(&self, frequencies: &FrequencyMap) -> MatchTable {
        let rows = frequencies
            .sorted()
            .into_iter()
            .filter(|(word, _)| self.contains(word))
            .map(|(word, count)| MatchRow {
                word: word.to_string(),
                count,
            })
            .collect();
        MatchTable {
            vocabulary: self.name.clone(),
            rows,
            selected: false,
        }
    }
}

fn vocabulary_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRow {
    pub word: String,
    pub count: usize,
}

/// Matched (word, count) rows for one vocabulary, sorted by count descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchTable {
    pub vocabulary: String,
    pub rows: Vec<MatchRow>,
    /// True once a subset of the rows was picked for export.
    #[serde(skip)]
    pub selected: bool,
}

impl MatchTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Keep only the given words, preserving table order.
    pub fn select<S: AsRef<str>>(&self, words: &[S]) -> MatchTable {
        let wanted: HashSet<String> = words.iter().map(|w| w.as_ref().trim().to_lowercase()).collect();
        MatchTable {
            vocabulary: self.vocabulary.clone(),
            rows: self.rows.iter().filter(|r| wanted.contains(&r.word)).cloned().collect(),
            selected: true,
        }
    }

    /// Keep the `n` most frequent rows.
    pub fn top(&self, n: usize) -> MatchTable {
        MatchTable {
            vocabulary: self.vocabulary.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
            selected: true,
        }
    }

    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }
}
