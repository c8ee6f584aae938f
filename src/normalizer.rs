use crate::annotator::{AnnotatedToken, Pos};
use serde::Serialize;
use std::collections::HashMap;

/// Lowercase a lemma and reduce `-ly` adverbs to their base.
///
/// The suffix is only stripped when the part that remains is longer than
/// two characters: "quickly" becomes "quick", "only" and "fly" stay as is.
pub fn normalize_lemma(lemma: &str, pos: Pos) -> String {
    let lower = lemma.to_lowercase();
    if pos.is_adverb() {
        if let Some(base) = lower.strip_suffix("ly") {
            if base.chars().count() > 2 {
                return base.to_string();
            }
        }
    }
    lower
}

/// Lemma -> occurrence count for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyMap {
    counts: HashMap<String, usize>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one annotated token. Non-alphabetic tokens are ignored.
    pub fn record(&mut self, token: &AnnotatedToken) {
        if !token.is_alpha {
            return;
        }
        let lemma = normalize_lemma(&token.lemma, token.pos);
        *self.counts.entry(lemma).or_insert(0) += 1;
    }

    pub fn record_all<'a, I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = &'a AnnotatedToken>,
    {
        for token in tokens {
            self.record(token);
        }
    }

    /// Add another partial map into this one.
    pub fn merge(&mut self, other: FrequencyMap) {
        for (lemma, count) in other.counts {
            *self.counts.entry(lemma).or_insert(0) += count;
        }
    }

    pub fn get(&self, lemma: &str) -> usize {
        self.counts.get(lemma).copied().unwrap_or(0)
    }

    /// Number of distinct lemmas.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(lemma, count)| (lemma.as_str(), *count))
    }

    /// Entries sorted by count descending, then lemma ascending.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<'a> FromIterator<&'a AnnotatedToken> for FrequencyMap {
    fn from_iter<T: IntoIterator<Item = &'a AnnotatedToken>>(iter: T) -> Self {
        let mut map = FrequencyMap::new();
        map.record_all(iter);
        map
    }
}
