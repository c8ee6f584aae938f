//! Word candidate extraction.
//!
//! A word candidate is a maximal run of ASCII letters. Everything else
//! (digits, punctuation, whitespace, non-ASCII letters) separates words and is
//! dropped, so "don't" yields "don" and "t".

use std::iter::FusedIterator;

/// Lazy iterator over the word candidates of a text, in document order.
///
/// A clone continues from the current position; call [`words`] again to start over.
#[derive(Debug, Clone)]
pub struct WordCandidates<'a> {
    text: &'a str,
    pos: usize,
}

/// Iterate the word candidates of `text`. Case is preserved.
pub fn words(text: &str) -> WordCandidates<'_> {
    WordCandidates { text, pos: 0 }
}

/// Count word candidates without collecting them.
pub fn count_words(text: &str) -> usize {
    words(text).count()
}

impl<'a> Iterator for WordCandidates<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();

        // ASCII letters are single bytes, so byte offsets are char boundaries
        while self.pos < bytes.len() && !bytes[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        Some(&self.text[start..self.pos])
    }
}

impl FusedIterator for WordCandidates<'_> {}
