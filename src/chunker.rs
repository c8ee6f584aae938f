//! Positional chunking of word candidates.
//!
//! Chunks are cut every `chunk_words` words regardless of sentence
//! boundaries, so POS context can be lost at the edges of a chunk.

/// Default number of words per chunk.
pub const DEFAULT_CHUNK_WORDS: usize = 50_000;

/// Lazy iterator producing space-joined chunks of at most `chunk_words` words.
#[derive(Debug, Clone)]
pub struct Chunks<I> {
    words: I,
    chunk_words: usize,
}

/// Group `words` into chunks of `chunk_words` words (the last one may be shorter).
///
/// A `chunk_words` of zero is treated as one.
pub fn chunks<'a, I>(words: I, chunk_words: usize) -> Chunks<I::IntoIter>
where
    I: IntoIterator<Item = &'a str>,
{
    Chunks {
        words: words.into_iter(),
        chunk_words: chunk_words.max(1),
    }
}

impl<'a, I> Iterator for Chunks<I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let first = self.words.next()?;
        let mut blob = String::from(first);
        for word in self.words.by_ref().take(self.chunk_words - 1) {
            blob.push(' ');
            blob.push_str(word);
        }
        Some(blob)
    }
}

/// Number of chunks `word_count` words produce: `ceil(word_count / chunk_words)`.
pub fn total_chunks(word_count: usize, chunk_words: usize) -> usize {
    word_count.div_ceil(chunk_words.max(1))
}
