//! Chunked annotation driver.
//!
//! Text flows tokenizer -> chunker -> annotator -> normalizer. Chunks are
//! produced lazily and handed to the annotator `batch_size` at a time, so at
//! most one batch of chunk text and its annotations is held in memory. The
//! frequency map is the only state that lives across batches.

use crate::annotator::{AnnotatedToken, AnnotationError, Annotator};
use crate::chunker::{chunks, total_chunks};
use crate::config::{ConfigError, PipelineConfig};
use crate::normalizer::FrequencyMap;
use crate::tokenizer::{count_words, words};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error("Annotation failed at chunk {chunk}: {source}")]
    Annotation {
        /// Index of the first chunk in the failed batch.
        chunk: usize,
        #[source]
        source: AnnotationError,
    },
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Progress after a chunk has been folded into the frequency map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub chunks_processed: usize,
    pub total_chunks: usize,
}

impl Progress {
    /// Fraction done, in `[0.0, 1.0]`.
    pub fn fraction(&self) -> f64 {
        if self.total_chunks == 0 {
            return 1.0;
        }
        (self.chunks_processed as f64 / self.total_chunks as f64).min(1.0)
    }

    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }
}

pub struct LemmaPipeline {
    config: PipelineConfig,
}

impl LemmaPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the whole pipeline over `text`.
    ///
    /// Either every chunk is annotated and counted, or an error is returned
    /// and no frequency map is produced.
    pub fn run<A, F>(&self, annotator: &A, text: &str, on_progress: F) -> Result<FrequencyMap, PipelineError>
    where
        A: Annotator + ?Sized,
        F: FnMut(Progress),
    {
        let never = AtomicBool::new(false);
        self.run_with_cancel(annotator, text, &never, on_progress)
    }

    /// Like [`run`](Self::run), checking `cancel_token` before each annotator batch.
    pub fn run_with_cancel<A, F>(
        &self,
        annotator: &A,
        text: &str,
        cancel_token: &AtomicBool,
        mut on_progress: F,
    ) -> Result<FrequencyMap, PipelineError>
    where
        A: Annotator + ?Sized,
        F: FnMut(Progress),
    {
        self.config.validate()?;

        let chunk_words = self.config.chunk_words;
        let batch_size = self.config.batch_size;

        let word_count = count_words(text);
        let total = total_chunks(word_count, chunk_words);
        log::info!(
            "Processing {} words in {} chunks ({} words per chunk, batch size {})",
            word_count,
            total,
            chunk_words,
            batch_size
        );

        let started = Instant::now();
        let mut frequencies = FrequencyMap::new();
        let mut processed = 0;
        let mut pending = chunks(words(text), chunk_words);
        let mut batch: Vec<String> = Vec::with_capacity(batch_size);

        loop {
            batch.clear();
            batch.extend(pending.by_ref().take(batch_size));
            if batch.is_empty() {
                break;
            }

            if cancel_token.load(Ordering::SeqCst) {
                log::warn!("Analysis cancelled after {}/{} chunks", processed, total);
                return Err(PipelineError::Cancelled);
            }

            let annotated = self.annotate_batch(annotator, &batch, processed)?;
            for tokens in &annotated {
                frequencies.record_all(tokens);
                processed += 1;
                on_progress(Progress {
                    chunks_processed: processed,
                    total_chunks: total,
                });
            }
        }

        log::info!(
            "Counted {} tokens into {} lemmas in {} ms",
            frequencies.total(),
            frequencies.len(),
            started.elapsed().as_millis()
        );
        Ok(frequencies)
    }

    fn annotate_batch<A>(
        &self,
        annotator: &A,
        batch: &[String],
        first_chunk: usize,
    ) -> Result<Vec<Vec<AnnotatedToken>>, PipelineError>
    where
        A: Annotator + ?Sized,
    {
        let mut attempt = 0;
        loop {
            let infer_start = Instant::now();
            let result = annotator.annotate(batch).and_then(|annotated| {
                if annotated.len() == batch.len() {
                    Ok(annotated)
                } else {
                    Err(AnnotationError::BatchMismatch {
                        expected: batch.len(),
                        got: annotated.len(),
                    })
                }
            });

            match result {
                Ok(annotated) => {
                    log::debug!(
                        "Annotated chunks {}..{} in {} ms",
                        first_chunk,
                        first_chunk + batch.len(),
                        infer_start.elapsed().as_millis()
                    );
                    return Ok(annotated);
                }
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    log::warn!(
                        "Annotation of chunk {} failed ({}), retrying ({}/{})",
                        first_chunk,
                        e,
                        attempt,
                        self.config.max_retries
                    );
                }
                Err(source) => {
                    log::error!("Annotation of chunk {} failed: {}", first_chunk, source);
                    return Err(PipelineError::Annotation {
                        chunk: first_chunk,
                        source,
                    });
                }
            }
        }
    }
}

impl Default for LemmaPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
