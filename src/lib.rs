pub mod annotator;
pub mod chunker;
pub mod config;
mod epub;
pub mod export;
pub mod input;
pub mod normalizer;
pub mod pipeline;
pub mod resources;
pub mod session;
pub mod tokenizer;
pub mod vocabulary;

pub use annotator::{AnnotatedToken, AnnotationError, Annotator, LexiconAnnotator, Pos};
pub use config::PipelineConfig;
pub use normalizer::{normalize_lemma, FrequencyMap};
pub use pipeline::{LemmaPipeline, PipelineError, Progress};
pub use session::{AnalysisSession, SessionState};
pub use vocabulary::{MatchTable, VocabularySet};

use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub word_count: usize,
    pub unique_lemmas: usize,
    pub counted_tokens: usize,
    pub tables: Vec<MatchTable>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("No vocabulary lists given")]
    MissingVocabulary,
    #[error(transparent)]
    Input(#[from] input::InputError),
    #[error(transparent)]
    Run(#[from] session::SessionRunError),
}

/// Count lemmas in the book at `book_path` and match them against every vocabulary.
///
/// Missing inputs are reported before any annotation work starts.
pub fn analyze_book<A, F>(
    session: &mut AnalysisSession,
    pipeline: &LemmaPipeline,
    annotator: &A,
    book_path: &Path,
    vocabularies: &[VocabularySet],
    on_progress: F,
) -> Result<AnalysisResult, AnalyzeError>
where
    A: Annotator + ?Sized,
    F: FnMut(Progress),
{
    let text = input::read_book(book_path)?;
    if vocabularies.is_empty() {
        return Err(AnalyzeError::MissingVocabulary);
    }

    let word_count = tokenizer::count_words(&text);

    let frequencies = session.run(pipeline, annotator, &text, on_progress)?;
    log::info!("Analysis complete: {} unique lemmas", frequencies.len());

    let tables = vocabularies.iter().map(|v| v.match_counts(&frequencies)).collect();

    Ok(AnalysisResult {
        word_count,
        unique_lemmas: frequencies.len(),
        counted_tokens: frequencies.total(),
        tables,
    })
}
