//! Batch mode: count lemmas in one book and export the matches for every
//! vocabulary list.

use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use lemma_count_lib::export::{self, ExportFormat};
use lemma_count_lib::resources::{self, ResourceSource};
use lemma_count_lib::{analyze_book, AnalysisSession, LemmaPipeline, LexiconAnnotator, PipelineConfig, Progress, VocabularySet};

#[derive(Parser, Debug)]
#[clap(name = "lemma-count", about = "Counts lemmas in a book and matches them against vocabulary lists")]
struct Args {
    /// Book to analyze (UTF-8 text or EPUB).
    #[clap(short = 'b', long)]
    book: PathBuf,

    /// Vocabulary list, one word per line. May be repeated.
    #[clap(short = 'v', long = "vocab")]
    vocabs: Vec<PathBuf>,

    /// Use every .txt file in this directory (except the book) as a vocabulary list.
    #[clap(short = 'd', long)]
    vocab_dir: Option<PathBuf>,

    /// Lexicon TSV (surface, lemma, POS). Defaults to the installed lexicon.
    #[clap(short = 'l', long)]
    lexicon: Option<PathBuf>,

    /// Stem words missing from the lexicon.
    #[clap(long)]
    stem_unknown: bool,

    /// JSON config file. Defaults to the installed config.
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// Words per chunk.
    #[clap(long)]
    chunk_words: Option<usize>,

    /// Chunks per annotator call.
    #[clap(long)]
    batch_size: Option<usize>,

    /// Retries for a failed annotator batch.
    #[clap(long)]
    max_retries: Option<u32>,

    /// Export format. Choices are json and tsv.
    #[clap(short = 'f', long, default_value = "tsv")]
    format: ExportFormat,

    /// Output directory.
    #[clap(short = 'o', long, default_value = ".")]
    out_dir: PathBuf,

    /// Export only the N most frequent matches.
    #[clap(long)]
    top: Option<usize>,

    /// Export only these words.
    #[clap(long, value_delimiter = ',')]
    select: Vec<String>,
}

fn load_config(args: &Args) -> Result<PipelineConfig, Box<dyn Error>> {
    let mut config = match resources::resolve(args.config.as_deref(), &resources::default_config_path()) {
        ResourceSource::Explicit(path) | ResourceSource::Installed(path) => PipelineConfig::load(&path)?,
        ResourceSource::Missing => PipelineConfig::default(),
    };
    if let Some(chunk_words) = args.chunk_words {
        config.chunk_words = chunk_words;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }
    config.validate()?;
    Ok(config)
}

fn load_annotator(args: &Args) -> Result<LexiconAnnotator, Box<dyn Error>> {
    let annotator = match resources::resolve(args.lexicon.as_deref(), &resources::default_lexicon_path()) {
        ResourceSource::Explicit(path) | ResourceSource::Installed(path) => LexiconAnnotator::load(&path)?,
        ResourceSource::Missing => {
            log::warn!(
                "No lexicon found at {:?}; lemmas fall back to surface forms",
                resources::default_lexicon_path()
            );
            LexiconAnnotator::empty()
        }
    };
    Ok(if args.stem_unknown {
        annotator.with_stemming()
    } else {
        annotator
    })
}

fn vocabulary_paths(args: &Args) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut paths = args.vocabs.clone();

    if let Some(dir) = &args.vocab_dir {
        let book = fs::canonicalize(&args.book).unwrap_or_else(|_| args.book.clone());
        let mut found = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_txt = path.extension().map(|e| e == "txt").unwrap_or(false);
            let is_book = fs::canonicalize(&path).map(|p| p == book).unwrap_or(false);
            if path.is_file() && is_txt && !is_book {
                found.push(path);
            }
        }
        found.sort();
        paths.extend(found);
    }

    Ok(paths)
}

fn report_progress(progress: Progress) {
    eprint!(
        "\rLemmatizing: {:>3}% ({}/{} chunks)",
        progress.percent(),
        progress.chunks_processed,
        progress.total_chunks
    );
    let _ = std::io::stderr().flush();
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let annotator = load_annotator(&args)?;
    let vocabularies = vocabulary_paths(&args)?
        .iter()
        .map(|p| VocabularySet::load(p))
        .collect::<Result<Vec<_>, _>>()?;

    let pipeline = LemmaPipeline::new(config);
    let mut session = AnalysisSession::new();

    let result = analyze_book(&mut session, &pipeline, &annotator, &args.book, &vocabularies, report_progress)?;
    eprintln!();

    eprintln!("{} words, {} unique lemmas", result.word_count, result.unique_lemmas);

    fs::create_dir_all(&args.out_dir)?;
    for table in &result.tables {
        let table = if !args.select.is_empty() {
            table.select(args.select.as_slice())
        } else if let Some(n) = args.top {
            table.top(n)
        } else {
            table.clone()
        };

        if table.is_empty() {
            eprintln!("{}: no matches", table.vocabulary);
        }
        let path = export::export_table(&table, args.format, &args.out_dir)?;
        eprintln!("{}: {} words -> {}", table.vocabulary, table.len(), path.display());
    }

    Ok(())
}
