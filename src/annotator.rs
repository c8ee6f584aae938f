//! Annotation boundary: turns chunk text into lemma/POS tokens.
//!
//! The pipeline only depends on the [`Annotator`] trait. [`LexiconAnnotator`]
//! is the implementation shipped with the binary: a surface -> (lemma, POS)
//! lookup table with an optional Snowball stemming fallback for unknown words.

use rust_stemmers::{Algorithm, Stemmer};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Coarse part of speech (Universal Dependencies tag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl Pos {
    pub fn is_adverb(self) -> bool {
        self == Pos::Adv
    }

    /// Suffix guess for words missing from the lexicon.
    pub fn guess(word: &str) -> Pos {
        let lower = word.to_ascii_lowercase();
        if lower.len() > 4 && lower.ends_with("ly") {
            Pos::Adv
        } else {
            Pos::X
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pos::Adj => "ADJ",
            Pos::Adp => "ADP",
            Pos::Adv => "ADV",
            Pos::Aux => "AUX",
            Pos::Cconj => "CCONJ",
            Pos::Det => "DET",
            Pos::Intj => "INTJ",
            Pos::Noun => "NOUN",
            Pos::Num => "NUM",
            Pos::Part => "PART",
            Pos::Pron => "PRON",
            Pos::Propn => "PROPN",
            Pos::Punct => "PUNCT",
            Pos::Sconj => "SCONJ",
            Pos::Sym => "SYM",
            Pos::Verb => "VERB",
            Pos::X => "X",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pos {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let pos = match tag.trim().to_ascii_uppercase().as_str() {
            "ADJ" | "ADJECTIVE" => Pos::Adj,
            "ADP" => Pos::Adp,
            "ADV" | "ADVERB" => Pos::Adv,
            "AUX" => Pos::Aux,
            "CCONJ" | "CONJ" => Pos::Cconj,
            "DET" => Pos::Det,
            "INTJ" => Pos::Intj,
            "NOUN" => Pos::Noun,
            "NUM" => Pos::Num,
            "PART" => Pos::Part,
            "PRON" => Pos::Pron,
            "PROPN" => Pos::Propn,
            "PUNCT" => Pos::Punct,
            "SCONJ" => Pos::Sconj,
            "SYM" => Pos::Sym,
            "VERB" => Pos::Verb,
            "X" | "OTHER" => Pos::X,
            other => return Err(format!("unknown POS tag '{}'", other)),
        };
        Ok(pos)
    }
}

/// One token as returned by an annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedToken {
    pub lemma: String,
    pub pos: Pos,
    pub is_alpha: bool,
}

impl AnnotatedToken {
    /// Token whose lemma is also its surface text.
    pub fn new(lemma: impl Into<String>, pos: Pos) -> Self {
        let lemma = lemma.into();
        let is_alpha = is_alphabetic(&lemma);
        Self { lemma, pos, is_alpha }
    }

    /// Token classified by its surface text; the lemma may contain anything.
    pub fn from_surface(surface: &str, lemma: impl Into<String>, pos: Pos) -> Self {
        Self {
            lemma: lemma.into(),
            pos,
            is_alpha: is_alphabetic(surface),
        }
    }
}

fn is_alphabetic(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphabetic)
}

#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("Annotator unavailable: {0}")]
    Unavailable(String),
    #[error("Annotator failed: {0}")]
    Failed(String),
    #[error("Annotator returned {got} annotation lists for {expected} chunks")]
    BatchMismatch { expected: usize, got: usize },
}

/// External lemmatization capability.
///
/// `annotate` receives a batch of text blobs and must return exactly one
/// token list per blob, in the same order. Implementations are expected to be
/// deterministic for a given input.
pub trait Annotator {
    fn annotate(&self, blobs: &[String]) -> Result<Vec<Vec<AnnotatedToken>>, AnnotationError>;
}

impl<A: Annotator + ?Sized> Annotator for &A {
    fn annotate(&self, blobs: &[String]) -> Result<Vec<Vec<AnnotatedToken>>, AnnotationError> {
        (**self).annotate(blobs)
    }
}

impl<A: Annotator + ?Sized> Annotator for Box<A> {
    fn annotate(&self, blobs: &[String]) -> Result<Vec<Vec<AnnotatedToken>>, AnnotationError> {
        (**self).annotate(blobs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Lexicon line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Malformed lexicon: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone)]
struct LexiconEntry {
    lemma: String,
    pos: Pos,
}

/// Lookup-table annotator.
///
/// Lexicon format is one entry per line, tab separated:
/// `surface<TAB>lemma[<TAB>POS]`. Blank lines and lines starting with `#`
/// are ignored. Surfaces are matched case-insensitively.
pub struct LexiconAnnotator {
    entries: HashMap<String, LexiconEntry>,
    stemmer: Option<Stemmer>,
}

impl LexiconAnnotator {
    /// Annotator with an empty lexicon. Every word is treated as unknown.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            stemmer: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let content = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let annotator = Self::parse(&content)?;
        log::info!("Loaded {} lexicon entries from {:?}", annotator.len(), path);
        Ok(annotator)
    }

    pub fn parse(content: &str) -> Result<Self, LexiconError> {
        // Fields are taken verbatim: a lemma such as `"tis` is not a quoted field
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut entries = HashMap::new();
        for result in rdr.records() {
            let record = result?;
            if record.iter().all(str::is_empty) || record[0].starts_with('#') {
                continue;
            }
            let line = record.position().map(|p| p.line() as usize).unwrap_or_default();

            let surface = record.get(0).unwrap_or_default();
            let lemma = record.get(1).ok_or_else(|| LexiconError::Parse {
                line,
                message: "expected at least two tab-separated fields".to_string(),
            })?;
            if surface.is_empty() || lemma.is_empty() {
                return Err(LexiconError::Parse {
                    line,
                    message: "empty surface or lemma".to_string(),
                });
            }
            let pos = match record.get(2) {
                Some(tag) if !tag.is_empty() => tag
                    .parse::<Pos>()
                    .map_err(|message| LexiconError::Parse { line, message })?,
                _ => Pos::X,
            };

            entries.insert(
                surface.to_lowercase(),
                LexiconEntry {
                    lemma: lemma.to_string(),
                    pos,
                },
            );
        }

        Ok(Self { entries, stemmer: None })
    }

    /// Stem words missing from the lexicon instead of passing them through.
    pub fn with_stemming(mut self) -> Self {
        self.stemmer = Some(Stemmer::create(Algorithm::English));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn annotate_word(&self, word: &str) -> AnnotatedToken {
        let lower = word.to_lowercase();
        if let Some(entry) = self.entries.get(&lower) {
            return AnnotatedToken::from_surface(word, entry.lemma.clone(), entry.pos);
        }

        let pos = Pos::guess(&lower);
        let lemma = match &self.stemmer {
            // Stemming would strip the -ly the adverb rule relies on
            Some(stemmer) if !pos.is_adverb() => stemmer.stem(&lower).to_string(),
            _ => lower,
        };
        AnnotatedToken::from_surface(word, lemma, pos)
    }
}

impl Default for LexiconAnnotator {
    fn default() -> Self {
        Self::empty()
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, blobs: &[String]) -> Result<Vec<Vec<AnnotatedToken>>, AnnotationError> {
        Ok(blobs
            .iter()
            .map(|blob| blob.split_whitespace().map(|w| self.annotate_word(w)).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = "\
# surface\tlemma\tpos
cats\tcat\tNOUN
ran\trun\tVERB
quickly\tquickly\tADV
only\tonly\tADV

friendly\tfriendly\tADJ
";

    #[test]
    fn test_parse_lexicon() {
        let annotator = LexiconAnnotator::parse(LEXICON).unwrap();
        assert_eq!(annotator.len(), 5);

        let out = annotator.annotate(&["Cats ran quickly".to_string()]).unwrap();
        assert_eq!(
            out,
            vec![vec![
                AnnotatedToken::new("cat", Pos::Noun),
                AnnotatedToken::new("run", Pos::Verb),
                AnnotatedToken::new("quickly", Pos::Adv),
            ]]
        );
    }

    #[test]
    fn test_two_column_line_defaults_to_x() {
        let annotator = LexiconAnnotator::parse("mice\tmouse\n").unwrap();
        let out = annotator.annotate(&["mice".to_string()]).unwrap();
        assert_eq!(out[0][0], AnnotatedToken::new("mouse", Pos::X));
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = LexiconAnnotator::parse("cats\tcat\tNOUN\nbroken\n").err().unwrap();
        match err {
            LexiconError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }

        let err = LexiconAnnotator::parse("cats\tcat\tNOUNISH\n").err().unwrap();
        assert!(err.to_string().contains("NOUNISH"));
    }

    #[test]
    fn test_unknown_words_pass_through_lowercased() {
        let annotator = LexiconAnnotator::empty();
        let out = annotator.annotate(&["Running Softly".to_string()]).unwrap();
        assert_eq!(
            out[0],
            vec![
                AnnotatedToken::new("running", Pos::X),
                AnnotatedToken::new("softly", Pos::Adv),
            ]
        );
    }

    #[test]
    fn test_stemming_fallback_keeps_adverbs() {
        let annotator = LexiconAnnotator::empty().with_stemming();
        let out = annotator.annotate(&["running softly".to_string()]).unwrap();
        assert_eq!(out[0][0].lemma, "run");
        assert_eq!(out[0][1].lemma, "softly");
    }

    #[test]
    fn test_one_list_per_blob() {
        let annotator = LexiconAnnotator::empty();
        let blobs = vec!["a b".to_string(), "c".to_string(), String::new()];
        let out = annotator.annotate(&blobs).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].len(), 2);
        assert_eq!(out[1].len(), 1);
        assert!(out[2].is_empty());
    }

    #[test]
    fn test_non_alphabetic_lemmas_still_count() {
        let annotator = LexiconAnnotator::parse("cannot\tcan not\tAUX\nus\t-PRON-\tPRON\n").unwrap();
        let blobs = vec!["we cannot see us".to_string()];
        let out = annotator.annotate(&blobs).unwrap();

        assert!(out[0].iter().all(|t| t.is_alpha));
        assert_eq!(out[0][1].lemma, "can not");
        assert_eq!(out[0][3].lemma, "-PRON-");

        let map: crate::FrequencyMap = out[0].iter().collect();
        assert_eq!(map.total(), 4);
        assert_eq!(map.get("can not"), 1);
        assert_eq!(map.get("-pron-"), 1);
    }

    #[test]
    fn test_quote_characters_are_literal() {
        let annotator = LexiconAnnotator::parse("tis\t\"tis\tPRON\nok\tokay\n").unwrap();
        assert_eq!(annotator.len(), 2);

        let out = annotator.annotate(&["tis ok".to_string()]).unwrap();
        assert_eq!(out[0][0].lemma, "\"tis");
        assert_eq!(out[0][1].lemma, "okay");
    }

    #[test]
    fn test_from_surface_classifies_surface() {
        assert!(AnnotatedToken::from_surface("o", "o'clock", Pos::Noun).is_alpha);
        assert!(!AnnotatedToken::from_surface("42", "forty-two", Pos::Num).is_alpha);
    }

    #[test]
    fn test_pos_guess_and_parse() {
        assert_eq!(Pos::guess("slowly"), Pos::Adv);
        assert_eq!(Pos::guess("fly"), Pos::X);
        assert_eq!(Pos::guess("only"), Pos::X);
        assert_eq!("adv".parse::<Pos>().unwrap(), Pos::Adv);
        assert_eq!(Pos::Propn.to_string(), "PROPN");
    }

    #[test]
    fn test_is_alpha_flag() {
        assert!(AnnotatedToken::new("word", Pos::Noun).is_alpha);
        assert!(!AnnotatedToken::new("42", Pos::Num).is_alpha);
        assert!(!AnnotatedToken::new("", Pos::X).is_alpha);
    }
}
