//! Reading the book to analyze.

use crate::epub::{self, EpubError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Input not found: {0}")]
    Missing(PathBuf),
    #[error("{path} is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    Encoding { path: PathBuf, valid_up_to: usize },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Epub(#[from] EpubError),
}

pub fn is_epub(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("epub"))
        .unwrap_or(false)
}

fn read_error(path: &Path, source: std::io::Error) -> InputError {
    if source.kind() == std::io::ErrorKind::NotFound {
        InputError::Missing(path.to_path_buf())
    } else {
        InputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a whole file as strict UTF-8.
pub fn read_utf8(path: &Path) -> Result<String, InputError> {
    let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
    String::from_utf8(bytes).map_err(|e| InputError::Encoding {
        path: path.to_path_buf(),
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// Load the book text. EPUB files are flattened to plain text first.
pub fn read_book(path: &Path) -> Result<String, InputError> {
    if is_epub(path) {
        // The EPUB reader folds every open failure into one message
        fs::metadata(path).map_err(|e| read_error(path, e))?;
        return Ok(epub::extract_text(path)?.full_text);
    }
    read_utf8(path)
}
