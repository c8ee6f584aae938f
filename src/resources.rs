//! Default locations for the lexicon and config file.
//!
//! Both live in the XDG data directory so a lexicon installed once is picked
//! up by every run without passing `--lexicon`.

use std::path::{Path, PathBuf};

const LEXICON_FILE: &str = "lexicon.tsv";
const CONFIG_FILE: &str = "config.json";

/// Get the base resource directory (XDG data directory)
pub fn get_resource_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lemma-count")
}

pub fn default_lexicon_path() -> PathBuf {
    get_resource_dir().join(LEXICON_FILE)
}

pub fn default_config_path() -> PathBuf {
    get_resource_dir().join(CONFIG_FILE)
}

/// Where a resource comes from for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSource {
    /// Passed explicitly; must exist.
    Explicit(PathBuf),
    /// Default location that exists.
    Installed(PathBuf),
    /// Nothing given and nothing installed.
    Missing,
}

/// Pick the explicit path if given, else the default one when it exists.
pub fn resolve(explicit: Option<&Path>, default: &Path) -> ResourceSource {
    match explicit {
        Some(path) => ResourceSource::Explicit(path.to_path_buf()),
        None if default.exists() => ResourceSource::Installed(default.to_path_buf()),
        None => ResourceSource::Missing,
    }
}
