use crate::chunker::DEFAULT_CHUNK_WORDS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Chunks handed to the annotator per call.
pub const DEFAULT_BATCH_SIZE: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Tuning knobs for a pipeline run.
///
/// Every field is optional in the JSON form and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Words per chunk. Larger chunks mean fewer annotator calls and more memory.
    pub chunk_words: usize,
    pub batch_size: usize,
    /// Extra attempts for a failed annotator batch. Zero disables retrying.
    pub max_retries: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_words: DEFAULT_CHUNK_WORDS,
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: 0,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: PipelineConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_words == 0 {
            return Err(ConfigError::Invalid("chunk_words must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
