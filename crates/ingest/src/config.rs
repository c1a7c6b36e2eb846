//! Configuration for loading submission batches.
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default().with_extensions(["py"]);
//! config.validate().expect("valid config");
//! assert!(config.accepts_name("solution.py"));
//! assert!(!config.accepts_name("notes.txt"));
//! ```
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Runtime configuration for directory ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IngestConfig {
    /// Configuration schema version. Version 0 is reserved.
    pub version: u32,
    /// File extensions (without the dot) to keep. Empty means every regular file.
    pub extensions: Vec<String>,
    /// Skip dot-files such as `.DS_Store` or editor swap files.
    pub skip_hidden: bool,
}

fn default_skip_hidden() -> bool {
    true
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            version: 1,
            extensions: Vec::new(),
            skip_hidden: default_skip_hidden(),
        }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the batch to files carrying one of `extensions`.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.version == 0 {
            return Err(IngestError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if self.extensions.iter().any(|ext| ext.is_empty()) {
            return Err(IngestError::InvalidConfig(
                "extensions must not contain empty entries".into(),
            ));
        }
        Ok(())
    }

    /// Whether a file with this name belongs in the batch.
    pub fn accepts_name(&self, name: &str) -> bool {
        if self.skip_hidden && name.starts_with('.') {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        match name.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            }
            None => false,
        }
    }
}
