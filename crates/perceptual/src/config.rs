//! Configuration and error types for winnowing fingerprints.
//!
//! The perceptual stage is a pure function of `(canonical_text, config)`, so
//! nothing here reads the environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the k-gram / hash / winnow pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PerceptualConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can affect the fingerprint must bump this
    /// version.
    pub version: u32,
    /// Noise threshold: k-gram length in characters.
    ///
    /// Matches shorter than this are never detected.
    pub k: usize,
    /// Fixed winnowing window. When `None`, the window is derived from the
    /// longest canonical text in the batch.
    pub window_override: Option<usize>,
    /// Fingerprint files of a batch on the rayon pool.
    pub use_parallel: bool,
    /// Keep the full hash stream on each fingerprint.
    ///
    /// When `false`, hashes are still computed internally but cleared from
    /// the returned struct.
    pub include_intermediates: bool,
}

impl PerceptualConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the noise threshold. Typical values: 5-15.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Pin the winnowing window instead of deriving it per batch.
    pub fn with_window(mut self, w: usize) -> Self {
        self.window_override = Some(w);
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn with_intermediates(mut self, include_intermediates: bool) -> Self {
        self.include_intermediates = include_intermediates;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.version < 1 {
            return Err(PerceptualError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.k < 1 {
            return Err(PerceptualError::InvalidConfigK { k: self.k });
        }
        if let Some(w) = self.window_override {
            if w < 1 {
                return Err(PerceptualError::InvalidConfigWindow { w });
            }
        }
        Ok(())
    }
}

impl Default for PerceptualConfig {
    fn default() -> Self {
        Self {
            version: 1,
            k: 9,
            window_override: None,
            use_parallel: false,
            include_intermediates: true,
        }
    }
}

/// Errors returned by the fingerprinting pipeline.
///
/// A text too short to produce a fingerprint is not an error; it yields an
/// empty fingerprint set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("invalid config: k must be >= 1 (got {k})")]
    InvalidConfigK { k: usize },

    #[error("invalid config: window must be >= 1 (got {w})")]
    InvalidConfigWindow { w: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}
