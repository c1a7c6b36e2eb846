//! Configuration types for the source canonicalization pipeline.
//!
//! [`CanonicalizeConfig`] controls how raw source text is turned into the
//! canonical, identifier-masked character stream that the fingerprinting stage
//! consumes.
//!
//! # Versioning
//!
//! Any change to canonicalization behavior must be accompanied by a version
//! bump so that fingerprints produced under different rules are never mixed
//! silently.
//!
//! # Examples
//!
//! ```rust
//! use canonical::CanonicalizeConfig;
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert_eq!(config.comment_marker, "#");
//! assert!(config.mask_identifiers);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for the canonical source pipeline.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// YAML configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanonicalizeConfig {
    /// Semantic version of the canonicalization rules. Must be >= 1.
    pub version: u32,

    /// Line-comment marker. Everything from its first occurrence on a line to
    /// the end of that line is discarded. String literals are not special-cased.
    pub comment_marker: String,

    /// Remove occurrences of user-defined identifiers (bindings, attribute
    /// names, function names) from the canonical stream.
    ///
    /// Disabling this yields syntax-preserving normalization only, which is
    /// also what a file that fails to parse degrades to.
    pub mask_identifiers: bool,
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            comment_marker: "#".to_string(),
            mask_identifiers: true,
        }
    }
}

impl CanonicalizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment_marker(mut self, marker: impl Into<String>) -> Self {
        self.comment_marker = marker.into();
        self
    }

    pub fn with_mask_identifiers(mut self, mask: bool) -> Self {
        self.mask_identifiers = mask;
        self
    }

    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if self.comment_marker.is_empty() {
            return Err(CanonicalError::InvalidConfig(
                "comment marker must not be empty".into(),
            ));
        }
        if self.comment_marker.chars().any(char::is_whitespace) {
            return Err(CanonicalError::InvalidConfig(
                "comment marker must not contain whitespace".into(),
            ));
        }
        Ok(())
    }
}
