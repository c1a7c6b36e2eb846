//! Output type of the normalizer.
//!
//! ```rust
//! use canonical::{normalize, CanonicalizeConfig};
//!
//! let src = normalize("a.py", "total = price * 2  # double\n", &CanonicalizeConfig::default()).unwrap();
//! assert_eq!(src.canonical_text, "=price*2");
//! assert_eq!(src.identifiers_masked, 1);
//! assert!(!src.parse_failed);
//! ```

use serde::{Deserialize, Serialize};

/// Canonical, whitespace-free view of one submission.
///
/// The identifier set that drove masking is not retained; only its size is
/// kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSource {
    /// Submission name, unique within a batch.
    pub name: String,
    /// Comment-free text with identifiers masked and every space removed.
    pub canonical_text: String,
    /// Number of distinct identifiers that were masked.
    pub identifiers_masked: usize,
    /// The file did not parse and was normalized without masking.
    pub parse_failed: bool,
    pub canonical_version: u32,
}

impl CanonicalSource {
    /// Length in Unicode scalar values, the unit k-grams are measured in.
    pub fn char_len(&self) -> usize {
        self.canonical_text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_text.is_empty()
    }
}
