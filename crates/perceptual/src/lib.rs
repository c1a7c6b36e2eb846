//! # Winnowing fingerprints
//!
//! Turns canonical source text into a compact set of hashes that survives
//! reordering and small edits well enough to score similarity between files.
//!
//! ## Contract
//!
//! - Consumes [`canonical::CanonicalSource`] values only. It never strips
//!   comments or masks identifiers itself.
//! - Pure function of `(canonical_text, config)`: no I/O, no clocks, no global
//!   state.
//!
//! ## Core Pipeline
//!
//! 1.  **K-grams**: every run of `k` consecutive characters of the canonical
//!     text, in order.
//! 2.  **Hashing**: each k-gram is digested with SHA-256. Identical k-grams
//!     hash identically in every file.
//! 3.  **Winnowing**: a sliding-window minimum selects the fingerprints. The
//!     window `w` is derived once per batch from the longest text so every
//!     file in the batch is winnowed with the same width.
//!
//! ## Example Usage
//!
//! ```
//! use canonical::{normalize, CanonicalizeConfig};
//! use perceptual::{fingerprint_batch, PerceptualConfig};
//!
//! let cfg = CanonicalizeConfig::default();
//! let docs = vec![
//!     normalize("a.py", "for i in range(10):\n    print(i * i)\n", &cfg).unwrap(),
//!     normalize("b.py", "for j in range(10):\n    print(j * j)\n", &cfg).unwrap(),
//! ];
//!
//! let batch = fingerprint_batch(&docs, &PerceptualConfig::new().with_k(5)).unwrap();
//! assert_eq!(batch.fingerprints.len(), 2);
//! assert_eq!(batch.fingerprints[0].fingerprint_set(), batch.fingerprints[1].fingerprint_set());
//! ```

use std::time::Instant;

use canonical::CanonicalSource;
use rayon::prelude::*;
use tracing::{debug, info, warn};

pub mod config;
pub mod fingerprint;
mod hash;
mod kgrams;
mod winnow;

pub use crate::config::{PerceptualConfig, PerceptualError};
pub use crate::fingerprint::{FingerprintMeta, SourceFingerprint};
pub use crate::hash::{hash_kgram, hash_kgrams, KgramHash};
pub use crate::kgrams::kgrams;
pub use crate::winnow::{derive_window_size, winnow, Fingerprint};

/// Current fingerprint algorithm version for this crate.
pub const PERCEPTUAL_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const PERCEPTUAL_ALGORITHM: &str = "charkgram_sha256_winnow_v1";

/// Fingerprints of a whole batch, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFingerprints {
    /// Window width every file was winnowed with.
    pub window: usize,
    pub fingerprints: Vec<SourceFingerprint>,
}

/// Fingerprint one canonical source with window width `w`.
///
/// A text shorter than `k` characters, or with fewer than `w` k-grams, gives
/// an empty fingerprint list. That is a valid result, not an error.
pub fn fingerprint_source(
    doc: &CanonicalSource,
    w: usize,
    cfg: &PerceptualConfig,
) -> Result<SourceFingerprint, PerceptualError> {
    cfg.validate()?;
    if w == 0 {
        return Err(PerceptualError::InvalidConfigWindow { w });
    }

    let grams = kgrams(&doc.canonical_text, cfg.k);
    let mut hashes = hash_kgrams(&grams);
    let fingerprints = winnow(&hashes, w);

    if fingerprints.is_empty() {
        warn!(
            name = %doc.name,
            chars = doc.char_len(),
            k = cfg.k,
            w,
            "perceptual_empty_fingerprint"
        );
    } else {
        debug!(
            name = %doc.name,
            kgrams = grams.len(),
            fingerprints = fingerprints.len(),
            "perceptual_fingerprinted"
        );
    }

    let kgram_count = grams.len();
    if !cfg.include_intermediates {
        hashes.clear();
    }

    Ok(SourceFingerprint {
        name: doc.name.clone(),
        kgram_count,
        hashes,
        fingerprints,
        meta: FingerprintMeta {
            perceptual_version: PERCEPTUAL_VERSION,
            algorithm_name: PERCEPTUAL_ALGORITHM.to_string(),
            k: cfg.k,
            w,
            canonical_version: doc.canonical_version,
            config_version: cfg.version,
        },
    })
}

/// Window width for `docs`: the override when set, else derived from the
/// longest canonical text.
pub fn batch_window_size(docs: &[CanonicalSource], cfg: &PerceptualConfig) -> usize {
    match cfg.window_override {
        Some(w) => w,
        None => {
            let max_len = docs.iter().map(CanonicalSource::char_len).max().unwrap_or(0);
            derive_window_size(max_len)
        }
    }
}

/// Fingerprint every document of a batch with one shared window width.
///
/// With `use_parallel` the files are processed on the rayon pool; output order
/// always matches `docs`.
pub fn fingerprint_batch(
    docs: &[CanonicalSource],
    cfg: &PerceptualConfig,
) -> Result<BatchFingerprints, PerceptualError> {
    let start = Instant::now();
    cfg.validate()?;
    let window = batch_window_size(docs, cfg);

    let fingerprints = if cfg.use_parallel {
        docs.par_iter()
            .map(|doc| fingerprint_source(doc, window, cfg))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        docs.iter()
            .map(|doc| fingerprint_source(doc, window, cfg))
            .collect::<Result<Vec<_>, _>>()?
    };

    info!(
        files = fingerprints.len(),
        k = cfg.k,
        window,
        parallel = cfg.use_parallel,
        elapsed_micros = start.elapsed().as_micros(),
        "perceptual_batch_complete"
    );

    Ok(BatchFingerprints {
        window,
        fingerprints,
    })
}
