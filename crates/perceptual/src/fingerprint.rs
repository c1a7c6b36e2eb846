//! Fingerprint and metadata types for the winnowing stage.
//!
//! The schema is part of the public contract: any incompatible change must
//! result in a new `perceptual_version`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::hash::KgramHash;
use crate::winnow::Fingerprint;

/// Winnowed fingerprint of one canonical source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceFingerprint {
    /// Submission name the fingerprint belongs to.
    pub name: String,
    /// Number of k-grams the canonical text produced.
    pub kgram_count: usize,
    /// Every k-gram hash in text order.
    ///
    /// Empty when intermediates are disabled in the config.
    pub hashes: Vec<KgramHash>,
    /// Selected fingerprints in scan order.
    pub fingerprints: Vec<Fingerprint>,
    pub meta: FingerprintMeta,
}

impl SourceFingerprint {
    /// Distinct fingerprint hashes, the set that similarity is scored on.
    pub fn fingerprint_set(&self) -> BTreeSet<KgramHash> {
        self.fingerprints.iter().map(|fp| fp.hash).collect()
    }

    /// No fingerprint was selected (text shorter than `k + w - 1`).
    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

/// Metadata for traceability and determinism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintMeta {
    pub perceptual_version: u16,
    /// Human-readable algorithm identifier.
    pub algorithm_name: String,
    pub k: usize,
    pub w: usize,
    pub canonical_version: u32,
    pub config_version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> FingerprintMeta {
        FingerprintMeta {
            perceptual_version: 1,
            algorithm_name: "test".to_string(),
            k: 3,
            w: 2,
            canonical_version: 1,
            config_version: 1,
        }
    }

    fn fp(byte: u8, position: usize) -> Fingerprint {
        Fingerprint {
            hash: KgramHash::from_bytes([byte; 32]),
            position,
        }
    }

    #[test]
    fn fingerprint_set_dedups() {
        let source = SourceFingerprint {
            name: "a.py".into(),
            kgram_count: 6,
            hashes: Vec::new(),
            fingerprints: vec![fp(3, 0), fp(1, 2), fp(3, 4)],
            meta: meta(),
        };
        let set = source.fingerprint_set();
        assert_eq!(set.len(), 2);
        assert!(!source.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let source = SourceFingerprint {
            name: "b.py".into(),
            kgram_count: 2,
            hashes: vec![KgramHash::from_bytes([7; 32]), KgramHash::from_bytes([1; 32])],
            fingerprints: vec![fp(1, 1)],
            meta: meta(),
        };
        let json = serde_json::to_string(&source).unwrap();
        let back: SourceFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(source, back);
    }
}
