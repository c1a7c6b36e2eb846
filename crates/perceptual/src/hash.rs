//! Fixed-width k-gram digests.
//!
//! ```text
//! KgramHash = SHA-256(kgram_utf8_bytes)
//! ```
//!
//! The digest carries no version or file salt, so identical k-grams hash
//! identically within and across files. Ordering is byte-wise, which is the
//! same order as the lowercase hex strings.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// A 256-bit k-gram digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KgramHash([u8; 32]);

impl KgramHash {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex digest.
    pub fn from_hex(text: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(text, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for KgramHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for KgramHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KgramHash({})", self.to_hex())
    }
}

impl Serialize for KgramHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for KgramHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        KgramHash::from_hex(&text).map_err(D::Error::custom)
    }
}

/// Digest a single k-gram.
pub fn hash_kgram(kgram: &str) -> KgramHash {
    let digest = Sha256::digest(kgram.as_bytes());
    KgramHash(digest.into())
}

/// Digest every k-gram; index `i` of the result belongs to k-gram `i`.
pub fn hash_kgrams(kgrams: &[&str]) -> Vec<KgramHash> {
    kgrams.iter().map(|gram| hash_kgram(gram)).collect()
}
