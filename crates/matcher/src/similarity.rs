use std::collections::BTreeSet;

use crate::types::NO_COMPARISON;

/// Jaccard similarity of two fingerprint sets as a percentage rounded to two
/// decimals. Returns [`NO_COMPARISON`] when either set is empty.
pub fn jaccard_score<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return NO_COMPARISON;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let shared = small.iter().filter(|item| large.contains(item)).count();
    let union = a.len() + b.len() - shared;
    round2(100.0 * shared as f64 / union as f64)
}

/// A real score, as opposed to the sentinel.
#[inline]
pub fn is_comparable(score: f64) -> bool {
    score >= 0.0
}

/// Round half away from zero to two decimals.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
