//! Winnowing fingerprint selection.
//!
//! Windows are `hashes[i..i + w]`. The scan starts at window 0, takes the
//! leftmost minimum of the current window, and then jumps to the window that
//! starts one past that minimum. A sequence of `n` hashes therefore yields at
//! most `n - w + 1` fingerprints and usually far fewer.
//!
//! Two texts that share a run of at least `w + k - 1` characters at aligned
//! scan positions (for example a common prefix) always share a fingerprint.

use serde::{Deserialize, Serialize};

use crate::hash::KgramHash;

/// A selected hash and the index of the k-gram it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub hash: KgramHash,
    pub position: usize,
}

/// Window size for a batch whose longest canonical text has `max_len`
/// characters: `max(1, floor(ln(max_len)))`.
pub fn derive_window_size(max_len: usize) -> usize {
    if max_len == 0 {
        return 1;
    }
    let w = (max_len as f64).ln().floor();
    if w < 1.0 {
        1
    } else {
        w as usize
    }
}

/// Select fingerprints from `hashes` with window width `w`.
///
/// Fewer than `w` hashes means zero windows and an empty result. `w == 0` is
/// treated as 1.
pub fn winnow(hashes: &[KgramHash], w: usize) -> Vec<Fingerprint> {
    let w = w.max(1);
    if hashes.len() < w {
        return Vec::new();
    }

    let window_count = hashes.len() - w + 1;
    let mut out = Vec::with_capacity(window_count / w + 1);
    let mut pointer = 0;

    while pointer < window_count {
        let window = &hashes[pointer..pointer + w];
        let mut offset = 0;
        for (idx, hash) in window.iter().enumerate().skip(1) {
            // strict: ties keep the leftmost
            if *hash < window[offset] {
                offset = idx;
            }
        }
        out.push(Fingerprint {
            hash: window[offset],
            position: pointer + offset,
        });
        pointer += offset + 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_kgrams;
    use crate::kgrams::kgrams;

    fn h(byte: u8) -> KgramHash {
        KgramHash::from_bytes([byte; 32])
    }

    fn picked(hashes: &[KgramHash], w: usize) -> Vec<(u8, usize)> {
        winnow(hashes, w)
            .into_iter()
            .map(|fp| (fp.hash.as_bytes()[0], fp.position))
            .collect()
    }

    #[test]
    fn derive_window_matches_floor_ln() {
        assert_eq!(derive_window_size(0), 1);
        assert_eq!(derive_window_size(1), 1);
        assert_eq!(derive_window_size(2), 1);
        assert_eq!(derive_window_size(7), 1);
        assert_eq!(derive_window_size(8), 2);
        assert_eq!(derive_window_size(100), 4);
        assert_eq!(derive_window_size(1_000), 6);
        assert_eq!(derive_window_size(100_000), 11);
    }

    #[test]
    fn skips_past_selected_minimum() {
        // windows of 3 over [5 3 8 1 9 2 7]:
        // [5 3 8] -> 3@1, jump to 2; [8 1 9] -> 1@3, jump to 4; [9 2 7] -> 2@5
        let hashes = [h(5), h(3), h(8), h(1), h(9), h(2), h(7)];
        assert_eq!(picked(&hashes, 3), vec![(3, 1), (1, 3), (2, 5)]);
    }

    #[test]
    fn ties_pick_leftmost() {
        let hashes = [h(4), h(2), h(2), h(6), h(7)];
        assert_eq!(picked(&hashes, 3), vec![(2, 1), (2, 2)]);
    }

    #[test]
    fn window_of_one_keeps_everything() {
        let hashes = [h(9), h(1), h(5)];
        assert_eq!(picked(&hashes, 1), vec![(9, 0), (1, 1), (5, 2)]);
    }

    #[test]
    fn fewer_hashes_than_window_is_empty() {
        assert!(winnow(&[h(1), h(2)], 3).is_empty());
        assert!(winnow(&[], 1).is_empty());
    }

    #[test]
    fn exact_window_gives_single_minimum() {
        assert_eq!(picked(&[h(7), h(3), h(5)], 3), vec![(3, 1)]);
    }

    #[test]
    fn ascending_run_takes_every_window_start() {
        let hashes = [h(1), h(2), h(3), h(4), h(5)];
        assert_eq!(picked(&hashes, 2), vec![(1, 0), (2, 1), (3, 2), (4, 3)]);
    }

    #[test]
    fn positions_are_increasing() {
        let text = "def(a,b):=a*b+a-b*(a+b)return";
        let grams = kgrams(text, 4);
        let fps = winnow(&hash_kgrams(&grams), 3);
        assert!(!fps.is_empty());
        for pair in fps.windows(2) {
            assert!(pair[0].position < pair[1].position);
        }
    }

    #[test]
    fn shared_prefix_guarantees_common_fingerprint() {
        let k = 5;
        let w = 4;
        let shared = "for(,)inrange(len()):print([])";
        assert!(shared.chars().count() >= w + k - 1);

        let a = format!("{shared}if>:return");
        let b = format!("{shared}while<:+=1");
        let fa = winnow(&hash_kgrams(&kgrams(&a, k)), w);
        let fb = winnow(&hash_kgrams(&kgrams(&b, k)), w);

        let set_a: std::collections::BTreeSet<_> = fa.iter().map(|fp| fp.hash).collect();
        assert!(fb.iter().any(|fp| set_a.contains(&fp.hash)));
    }
}
