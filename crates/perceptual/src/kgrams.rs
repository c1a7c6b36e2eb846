/// Overlapping character k-grams of `text`, in string order.
///
/// Lengths are counted in Unicode scalar values and every k-gram borrows from
/// `text`. A text of `L` characters yields `max(0, L - k + 1)` k-grams; `k == 0`
/// yields none.
pub fn kgrams(text: &str, k: usize) -> Vec<&str> {
    if k == 0 {
        return Vec::new();
    }

    // Byte offset of every character start, plus the end of the text.
    let mut bounds: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
    let len = bounds.len();
    if len < k {
        return Vec::new();
    }
    bounds.push(text.len());

    (0..=len - k)
        .map(|start| &text[bounds[start]..bounds[start + k]])
        .collect()
}
