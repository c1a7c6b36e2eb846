use crate::identifiers::IdentifierSet;

/// Drop every whole ASCII word (`[A-Za-z0-9_]+`) that names a discovered
/// identifier and remove all spaces. Any other character is kept verbatim.
///
/// Matching is on whole words only, so masking `x` leaves `max` and `x1`
/// untouched.
pub fn mask_identifiers(text: &str, identifiers: &IdentifierSet) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) {
            word_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = word_start.take() {
            push_word(&mut out, &text[start..idx], identifiers);
        }
        if ch != ' ' {
            out.push(ch);
        }
    }
    if let Some(start) = word_start {
        push_word(&mut out, &text[start..], identifiers);
    }
    out
}

/// Remove every space, keeping all other characters.
pub fn remove_spaces(text: &str) -> String {
    text.chars().filter(|&ch| ch != ' ').collect()
}

fn push_word(out: &mut String, word: &str, identifiers: &IdentifierSet) {
    if !identifiers.contains(word) {
        out.push_str(word);
    }
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
