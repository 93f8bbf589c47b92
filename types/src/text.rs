//! Small pure text helpers.

/// Uppercase the first character of `word`, leaving the rest untouched.
///
/// Uses `char` boundaries, so a leading multi-byte letter is handled correctly.
/// A character whose uppercase form expands (e.g. `ß` → `SS`) expands here too.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character of `word`, leaving the rest untouched.
#[must_use]
pub fn decapitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Character length used when comparing synonyms.
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
