//! Fixed word-to-replacement exceptions that bypass the synonym comparison.

use crate::text::{capitalize, decapitalize};
use std::collections::HashMap;

/// Common words the length heuristic handles badly.
///
/// `None` keeps the word as-is; `Some(s)` forces `s`.
const BUILTIN_OVERRIDES: &[(&str, Option<&str>)] = &[
    ("he", None),
    ("a", None),
    ("is", None),
    ("s", None),
    ("was", None),
    ("an", None),
    ("it", None),
    ("are", None),
    ("his", None),
    ("at", None),
    ("or", None),
    ("by", None),
    ("but", None),
    ("other", None),
    ("said", Some("vocalized")),
    ("thing", None),
    ("many", Some("numerous")),
    ("who", None),
    ("has", None),
    ("day", None),
    ("may", None),
    ("any", None),
    ("new", Some("state-of-the-art")),
];

/// Word-form → replacement table.
///
/// Each entry is stored twice: once under the capitalized form with a
/// capitalized value, once under the decapitalized form with a decapitalized
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: HashMap<String, String>,
}

impl OverrideTable {
    /// Empty table; nothing is overridden.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table seeded with the built-in list.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (word, replacement) in BUILTIN_OVERRIDES {
            match replacement {
                Some(replacement) => table.set(word, replacement),
                None => table.keep(word),
            }
        }
        table
    }

    /// Force `word` to be replaced by `replacement` in both casings.
    pub fn set(&mut self, word: &str, replacement: &str) {
        self.entries
            .insert(capitalize(word), capitalize(replacement));
        self.entries
            .insert(decapitalize(word), decapitalize(replacement));
    }

    /// Pin `word` to itself so it is never altered.
    pub fn keep(&mut self, word: &str) {
        self.set(word, word);
    }

    #[must_use]
    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Number of stored keys (two per configured word in most cases).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Extend<(K, V)> for OverrideTable {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (word, replacement) in iter {
            self.set(word.as_ref(), replacement.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OverrideTable;

    #[test]
    fn builtin_keeps_pronouns() {
        let table = OverrideTable::builtin();
        assert_eq!(table.get("he"), Some("he"));
        assert_eq!(table.get("He"), Some("He"));
    }

    #[test]
    fn builtin_forces_replacements_in_both_cases() {
        let table = OverrideTable::builtin();
        assert_eq!(table.get("said"), Some("vocalized"));
        assert_eq!(table.get("Said"), Some("Vocalized"));
        assert_eq!(table.get("New"), Some("State-of-the-art"));
    }

    #[test]
    fn single_letter_word_has_two_keys() {
        let table = OverrideTable::builtin();
        assert!(table.contains("A"));
        assert!(table.contains("a"));
        assert!(table.contains("S"));
    }

    #[test]
    fn empty_table_has_no_entries() {
        let table = OverrideTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.get("he"), None);
    }

    #[test]
    fn user_entries_replace_builtin() {
        let mut table = OverrideTable::builtin();
        table.extend([("said", "declared")]);
        assert_eq!(table.get("said"), Some("declared"));
        assert_eq!(table.get("Said"), Some("Declared"));
    }

    #[test]
    fn keep_pins_word_to_itself() {
        let mut table = OverrideTable::empty();
        table.keep("Date");
        assert_eq!(table.get("date"), Some("date"));
        assert_eq!(table.get("Date"), Some("Date"));
        assert_eq!(table.len(), 2);
    }
}
