//! Word extraction.
//!
//! A token is a maximal run of ASCII letters with at most one internal
//! apostrophe: `\b[A-Za-z]+'?[A-Za-z]*\b`.

use std::sync::OnceLock;

use regex::Regex;

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z]+'?[A-Za-z]*\b").expect("valid word regex"))
}

/// One word occurrence in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    text: &'a str,
    start: usize,
}

impl<'a> Token<'a> {
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the token in the source text.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Tokens with an apostrophe are never looked up.
    #[must_use]
    pub fn has_apostrophe(&self) -> bool {
        self.text.contains('\'')
    }

    /// Lookup identity: `Happy` and `happy` share a key.
    #[must_use]
    pub fn key(&self) -> String {
        self.text.to_ascii_lowercase()
    }
}

/// All token occurrences in order, duplicates included.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    word_regex()
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            start: m.start(),
        })
        .collect()
}
