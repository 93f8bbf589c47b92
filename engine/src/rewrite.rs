//! Whole-word buffer rewriting.
//!
//! Rewrites only ever touch complete tokens (as produced by
//! [`tokenize`](crate::tokenize::tokenize)), never substrings, and never tokens
//! that contain an apostrophe: `happy` is rewritten but `happy's` is not.
//!
//! Every spelling of a word is matched case-insensitively. Each occurrence
//! takes the replacement capitalized if its own first letter is uppercase, and
//! lowercase-initial otherwise: `HAPPY` and `Happy` both become `Glad`.

use std::collections::HashMap;

use lawyerify_types::{capitalize, decapitalize};

use crate::tokenize::{Token, tokenize};

fn rewrite_with<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(&Token<'_>) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for token in tokenize(text) {
        if token.has_apostrophe() {
            continue;
        }
        if let Some(replacement) = replace(&token) {
            out.push_str(&text[last..token.start()]);
            out.push_str(&replacement);
            last = token.end();
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Replacement for one occurrence, cased by the occurrence's first letter.
fn cased_replacement(spelling: &str, replacement: &str) -> String {
    if spelling.chars().next().is_some_and(char::is_uppercase) {
        capitalize(replacement)
    } else {
        decapitalize(replacement)
    }
}

/// Rewrite every occurrence of `key` in the current `buffer`.
///
/// Earlier rewrites are visible: if `buffer` already contains text produced by
/// another word's replacement, it is matched like any other text.
#[must_use]
pub fn apply_word(buffer: &str, key: &str, replacement: &str) -> String {
    rewrite_with(buffer, |token| {
        token
            .as_str()
            .eq_ignore_ascii_case(key)
            .then(|| cased_replacement(token.as_str(), replacement))
    })
}

/// Rebuild `original` in one pass, each token replaced by its own decision.
///
/// Replacement text is never re-examined, so results do not chain.
#[must_use]
pub fn apply_all(original: &str, decisions: &HashMap<String, String>) -> String {
    rewrite_with(original, |token| {
        let replacement = decisions.get(&token.key())?;
        Some(cased_replacement(token.as_str(), replacement))
    })
}
