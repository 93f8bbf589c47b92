//! The replacement decision for one word.

use lawyerify_types::{OverrideTable, PartOfSpeech, ReplacePolicy, SynonymSet, char_len};

/// What to do with every occurrence of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Rewrite occurrences to `replacement` (lowercase-initial form; casing is
    /// re-applied per occurrence). May equal the word itself.
    Replace {
        replacement: String,
        /// Category that supplied the winning candidate. `None` when the word
        /// itself or an override won.
        source: Option<PartOfSpeech>,
    },
    /// Synonyms span several parts of speech and strict ambiguity is on.
    Ambiguous { categories: usize },
}

/// Longest eligible candidate in one category's list.
///
/// Starts from `word` and only moves to strictly longer candidates, so the
/// first candidate to reach the maximum wins ties and nothing shorter than
/// the word is ever returned.
fn longest_in_category<'a>(word: &'a str, candidates: &'a [String], allow_multi_word: bool) -> &'a str {
    let mut longest = word;
    let mut longest_len = char_len(word);
    for candidate in candidates {
        if !allow_multi_word && candidate.contains(' ') {
            continue;
        }
        let len = char_len(candidate);
        if len > longest_len {
            longest = candidate;
            longest_len = len;
        }
    }
    longest
}

/// Decide the replacement for `word` (lowercase) given its synonyms.
///
/// 1. More than one category under strict ambiguity → [`Decision::Ambiguous`].
/// 2. Each category yields its longest eligible candidate.
/// 3. The longest of the word and those candidates wins; ties keep the
///    earliest in noun, verb, adjective, adverb order.
/// 4. An override entry for the word replaces the result unconditionally.
#[must_use]
pub fn decide(
    word: &str,
    synonyms: &SynonymSet,
    policy: &ReplacePolicy,
    overrides: &OverrideTable,
) -> Decision {
    if policy.strict_ambiguity && synonyms.is_ambiguous() {
        return Decision::Ambiguous {
            categories: synonyms.category_count(),
        };
    }

    let mut best = word;
    let mut best_len = char_len(word);
    let mut source = None;
    for (pos, candidates) in synonyms.iter() {
        let candidate = longest_in_category(word, candidates, policy.allow_multi_word);
        let len = char_len(candidate);
        if len > best_len {
            best = candidate;
            best_len = len;
            source = Some(pos);
        }
    }

    if let Some(forced) = overrides.get(word) {
        return Decision::Replace {
            replacement: forced.to_string(),
            source: None,
        };
    }

    Decision::Replace {
        replacement: best.to_string(),
        source,
    }
}
