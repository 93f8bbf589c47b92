//! Synonym candidates grouped by grammatical category.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Grammatical categories recognized by the replacement decision.
///
/// Declaration order is the enumeration order used for tie-breaking:
/// noun, verb, adjective, adverb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    /// Every recognized category, in tie-break order.
    pub const ALL: [PartOfSpeech; 4] = [Self::Noun, Self::Verb, Self::Adjective, Self::Adverb];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate synonyms for one word, keyed by category.
///
/// A category that is present with an empty list still counts as present:
/// it contributes to ambiguity but never to the chosen replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymSet {
    categories: BTreeMap<PartOfSpeech, Vec<String>>,
}

impl SynonymSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Extends the list if the category is already present.
    #[must_use]
    pub fn with<I, S>(mut self, pos: PartOfSpeech, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(pos, synonyms);
        self
    }

    pub fn insert<I, S>(&mut self, pos: PartOfSpeech, synonyms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .entry(pos)
            .or_default()
            .extend(synonyms.into_iter().map(Into::into));
    }

    /// Categories present, in enumeration order.
    pub fn categories(&self) -> impl Iterator<Item = PartOfSpeech> + '_ {
        self.categories.keys().copied()
    }

    /// Category/candidate pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (PartOfSpeech, &[String])> + '_ {
        self.categories
            .iter()
            .map(|(pos, list)| (*pos, list.as_slice()))
    }

    #[must_use]
    pub fn get(&self, pos: PartOfSpeech) -> Option<&[String]> {
        self.categories.get(&pos).map(Vec::as_slice)
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.categories.len() > 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
