//! Core domain types for Lawyerify.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod overrides;
mod synonyms;
pub mod text;

pub use overrides::OverrideTable;
pub use synonyms::{PartOfSpeech, SynonymSet};
pub use text::{capitalize, char_len, decapitalize};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// User-facing text
// ============================================================================

/// Shown when the thesaurus service refuses further lookups for the period.
pub const QUOTA_NOTICE: &str = "Sorry! The thesaurus only allows a certain number of synonym \
lookups per day. No more words can be lawyerified today. Trying again tomorrow will probably \
work (unless the daily number of allowed calls is exceeded again).";

/// Separates the rewritten text from the appendix sections.
pub const SECTION_BREAK: &str = "\n\n\n";

/// Label that introduces the verbatim original text.
pub const OLD_TEXT_LABEL: &str = "OLD TEXT: ";

// ============================================================================
// Policy
// ============================================================================

/// How committed replacements interact with each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
    /// Every commit rewrites the live buffer in completion order. A replacement
    /// that produces another looked-up word can be rewritten again.
    #[default]
    Chained,
    /// Decisions are collected and applied to the original text in one pass.
    /// Output does not depend on lookup completion order.
    OriginalOnly,
}

impl SubstitutionMode {
    pub fn parse(raw: &str) -> Result<Self, PolicyParseError> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "chained" | "chain" => Ok(Self::Chained),
            "original_only" | "original" => Ok(Self::OriginalOnly),
            _ => Err(PolicyParseError::UnknownMode(raw.to_string())),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chained => "chained",
            Self::OriginalOnly => "original_only",
        }
    }
}

impl fmt::Display for SubstitutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyParseError {
    #[error("unknown substitution mode: {0:?} (expected \"chained\" or \"original_only\")")]
    UnknownMode(String),
}

/// Toggles read at the start of each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacePolicy {
    /// Skip words whose synonyms span more than one part of speech.
    pub strict_ambiguity: bool,
    /// Allow synonyms that contain a space.
    pub allow_multi_word: bool,
    pub mode: SubstitutionMode,
    /// Upper bound on a single lookup. `None` waits indefinitely.
    pub lookup_timeout: Option<Duration>,
}

impl Default for ReplacePolicy {
    fn default() -> Self {
        Self {
            strict_ambiguity: true,
            allow_multi_word: true,
            mode: SubstitutionMode::Chained,
            lookup_timeout: None,
        }
    }
}

// ============================================================================
// Per-token outcomes
// ============================================================================

/// What happened to one token occurrence during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenOutcome {
    /// A decision was committed (possibly to the same word).
    Replaced,
    /// Token contains an apostrophe and was never looked up.
    Skipped,
    /// The thesaurus has no entry for the word.
    NotFound,
    /// The lookup could not complete.
    TransportFailure,
    /// More than one part of speech under strict ambiguity.
    AmbiguousSkipped,
    /// The thesaurus refused further calls for the period.
    QuotaExceeded,
}

impl TokenOutcome {
    /// Only quota exhaustion ends a run early.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::QuotaExceeded)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replaced => "replaced",
            Self::Skipped => "skipped",
            Self::NotFound => "not_found",
            Self::TransportFailure => "transport_failure",
            Self::AmbiguousSkipped => "ambiguous_skipped",
            Self::QuotaExceeded => "quota_exceeded",
        }
    }
}

impl fmt::Display for TokenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{ReplacePolicy, SubstitutionMode, TokenOutcome};

    #[test]
    fn default_policy_is_strict_and_allows_spaces() {
        let policy = ReplacePolicy::default();
        assert!(policy.strict_ambiguity);
        assert!(policy.allow_multi_word);
        assert_eq!(policy.mode, SubstitutionMode::Chained);
        assert!(policy.lookup_timeout.is_none());
    }

    #[test]
    fn substitution_mode_parse_aliases() {
        assert_eq!(
            SubstitutionMode::parse("chained").unwrap(),
            SubstitutionMode::Chained
        );
        assert_eq!(
            SubstitutionMode::parse("Original-Only").unwrap(),
            SubstitutionMode::OriginalOnly
        );
        assert_eq!(
            SubstitutionMode::parse(" original ").unwrap(),
            SubstitutionMode::OriginalOnly
        );
        assert!(SubstitutionMode::parse("random").is_err());
    }

    #[test]
    fn substitution_mode_serde_snake_case() {
        let mode: SubstitutionMode = serde_json::from_str("\"original_only\"").unwrap();
        assert_eq!(mode, SubstitutionMode::OriginalOnly);
    }

    #[test]
    fn only_quota_is_fatal() {
        assert!(TokenOutcome::QuotaExceeded.is_fatal());
        for outcome in [
            TokenOutcome::Replaced,
            TokenOutcome::Skipped,
            TokenOutcome::NotFound,
            TokenOutcome::TransportFailure,
            TokenOutcome::AmbiguousSkipped,
        ] {
            assert!(!outcome.is_fatal(), "{outcome} should not be fatal");
        }
    }
}
