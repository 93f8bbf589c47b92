//! Replacement engine for Lawyerify.
//!
//! Takes the text from a [`TextSurface`], looks up every distinct word through
//! a [`SynonymLookup`](lawyerify_providers::SynonymLookup), and writes back the
//! text with each word swapped for its longest acceptable synonym, followed by
//! the untouched original.
//!
//! - [`tokenize`] - Word extraction
//! - [`decision`] - Per-word replacement choice
//! - [`rewrite`] - Whole-word, case-preserving buffer edits
//! - [`run`] - The [`Replacer`] session and its run lifecycle
//! - [`surface`] - The editable text abstraction

pub mod decision;
pub mod rewrite;
pub mod run;
pub mod surface;
pub mod tokenize;

pub use decision::{Decision, decide};
pub use lawyerify_providers::{self, LookupError, SynonymLookup};
pub use lawyerify_types::{
    OverrideTable, PartOfSpeech, QUOTA_NOTICE, ReplacePolicy, SubstitutionMode, SynonymSet,
    TokenOutcome,
};
pub use run::{OutcomeTally, Replacer, RunError, RunReport, RunStatus, SessionState};
pub use surface::{MemorySurface, SurfaceError, TextSurface};
pub use tokenize::{Token, tokenize};
