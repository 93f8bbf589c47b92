//! One replacement run: dispatch, completion tracking, finalization.
//!
//! # Lifecycle
//!
//! ```text
//! Idle -> Dispatching -> Awaiting -> Finalizing -> Idle
//!                           |
//!                           +-- quota exceeded --> Interrupted (until reset)
//! ```
//!
//! Every distinct word (case-insensitive) gets exactly one lookup task. Tasks
//! report back over an mpsc channel to a single loop that owns [`RunState`],
//! so buffer mutations are serialized without locking. The outstanding counter
//! starts at the total token count; a settled lookup releases all of its
//! word's occurrences at once.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use lawyerify_providers::{LookupError, SynonymLookup};
use lawyerify_types::{
    OLD_TEXT_LABEL, OverrideTable, QUOTA_NOTICE, ReplacePolicy, SECTION_BREAK, SubstitutionMode,
    SynonymSet, TokenOutcome,
};
use tokio::sync::mpsc;

use crate::decision::{Decision, decide};
use crate::rewrite;
use crate::surface::{SurfaceError, TextSurface};
use crate::tokenize::tokenize;

/// Whether the trigger is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    /// The thesaurus refused further calls. Runs are refused until
    /// [`Replacer::reset`].
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Dispatching,
    Awaiting,
    Finalizing,
    Interrupted,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("a run is already in progress")]
    Busy,
    #[error("the thesaurus quota is exhausted; reset the session before starting another run")]
    Interrupted,
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Per-outcome occurrence counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    counts: HashMap<TokenOutcome, usize>,
}

impl OutcomeTally {
    fn record(&mut self, outcome: TokenOutcome, occurrences: usize) {
        *self.counts.entry(outcome).or_default() += occurrences;
    }

    #[must_use]
    pub fn get(&self, outcome: TokenOutcome) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl fmt::Display for OutcomeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for outcome in [
            TokenOutcome::Replaced,
            TokenOutcome::Skipped,
            TokenOutcome::NotFound,
            TokenOutcome::TransportFailure,
            TokenOutcome::AmbiguousSkipped,
            TokenOutcome::QuotaExceeded,
        ] {
            let count = self.get(outcome);
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{outcome}={count}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every lookup settled.
    Completed,
    /// Stopped early on a quota refusal.
    Interrupted,
}

/// Result of one run, as presented to the surface.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    /// Text written to the surface, including the appendix.
    pub text: String,
    /// Rewritten text without the appendix.
    pub rewritten: String,
    pub tally: OutcomeTally,
    /// Number of lookups issued (distinct words).
    pub lookups: usize,
}

impl RunReport {
    /// Fixed notice for the user when the run was interrupted.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        match self.status {
            RunStatus::Interrupted => Some(QUOTA_NOTICE),
            RunStatus::Completed => None,
        }
    }
}

/// Distinct words of one text, in first-seen order, with occurrence counts.
struct LookupPlan {
    tokens: usize,
    skipped: usize,
    order: Vec<String>,
    occurrences: HashMap<String, usize>,
}

impl LookupPlan {
    fn from_text(text: &str) -> Self {
        let tokens = tokenize(text);
        let mut plan = Self {
            tokens: tokens.len(),
            skipped: 0,
            order: Vec::new(),
            occurrences: HashMap::new(),
        };
        for token in &tokens {
            if token.has_apostrophe() {
                plan.skipped += 1;
                continue;
            }
            let key = token.key();
            match plan.occurrences.get_mut(&key) {
                Some(count) => *count += 1,
                None => {
                    plan.order.push(key.clone());
                    plan.occurrences.insert(key, 1);
                }
            }
        }
        plan
    }
}

struct Completion {
    key: String,
    occurrences: usize,
    result: Result<SynonymSet, LookupError>,
}

/// Working state owned by the completion loop.
struct RunState {
    original: String,
    buffer: String,
    decisions: HashMap<String, String>,
    outstanding: usize,
    tally: OutcomeTally,
    phase: RunPhase,
    policy: ReplacePolicy,
}

impl RunState {
    fn new(original: String, outstanding: usize, policy: ReplacePolicy) -> Self {
        Self {
            buffer: original.clone(),
            original,
            decisions: HashMap::new(),
            outstanding,
            tally: OutcomeTally::default(),
            phase: RunPhase::Dispatching,
            policy,
        }
    }

    /// Release `occurrences` from the counter. True when nothing is left.
    fn settle(&mut self, outcome: TokenOutcome, occurrences: usize) -> bool {
        self.tally.record(outcome, occurrences);
        self.outstanding = self.outstanding.saturating_sub(occurrences);
        self.outstanding == 0
    }

    fn commit(&mut self, key: &str, replacement: &str) {
        match self.policy.mode {
            SubstitutionMode::Chained => {
                self.buffer = rewrite::apply_word(&self.buffer, key, replacement);
            }
            SubstitutionMode::OriginalOnly => {
                self.decisions
                    .insert(key.to_string(), replacement.to_string());
            }
        }
    }

    /// Classify a completion and apply it. Does not touch the counter.
    fn apply(&mut self, completion: &Completion, overrides: &OverrideTable) -> TokenOutcome {
        let key = completion.key.as_str();
        match &completion.result {
            Ok(set) => match decide(key, set, &self.policy, overrides) {
                Decision::Replace {
                    replacement,
                    source,
                } => {
                    tracing::debug!(
                        word = key,
                        replacement = %replacement,
                        source = ?source,
                        "Committing replacement"
                    );
                    self.commit(key, &replacement);
                    TokenOutcome::Replaced
                }
                Decision::Ambiguous { categories } => {
                    tracing::debug!(word = key, categories, "Skipping ambiguous word");
                    TokenOutcome::AmbiguousSkipped
                }
            },
            Err(LookupError::NotFound { .. }) => TokenOutcome::NotFound,
            Err(LookupError::QuotaExceeded { .. }) => TokenOutcome::QuotaExceeded,
            Err(err @ LookupError::Transport { .. }) => {
                tracing::debug!(word = key, error = %err, "Lookup failed; leaving word unchanged");
                TokenOutcome::TransportFailure
            }
        }
    }

    fn rewritten(&self) -> String {
        match self.policy.mode {
            SubstitutionMode::Chained => self.buffer.clone(),
            SubstitutionMode::OriginalOnly => rewrite::apply_all(&self.original, &self.decisions),
        }
    }

    fn with_old_text(&self, rewritten: &str) -> String {
        format!("{rewritten}{SECTION_BREAK}{OLD_TEXT_LABEL}{}", self.original)
    }

    fn report(&self, status: RunStatus, lookups: usize) -> RunReport {
        let rewritten = self.rewritten();
        let mut text = self.with_old_text(&rewritten);
        if status == RunStatus::Interrupted {
            text.push_str(SECTION_BREAK);
            text.push(' ');
            text.push_str(QUOTA_NOTICE);
        }
        RunReport {
            status,
            text,
            rewritten,
            tally: self.tally.clone(),
            lookups,
        }
    }
}

/// Sets the session state when a run ends, including on early return.
struct RunGuard<'a> {
    state: &'a Mutex<SessionState>,
    end_state: SessionState,
}

impl RunGuard<'_> {
    fn interrupt(&mut self) {
        self.end_state = SessionState::Interrupted;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = self.end_state;
    }
}

/// A replacement session: lookup source, overrides, current toggles, and the
/// trigger state.
pub struct Replacer {
    lookup: Arc<dyn SynonymLookup>,
    overrides: Arc<OverrideTable>,
    policy: Mutex<ReplacePolicy>,
    state: Mutex<SessionState>,
}

impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replacer")
            .field("lookup", &self.lookup.name())
            .field("overrides", &self.overrides.len())
            .field("policy", &self.policy())
            .field("state", &self.state())
            .finish()
    }
}

impl Replacer {
    /// Session with the built-in override table and default toggles.
    pub fn new(lookup: Arc<dyn SynonymLookup>) -> Self {
        Self {
            lookup,
            overrides: Arc::new(OverrideTable::builtin()),
            policy: Mutex::new(ReplacePolicy::default()),
            state: Mutex::new(SessionState::Idle),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = Arc::new(overrides);
        self
    }

    #[must_use]
    pub fn with_policy(self, policy: ReplacePolicy) -> Self {
        self.set_policy(policy);
        self
    }

    /// Change the toggles. Takes effect at the next run.
    pub fn set_policy(&self, policy: ReplacePolicy) {
        *self.policy.lock().unwrap_or_else(PoisonError::into_inner) = policy;
    }

    #[must_use]
    pub fn policy(&self) -> ReplacePolicy {
        *self.policy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Leave the interrupted state so the trigger works again.
    ///
    /// Returns false if there was nothing to reset.
    pub fn reset(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == SessionState::Interrupted {
            *state = SessionState::Idle;
            true
        } else {
            false
        }
    }

    fn begin(&self) -> Result<RunGuard<'_>, RunError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            SessionState::Idle => {
                *state = SessionState::Running;
                Ok(RunGuard {
                    state: &self.state,
                    end_state: SessionState::Idle,
                })
            }
            SessionState::Running => Err(RunError::Busy),
            SessionState::Interrupted => Err(RunError::Interrupted),
        }
    }

    /// Run once over the surface's text and write the result back.
    ///
    /// Must be called from within a tokio runtime: lookups are spawned as
    /// tasks. Returns after the last lookup settles, or immediately after a
    /// quota refusal; lookups still in flight at that point are drained in the
    /// background and never touch the surface.
    pub async fn run(&self, surface: &mut dyn TextSurface) -> Result<RunReport, RunError> {
        let mut guard = self.begin()?;
        let policy = self.policy();
        let original = surface.text()?;

        let plan = LookupPlan::from_text(&original);
        let lookups = plan.order.len();
        tracing::info!(
            tokens = plan.tokens,
            distinct = lookups,
            skipped = plan.skipped,
            mode = %policy.mode,
            strict_ambiguity = policy.strict_ambiguity,
            allow_multi_word = policy.allow_multi_word,
            source = self.lookup.name(),
            "Run started"
        );

        let mut state = RunState::new(original, plan.tokens, policy);
        if plan.skipped > 0 && state.settle(TokenOutcome::Skipped, plan.skipped) {
            return finalize(&mut state, surface, lookups);
        }
        if plan.tokens == 0 {
            return finalize(&mut state, surface, lookups);
        }

        let mut rx = self.dispatch(plan, policy.lookup_timeout);
        state.phase = RunPhase::Awaiting;

        while let Some(completion) = rx.recv().await {
            let outcome = state.apply(&completion, &self.overrides);
            let done = state.settle(outcome, completion.occurrences);

            if outcome.is_fatal() {
                state.phase = RunPhase::Interrupted;
                guard.interrupt();
                tracing::warn!(
                    word = %completion.key,
                    outstanding = state.outstanding,
                    "Thesaurus quota exceeded; abandoning run"
                );
                let report = state.report(RunStatus::Interrupted, lookups);
                surface.set_text(&report.text)?;
                tokio::spawn(drain_late_completions(
                    rx,
                    state,
                    Arc::clone(&self.overrides),
                ));
                return Ok(report);
            }

            if done {
                return finalize(&mut state, surface, lookups);
            }
        }

        // Every sender is gone but the counter is not zero: a lookup task
        // ended without reporting.
        tracing::warn!(
            outstanding = state.outstanding,
            "Lookup tasks ended without reporting; finalizing anyway"
        );
        let remaining = state.outstanding;
        state.settle(TokenOutcome::TransportFailure, remaining);
        finalize(&mut state, surface, lookups)
    }

    fn dispatch(&self, plan: LookupPlan, timeout: Option<Duration>) -> mpsc::Receiver<Completion> {
        let LookupPlan {
            order,
            mut occurrences,
            ..
        } = plan;
        let (tx, rx) = mpsc::channel(order.len().max(1));
        for key in order {
            let occurrences = occurrences.remove(&key).unwrap_or(1);
            let lookup = Arc::clone(&self.lookup);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = lookup_with_timeout(lookup.as_ref(), &key, timeout).await;
                // The receiver is gone only if the run was abandoned.
                let _ = tx
                    .send(Completion {
                        key,
                        occurrences,
                        result,
                    })
                    .await;
            });
        }
        rx
    }
}

fn finalize(
    state: &mut RunState,
    surface: &mut dyn TextSurface,
    lookups: usize,
) -> Result<RunReport, RunError> {
    state.phase = RunPhase::Finalizing;
    let report = state.report(RunStatus::Completed, lookups);
    surface.set_text(&report.text)?;
    tracing::info!(lookups, outcomes = %report.tally, "Run finished");
    Ok(report)
}

async fn lookup_with_timeout(
    lookup: &dyn SynonymLookup,
    word: &str,
    timeout: Option<Duration>,
) -> Result<SynonymSet, LookupError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, lookup.lookup(word))
            .await
            .unwrap_or_else(|_| {
                Err(LookupError::transport(
                    word,
                    format!("no answer within {}ms", limit.as_millis()),
                ))
            }),
        None => lookup.lookup(word).await,
    }
}

/// Apply lookups that land after a quota refusal.
///
/// They mutate the abandoned run's buffer only; nothing is presented.
async fn drain_late_completions(
    mut rx: mpsc::Receiver<Completion>,
    mut state: RunState,
    overrides: Arc<OverrideTable>,
) {
    debug_assert_eq!(state.phase, RunPhase::Interrupted);
    let mut late = 0usize;
    while let Some(completion) = rx.recv().await {
        let outcome = state.apply(&completion, &overrides);
        state.settle(outcome, completion.occurrences);
        late += 1;
    }
    tracing::debug!(
        late,
        outstanding = state.outstanding,
        "Drained lookups after quota interruption"
    );
}
