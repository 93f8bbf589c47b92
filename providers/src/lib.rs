//! Thesaurus lookup clients.
//!
//! # Architecture
//!
//! Every source implements [`SynonymLookup`]: given a lowercase word, produce a
//! [`SynonymSet`] or a [`LookupError`]. Sources normalize their own payload
//! shapes at this boundary so the replacement engine only ever sees one
//! canonical "candidate list per category" form.
//!
//! - [`bighuge`] - Big Huge Thesaurus HTTP API client
//! - [`static_source`] - In-memory / JSON file thesaurus for offline use
//! - [`wire`] - Payload normalization shared by both
//! - [`retry`] - Backoff policy for transient HTTP failures
//!
//! # Error Handling
//!
//! [`LookupError`] distinguishes the three failure kinds the engine reacts to
//! differently: a missing entry, a quota refusal, and a transport failure.

pub mod bighuge;
pub mod retry;
pub mod static_source;
pub mod wire;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use bighuge::{ApiKey, ApiKeyError, BigHugeClient, BigHugeConfig, BigHugeConfigError};
pub use lawyerify_types;
use lawyerify_types::SynonymSet;
pub use static_source::{StaticThesaurus, StaticThesaurusError};

/// Canonical Big Huge Thesaurus API v2 base URL.
pub const BIGHUGE_API_BASE_URL: &str = "https://words.bighugelabs.com/api/2";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const TCP_KEEPALIVE_SECS: u64 = 60;

// A run issues one request per distinct word, all at once.
const POOL_MAX_IDLE_PER_HOST: usize = 100;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Lookup future type alias.
pub type LookupFut<'a> = Pin<Box<dyn Future<Output = Result<SynonymSet, LookupError>> + Send + 'a>>;

/// Why a lookup produced no synonyms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no thesaurus entry for {word:?}")]
    NotFound { word: String },
    #[error("thesaurus quota exceeded (HTTP {status})")]
    QuotaExceeded { status: u16 },
    #[error("lookup for {word:?} failed: {message}")]
    Transport { word: String, message: String },
}

impl LookupError {
    pub fn transport(word: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            word: word.to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// A source of synonyms.
///
/// Implementations must be shareable across tasks: the engine calls `lookup`
/// concurrently for every distinct word in a run.
pub trait SynonymLookup: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Look up `word` (already lowercased by the caller).
    fn lookup<'a>(&'a self, word: &'a str) -> LookupFut<'a>;
}

fn base_client_builder() -> reqwest::ClientBuilder {
    use reqwest::header::{HeaderMap, HeaderValue};

    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    reqwest::Client::builder()
        .user_agent(concat!("lawyerify/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        // 303 "see other" from the thesaurus means an alternate spelling; treat
        // it as a final answer rather than following it.
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

pub fn http_client_with_timeout(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder().timeout(timeout).build()
}

pub fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    let Ok(bytes) = response.bytes().await else {
        return String::new();
    };
    if bytes.len() > MAX_ERROR_BODY_BYTES {
        let text = String::from_utf8_lossy(&bytes[..MAX_ERROR_BODY_BYTES]);
        return format!("{text}...(truncated)");
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::LookupError;

    #[test]
    fn quota_is_distinguishable_from_not_found() {
        let quota = LookupError::QuotaExceeded { status: 500 };
        let missing = LookupError::NotFound {
            word: "zzz".to_string(),
        };
        assert!(quota.is_quota());
        assert!(!missing.is_quota());
        assert!(!LookupError::transport("dog", "reset").is_quota());
    }

    #[test]
    fn error_messages_name_the_word() {
        let err = LookupError::transport("dog", "connection reset");
        assert_eq!(
            err.to_string(),
            "lookup for \"dog\" failed: connection reset"
        );
    }
}
