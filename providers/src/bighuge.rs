//! Big Huge Thesaurus (words.bighugelabs.com) API v2 client.
//!
//! `GET {base}/{api_key}/{word}/json`
//!
//! | Status | Meaning | Result |
//! |--------|---------|--------|
//! | 200 | Entry found | normalized [`SynonymSet`] |
//! | 303 | Alternate spelling suggested | `NotFound` |
//! | 404 | No entry | `NotFound` |
//! | 429 | Rate limited | `QuotaExceeded` |
//! | 500 | Usage exceeded or key inactive | `QuotaExceeded` |
//! | other | | `Transport` |

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::retry::{self, RetryConfig, RetryOutcome};
use crate::{LookupError, LookupFut, SynonymLookup, SynonymSet, wire};

/// API key for the thesaurus. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiKeyError {
    #[error("API key must not be empty")]
    Empty,
    #[error("API key must not contain '/' or whitespace")]
    InvalidCharacter,
}

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Result<Self, ApiKeyError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApiKeyError::Empty);
        }
        if trimmed.chars().any(|c| c == '/' || c.is_whitespace()) {
            return Err(ApiKeyError::InvalidCharacter);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

// Manual Debug impl to prevent leaking the key in logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BigHugeConfigError {
    #[error("invalid thesaurus base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("thesaurus base URL must be http or https: {0}")]
    UnsupportedScheme(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for [`BigHugeClient`].
///
/// ```rust
/// use lawyerify_providers::{ApiKey, BigHugeConfig};
///
/// let config = BigHugeConfig::new(ApiKey::new("0123abcd").unwrap())
///     .with_max_retries(1);
/// # let _ = config;
/// ```
#[derive(Debug, Clone)]
pub struct BigHugeConfig {
    api_key: ApiKey,
    base_url: String,
    request_timeout: Duration,
    retry: RetryConfig,
}

impl BigHugeConfig {
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: crate::BIGHUGE_API_BASE_URL.to_string(),
            request_timeout: crate::default_request_timeout(),
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry = self.retry.with_max_retries(max_retries);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }
}

pub struct BigHugeClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: ApiKey,
    retry: RetryConfig,
}

impl fmt::Debug for BigHugeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigHugeClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl BigHugeClient {
    pub fn new(config: BigHugeConfig) -> Result<Self, BigHugeConfigError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| BigHugeConfigError::InvalidUrl {
                url: config.base_url.clone(),
                source,
            })?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(BigHugeConfigError::UnsupportedScheme(config.base_url));
        }

        let client = crate::http_client_with_timeout(config.request_timeout)?;
        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            retry: config.retry,
        })
    }

    /// `{base}/{key}/{word}/json`, with each segment percent-encoded.
    fn entry_url(&self, word: &str) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments
                    .pop_if_empty()
                    .push(self.api_key.expose_secret())
                    .push(word)
                    .push("json");
            }
            Err(()) => return Err(LookupError::transport(word, "base URL cannot hold a path")),
        }
        Ok(url)
    }

    async fn fetch(&self, word: &str) -> Result<SynonymSet, LookupError> {
        let url = self.entry_url(word)?;
        let outcome = retry::send_with_retry(|| self.client.get(url.clone()), &self.retry).await;

        let response = match outcome {
            RetryOutcome::Success(resp) => resp,
            RetryOutcome::HttpError(resp) => return Err(classify_error(word, resp).await),
            RetryOutcome::ConnectionError { attempts, source } => {
                // reqwest errors embed the URL, which embeds the key.
                let source = source.without_url();
                tracing::debug!(word, attempts, error = %source, "Thesaurus lookup failed");
                return Err(LookupError::transport(
                    word,
                    format!("request failed after {attempts} attempts: {source}"),
                ));
            }
            RetryOutcome::NonRetryable(source) => {
                let source = source.without_url();
                tracing::debug!(word, error = %source, "Thesaurus lookup failed");
                return Err(LookupError::transport(word, source.to_string()));
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::transport(word, e.without_url().to_string()))?;
        let set = wire::parse_entry(&body).map_err(|e| {
            tracing::warn!(word, error = %e, "Unparseable thesaurus payload");
            LookupError::transport(word, e.to_string())
        })?;

        tracing::debug!(word, categories = set.category_count(), "Thesaurus entry found");
        Ok(set)
    }
}

async fn classify_error(word: &str, response: reqwest::Response) -> LookupError {
    let status = response.status();
    match status {
        StatusCode::NOT_FOUND | StatusCode::SEE_OTHER => {
            tracing::debug!(word, status = %status, "No thesaurus entry");
            LookupError::NotFound {
                word: word.to_string(),
            }
        }
        StatusCode::INTERNAL_SERVER_ERROR | StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!(word, status = %status, "Thesaurus quota exceeded");
            LookupError::QuotaExceeded {
                status: status.as_u16(),
            }
        }
        _ => {
            let body = crate::read_capped_error_body(response).await;
            tracing::warn!(word, status = %status, "Unexpected thesaurus status");
            LookupError::transport(word, format!("API error {status}: {body}"))
        }
    }
}

impl SynonymLookup for BigHugeClient {
    fn name(&self) -> &'static str {
        "bighugelabs"
    }

    fn lookup<'a>(&'a self, word: &'a str) -> LookupFut<'a> {
        Box::pin(self.fetch(word))
    }
}
