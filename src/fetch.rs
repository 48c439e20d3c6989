//! Career-page fetching with exponential backoff retry logic.
//!
//! This module provides the "fetch document by URL" capability the scan
//! pipeline consumes. It is split the same way as any decorated client:
//! - [`FetchDocument`]: Core trait, one URL in, raw markup out
//! - [`HttpFetcher`]: `reqwest`-backed implementation with polite headers
//! - [`RetryPolicy`] + [`fetch_with_backoff`]: Retry loop driven by an
//!   explicit policy value passed per call
//!
//! # Retry Strategy
//!
//! - Only [`FetchError::Transient`] failures are retried
//! - Exponential backoff starting at `base_delay`, capped at `max_delay`
//! - Random jitter (0..=`jitter`) added to each delay
//! - Gives up after `max_attempts` total attempts

use rand::{Rng, rng};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::{Duration as StdDuration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Why a page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network, timeout, 5xx or 429 failures. Worth retrying.
    #[error("transient failure fetching {url}: {message}")]
    Transient { url: String, message: String },

    /// Client errors and bad URLs. Retrying will not help.
    #[error("failed to fetch {url}: {message}")]
    Permanent { url: String, message: String },

    /// The response arrived but holds nothing that can be parsed as markup.
    #[error("malformed document at {url}: {reason}")]
    MalformedDocument { url: String, reason: String },
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(url: &str, status: StatusCode) -> Self {
        let message = format!("HTTP {status}");
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            FetchError::Transient { url: url.to_string(), message }
        } else {
            FetchError::Permanent { url: url.to_string(), message }
        }
    }

    fn from_reqwest(url: &str, e: &reqwest::Error) -> Self {
        let message = e.to_string();
        if e.is_builder() {
            FetchError::Permanent { url: url.to_string(), message }
        } else {
            FetchError::Transient { url: url.to_string(), message }
        }
    }
}

/// Anything that can turn a URL into raw markup.
///
/// The scan pipeline only depends on this trait, so tests substitute an
/// in-memory implementation for the network.
pub trait FetchDocument {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Retry schedule for a single fetch call.
///
/// The delay before retry `n` (1-based) follows:
/// ```text
/// delay = min(base_delay * 2^(n-1), max_delay) + random_jitter(0..=jitter)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Always at least 1.
    pub max_attempts: usize,
    pub base_delay: StdDuration,
    pub max_delay: StdDuration,
    pub jitter: StdDuration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: StdDuration::from_secs(1),
            max_delay: StdDuration::from_secs(8),
            jitter: StdDuration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the given retry, without jitter.
    pub fn delay_for(&self, retry: usize) -> StdDuration {
        let shift = retry.saturating_sub(1).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    fn jittered_delay_for(&self, retry: usize) -> StdDuration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms == 0 {
            0
        } else {
            rng().random_range(0..=jitter_ms)
        };
        self.delay_for(retry) + StdDuration::from_millis(extra)
    }
}

/// Fetch `url`, retrying transient failures according to `policy`.
///
/// # Returns
///
/// The page body, or the last error once attempts are exhausted. Permanent
/// and malformed-document errors are returned on first sight.
#[instrument(level = "info", skip(fetcher, policy), fields(max_attempts = policy.max_attempts))]
pub async fn fetch_with_backoff<F: FetchDocument>(
    fetcher: &F,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, FetchError> {
    let total_t0 = Instant::now();
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0usize;

    loop {
        let attempt_t0 = Instant::now();
        attempt += 1;
        match fetcher.fetch(url).await {
            Ok(body) => {
                debug!(attempt, bytes = body.len(), "fetch succeeded");
                return Ok(body);
            }
            Err(e) if !e.is_transient() => {
                error!(attempt, error = %e, "fetch failed permanently");
                return Err(e);
            }
            Err(e) => {
                let attempt_dt = attempt_t0.elapsed();
                let total_dt = total_t0.elapsed();

                if attempt >= max_attempts {
                    error!(
                        attempt,
                        max = max_attempts,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        error = %e,
                        "fetch exhausted retries"
                    );
                    return Err(e);
                }

                let delay = policy.jittered_delay_for(attempt);
                warn!(
                    attempt,
                    max = max_attempts,
                    elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                    ?delay,
                    error = %e,
                    "fetch attempt failed; backing off"
                );
                sleep(delay).await;
            }
        }
    }
}

/// `reqwest`-backed fetcher that identifies itself on every request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the given identifying headers and request timeout.
    pub fn new(
        user_agent: &str,
        accept_language: &str,
        timeout: StdDuration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(accept_language)?);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchDocument for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "non-success status");
            return Err(FetchError::from_status(url, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;
        if body.trim().is_empty() {
            return Err(FetchError::MalformedDocument {
                url: url.to_string(),
                reason: "empty response body".to_string(),
            });
        }
        debug!(bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "fetched page");
        Ok(body)
    }
}
