//! GET with retry and exponential backoff.
//!
//! Retries on 429 and 5xx gateway-ish statuses (500, 502, 503, 504) and on
//! transport errors. A numeric `Retry-After` header overrides the backoff, up to
//! `max_retry_after`.

use crate::domain::DomainError;
use crate::ports::{HttpPort, HttpResponse};
use std::time::Duration;
use tracing::warn;

const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Backoff for attempt `n` (0-based) is `base_delay * 2^n`.
    pub base_delay: Duration,
    /// Upper bound on a server-requested `Retry-After` wait.
    pub max_retry_after: Duration,
}

/// Longest `Retry-After` honoured by default.
pub const DEFAULT_MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 6,
            base_delay: Duration::from_secs(1),
            max_retry_after: DEFAULT_MAX_RETRY_AFTER,
        }
    }
}

impl RetryPolicy {
    /// No sleeping between attempts, `Retry-After` included. For tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_retry_after: Duration::ZERO,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Delay before the next attempt after a retryable status.
    fn delay_for(&self, response: &HttpResponse, attempt: u32) -> Duration {
        response
            .retry_after
            .as_deref()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| Duration::from_secs(secs).min(self.max_retry_after))
            .unwrap_or_else(|| self.backoff(attempt))
    }
}

pub fn is_retryable(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// GET `url` until a success response, a non-retryable status, or the attempt
/// budget runs out. Returns the successful response.
pub async fn get_with_retry(
    http: &dyn HttpPort,
    url: &str,
    query: &[(String, String)],
    policy: &RetryPolicy,
) -> Result<HttpResponse, DomainError> {
    let attempts = policy.max_retries.max(1);
    let mut last_status = None;

    for attempt in 0..attempts {
        match http.get(url, query).await {
            Ok(response) if is_retryable(response.status) => {
                let delay = policy.delay_for(&response, attempt);
                warn!(
                    url,
                    status = response.status,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited or server error, retrying"
                );
                last_status = Some(response.status);
                tokio::time::sleep(delay).await;
            }
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => {
                return Err(DomainError::Status {
                    status: response.status,
                    url: url.to_string(),
                });
            }
            Err(e) if attempt + 1 < attempts => {
                let delay = policy.backoff(attempt);
                warn!(url, error = %e, attempt = attempt + 1, "request failed, retrying");
                last_status = None;
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }

    match last_status {
        Some(status) => Err(DomainError::Status {
            status,
            url: url.to_string(),
        }),
        None => Err(DomainError::Http(format!("GET {} failed after {} attempts", url, attempts))),
    }
}
