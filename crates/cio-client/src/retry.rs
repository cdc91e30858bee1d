//! Exponential backoff for transient API failures.
//!
//! The client never retries on its own. Callers opt in through
//! [`CioClient::execute_with_retry`](crate::client::CioClient::execute_with_retry),
//! which signs every attempt afresh: an OAuth nonce must not be reused.

use std::time::Duration;

use rand::Rng;

use crate::error::ClientError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3).
    pub max_retries: u32,
    /// Base delay between retries (default: 1 second).
    pub base_delay: Duration,
    /// Maximum delay between retries (default: 30 seconds).
    pub max_delay: Duration,
    /// Jitter factor: random 0..jitter_fraction of the delay is added (default: 0.25).
    pub jitter_fraction: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter_fraction: 0.25,
        }
    }
}

/// Whether a failed call is worth repeating.
///
/// Network failures, timeouts, throttling (429) and gateway-style 5xx
/// responses are transient. Auth rejections and other 4xx are not.
pub fn is_retryable(err: &ClientError) -> bool {
    match err {
        ClientError::Timeout | ClientError::Transport(_) | ClientError::Http(_) => true,
        ClientError::Server { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
        _ => false,
    }
}

/// Delay before retry `attempt` (0-indexed): `min(base * 2^n, max)` plus up
/// to `jitter_fraction` of that again.
pub fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exp = 2u64.saturating_pow(attempt);
    let base_ms = config.base_delay.as_millis() as u64;
    let capped_ms = base_ms
        .saturating_mul(exp)
        .min(config.max_delay.as_millis() as u64);

    let jitter_max_ms = (capped_ms as f64 * config.jitter_fraction) as u64;
    let jitter_ms = if jitter_max_ms > 0 {
        rand::thread_rng().gen_range(0..=jitter_max_ms)
    } else {
        0
    };

    Duration::from_millis(capped_ms + jitter_ms)
}
