//! Rate-limit retry policy.
//!
//! Applies only around the Groq adapter. A 429 is retried up to a configured
//! bound; a server-supplied `Retry-After` hint is honored exactly, otherwise
//! the delay backs off exponentially from 900 ms, capped at 5 s. Any other
//! error surfaces immediately, and exhausting retries surfaces the last
//! upstream error unchanged.

use crate::proxy::adapters::ProviderAdapter;
use crate::proxy::throttle::ThrottleGate;
use grperform_types::{CanonicalResponse, ChatRequest, ProxyError};
use std::time::Duration;
use tracing::warn;

pub const BACKOFF_BASE_MS: u64 = 900;
pub const BACKOFF_MAX_MS: u64 = 5000;

/// Delay before the retry at `attempt` (0-based). The `Retry-After` hint,
/// when present, overrides the exponential schedule.
pub fn backoff_delay(attempt: u32, retry_after_secs: Option<f64>) -> Duration {
    if let Some(secs) = retry_after_secs {
        return Duration::from_millis((secs * 1000.0) as u64);
    }
    let backoff = BACKOFF_BASE_MS.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(backoff.min(BACKOFF_MAX_MS))
}

/// Invoke `adapter` with bounded 429 retries. The throttle gate is reacquired
/// before every physical attempt, so retries count against the process-wide
/// pacing like any other upstream call.
pub async fn call_with_429_retry(
    adapter: &dyn ProviderAdapter,
    gate: &ThrottleGate,
    request: &ChatRequest,
    max_retries: u32,
) -> Result<CanonicalResponse, ProxyError> {
    let mut attempt = 0u32;
    loop {
        gate.acquire().await;

        let err = match adapter.call(request).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        let retry_after_secs = match &err {
            ProxyError::Upstream { status: 429, retry_after_secs, .. } if attempt < max_retries => {
                *retry_after_secs
            }
            _ => return Err(err),
        };

        let delay = backoff_delay(attempt, retry_after_secs);
        warn!(
            provider = %adapter.kind(),
            attempt = attempt + 1,
            max_retries,
            delay_ms = delay.as_millis() as u64,
            from_header = retry_after_secs.is_some(),
            "rate limited (429), backing off before retry"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
