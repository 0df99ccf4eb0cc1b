//! Process-wide call pacing.
//!
//! One gate instance spans all providers and all concurrently-handled
//! requests. The caller sleeps *while holding the lock*, so upstream call
//! starts are fully serialized, never merely spaced. That turns all AI calls
//! into a single logical queue, which is exactly what keeps upstream burst
//! limits from being breached.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Shared pacing primitive serializing the start of upstream calls.
pub struct ThrottleGate {
    min_interval: Duration,
    last_call_at: Mutex<Option<Instant>>,
}

impl ThrottleGate {
    /// A zero `min_interval` disables pacing entirely.
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval, last_call_at: Mutex::new(None) }
    }

    /// Block until at least `min_interval` has passed since the previous
    /// release. `last_call_at` is stamped at release time, not at call
    /// completion.
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last = self.last_call_at.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
