//! Tuning knobs for the sender loop.

use std::time::Duration;

/// Default delay before the first resend of a failed batch.
pub const DEFAULT_BACKOFF_INITIAL: Duration = Duration::from_secs(1);
/// Default ceiling for the resend delay.
pub const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(60);
/// Default wait for another event while filling a batch.
pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(100);

/// Exponential backoff policy for resending a rejected batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: DEFAULT_BACKOFF_INITIAL,
            cap: DEFAULT_BACKOFF_CAP,
        }
    }
}

/// Options controlling batching and retry timing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderOptions {
    pub backoff: BackoffPolicy,
    pub coalesce_window: Duration,
}

impl Default for SenderOptions {
    fn default() -> Self {
        Self {
            backoff: BackoffPolicy::default(),
            coalesce_window: DEFAULT_COALESCE_WINDOW,
        }
    }
}

impl SenderOptions {
    /// Override the backoff policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }
}
