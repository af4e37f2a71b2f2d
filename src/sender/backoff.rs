//! Exponential backoff state for one failing batch.

use std::time::Duration;

use super::config::BackoffPolicy;

/// Produces the wait before each resend of the same payload.
///
/// The first wait equals the policy's initial delay; each further wait
/// doubles until it reaches the cap, where it stays. A fresh state is used
/// for every batch.
#[derive(Debug)]
pub struct BackoffState {
    policy: BackoffPolicy,
    current: Option<Duration>,
}

impl BackoffState {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            current: None,
        }
    }

    /// Delay to wait after another consecutive failure.
    pub fn next_sleep(&mut self) -> Duration {
        let next = match self.current {
            None => self.policy.initial,
            Some(current) => current.saturating_mul(2),
        }
        .min(self.policy.cap);
        self.current = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn default_policy_doubles_and_pins_at_cap() {
        let mut state = BackoffState::new(BackoffPolicy::default());
        let waits: Vec<u64> = (0..9).map(|_| state.next_sleep().as_secs()).collect();
        assert_eq!(waits, [1, 2, 4, 8, 16, 32, 60, 60, 60]);
    }

    #[rstest]
    #[case::initial_above_cap(Duration::from_secs(5), Duration::from_secs(2), 2_000)]
    #[case::zero_initial(Duration::ZERO, Duration::from_secs(1), 0)]
    fn first_wait_respects_cap(
        #[case] initial: Duration,
        #[case] cap: Duration,
        #[case] expected_ms: u128,
    ) {
        let mut state = BackoffState::new(BackoffPolicy { initial, cap });
        assert_eq!(state.next_sleep().as_millis(), expected_ms);
    }

    #[rstest]
    fn never_overflows() {
        let mut state = BackoffState::new(BackoffPolicy {
            initial: Duration::from_secs(u64::MAX / 2),
            cap: Duration::MAX,
        });
        for _ in 0..4 {
            state.next_sleep();
        }
        assert_eq!(state.next_sleep(), Duration::MAX);
    }
}
