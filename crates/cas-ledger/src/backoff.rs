//! # Retry Backoff Policies
//!
//! Delay computation between conditional-write attempts lives behind the
//! [`BackoffPolicy`] trait so the ledger loop never hard-codes a sleep. The
//! production policy is exponential with jitter; tests plug in [`NoBackoff`]
//! and run the full retry discipline without waiting wall-clock time.

use rand::Rng;
use std::time::Duration;

/// Computes the pause before a retry attempt.
pub trait BackoffPolicy: Send + Sync {
    /// Delay to sleep after `attempt` failed attempts (so the first retry
    /// passes `attempt = 1`).
    fn delay(&self, attempt: u32) -> Duration;
}

/// Exponential backoff with a hard cap and uniform random jitter.
///
/// The delay after `n` failed attempts is `min(base * 2^n, cap)` plus a
/// random 0..jitter addition that spreads out competing writers retrying in
/// lockstep.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base: Duration,
    cap: Duration,
    jitter: Duration,
}

impl ExponentialBackoff {
    pub fn new(base: Duration, cap: Duration, jitter: Duration) -> Self {
        Self { base, cap, jitter }
    }
}

impl Default for ExponentialBackoff {
    /// 50 ms doubling per attempt, capped at 500 ms, with up to 30 ms jitter.
    fn default() -> Self {
        Self {
            base: Duration::from_millis(50),
            cap: Duration::from_millis(500),
            jitter: Duration::from_millis(30),
        }
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        let exp = self.base.saturating_mul(1u32 << attempt.min(16));
        let capped = exp.min(self.cap);

        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return capped;
        }
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..jitter_ms));
        capped + jitter
    }
}

/// Zero-delay policy for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackoff;

impl BackoffPolicy for NoBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_then_cap() {
        // No jitter for predictable assertions
        let policy = ExponentialBackoff::new(
            Duration::from_millis(50),
            Duration::from_millis(500),
            Duration::ZERO,
        );

        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
        assert_eq!(policy.delay(4), Duration::from_millis(500));
        assert_eq!(policy.delay(10), Duration::from_millis(500));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let policy = ExponentialBackoff::new(
            Duration::from_millis(50),
            Duration::from_millis(500),
            Duration::from_millis(30),
        );

        for _ in 0..100 {
            let delay = policy.delay(1);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay < Duration::from_millis(130));
        }
    }

    #[test]
    fn no_backoff_is_zero() {
        assert_eq!(NoBackoff.delay(1), Duration::ZERO);
        assert_eq!(NoBackoff.delay(100), Duration::ZERO);
    }
}
