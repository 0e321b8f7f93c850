//! Retry backoff with jittered delays.

use std::time::Duration;

use crate::config::JITTER_FACTOR;

/// Source of uniform random draws in `[0, 1)` for jitter.
///
/// Injectable so tests can pin the draw and assert exact delays.
type JitterSource = Box<dyn Fn() -> f64 + Send + Sync>;

/// Maps a 0-based attempt index to a sleep duration.
///
/// The base delay grows linearly with the attempt index (attempt 0 sleeps
/// not at all), and a uniform jitter of up to half the base is added on top,
/// so `delay(n)` falls in `[n seconds, 1.5 * n seconds]`. No absolute cap is
/// imposed here; the retry ceiling comes from the executor's attempt limit.
pub struct BackoffPolicy {
    jitter_factor: f64,
    jitter: JitterSource,
}

impl BackoffPolicy {
    /// Policy with the default jitter factor and an ambient RNG.
    pub fn new() -> Self {
        Self::with_jitter_source(|| rand::random::<f64>())
    }

    /// Policy drawing jitter from the given source.
    pub fn with_jitter_source(jitter: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self {
            jitter_factor: JITTER_FACTOR,
            jitter: Box::new(jitter),
        }
    }

    /// Sleep duration before retrying after a failure at `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = Duration::from_secs(u64::from(attempt));
        let jitter = base.mul_f64((self.jitter)() * self.jitter_factor);
        base + jitter
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BackoffPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackoffPolicy")
            .field("jitter_factor", &self.jitter_factor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_within_jitter_bounds() {
        let policy = BackoffPolicy::new();
        for attempt in 0..6 {
            let delay = policy.delay(attempt);
            let base = Duration::from_secs(u64::from(attempt));
            assert!(delay >= base, "attempt {attempt}: {delay:?} < base");
            assert!(
                delay <= base.mul_f64(1.5),
                "attempt {attempt}: {delay:?} > 1.5 * base"
            );
        }
    }

    #[test]
    fn test_attempt_zero_sleeps_nothing() {
        let policy = BackoffPolicy::new();
        assert_eq!(policy.delay(0), Duration::ZERO);
    }

    #[test]
    fn test_pinned_jitter_is_exact() {
        let low = BackoffPolicy::with_jitter_source(|| 0.0);
        assert_eq!(low.delay(4), Duration::from_secs(4));

        let high = BackoffPolicy::with_jitter_source(|| 1.0);
        assert_eq!(high.delay(4), Duration::from_secs(6));

        let mid = BackoffPolicy::with_jitter_source(|| 0.5);
        assert_eq!(mid.delay(2), Duration::from_millis(2500));
    }
}
