use rand::Rng;
use std::time::Duration;

/// Upper bound on the backoff exponent (delay * 2^6).
const MAX_EXPONENT: u32 = 6;

/// How often and how patiently a failed request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Exponential backoff with ±30% jitter for the given zero-based retry.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.min(MAX_EXPONENT));
        let base = self.delay.saturating_mul(factor);

        let jitter = rand::thread_rng().gen_range(0.7..1.3);
        base.mul_f64(jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
