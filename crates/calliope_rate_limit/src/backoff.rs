//! Geometric backoff delay strategy.

use crate::RetryPolicy;
use std::time::Duration;

/// Delay iterator that multiplies by a fixed factor after each step.
///
/// `tokio_retry2` strategies are plain `Iterator<Item = Duration>`
/// values; its bundled `ExponentialBackoff` raises an integer base to
/// successive powers, which cannot express the fractional 1.5x factor
/// the text call class uses, so this crate carries its own strategy.
///
/// # Examples
///
/// ```
/// use calliope_rate_limit::{GeometricBackoff, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy {
///     max_retries: 3,
///     initial_delay_ms: 1_000,
///     backoff_factor: 2.0,
/// };
/// let delays: Vec<_> = GeometricBackoff::from_policy(&policy)
///     .take(policy.max_retries)
///     .collect();
/// assert_eq!(delays[0], Duration::from_millis(1_000));
/// assert_eq!(delays[1], Duration::from_millis(2_000));
/// assert_eq!(delays[2], Duration::from_millis(4_000));
/// ```
#[derive(Debug, Clone)]
pub struct GeometricBackoff {
    current_ms: f64,
    factor: f64,
}

impl GeometricBackoff {
    /// Create a backoff sequence starting at `initial_delay_ms`.
    pub fn new(initial_delay_ms: u64, factor: f64) -> Self {
        Self {
            current_ms: initial_delay_ms as f64,
            factor,
        }
    }

    /// Create the backoff sequence a retry policy describes.
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self::new(policy.initial_delay_ms, policy.backoff_factor)
    }
}

impl Iterator for GeometricBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = Duration::from_millis(self.current_ms as u64);
        self.current_ms *= self.factor;
        Some(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_are_non_decreasing() {
        let mut previous = Duration::ZERO;
        for delay in GeometricBackoff::new(500, 1.5).take(8) {
            assert!(delay >= previous);
            previous = delay;
        }
    }

    #[test]
    fn fractional_factor_grows() {
        let delays: Vec<_> = GeometricBackoff::new(2_000, 1.5).take(3).collect();
        assert_eq!(delays[0], Duration::from_millis(2_000));
        assert_eq!(delays[1], Duration::from_millis(3_000));
        assert_eq!(delays[2], Duration::from_millis(4_500));
    }
}
