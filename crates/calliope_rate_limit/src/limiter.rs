//! Per-minute request limiter.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

// Type alias for our direct rate limiter
type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Requests-per-minute limiter for a call class.
///
/// Uses the governor crate's GCRA algorithm. The image call class
/// acquires a permit here before each attempt, on top of the fixed
/// inter-post throttle, so a regeneration burst cannot exceed the
/// provider's per-minute window.
#[derive(Clone)]
pub struct RequestLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
}

impl RequestLimiter {
    /// Create a limiter allowing `rpm` requests per minute.
    ///
    /// `None` (or zero) disables limiting.
    pub fn new(rpm: Option<u32>) -> Self {
        let rpm_limiter = rpm.and_then(|rpm| {
            NonZeroU32::new(rpm).map(|n| {
                let quota = Quota::per_minute(n);
                Arc::new(GovernorRateLimiter::direct(quota))
            })
        });
        Self { rpm_limiter }
    }

    /// Wait until the per-minute quota allows another request.
    pub async fn until_ready(&self) {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }
    }

    /// Check whether a request would be allowed right now.
    pub fn check(&self) -> bool {
        match &self.rpm_limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("limited", &self.rpm_limiter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_allows() {
        let limiter = RequestLimiter::new(None);
        for _ in 0..100 {
            assert!(limiter.check());
        }
    }

    #[test]
    fn quota_exhausts_within_the_window() {
        let limiter = RequestLimiter::new(Some(2));
        assert!(limiter.check());
        assert!(limiter.check());
        assert!(!limiter.check());
    }
}
