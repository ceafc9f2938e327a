//! Bounded retry wrapper for external calls.

use crate::{GeometricBackoff, RetryPolicy};
use calliope_error::RetryableError;
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Wraps an external call with bounded backoff retry on rate-limit errors.
///
/// Given a zero-argument async operation, the invoker executes it and
/// classifies any error through [`RetryableError`]. A rate-limit error
/// with budget remaining waits the current delay, multiplies the delay
/// by the policy's backoff factor, and retries. Any other error, or
/// budget exhaustion, propagates to the caller unchanged.
///
/// Total attempts never exceed `max_retries + 1`.
///
/// # Examples
///
/// ```rust,ignore
/// use calliope_rate_limit::{RetryPolicy, RetryingInvoker};
///
/// let invoker = RetryingInvoker::new(RetryPolicy::image());
/// let response = invoker.invoke(|| client.generate_image(&request)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RetryingInvoker {
    policy: RetryPolicy,
}

impl RetryingInvoker {
    /// Create an invoker with the given retry budget.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The retry budget this invoker applies.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute an operation, retrying rate-limit failures within budget.
    pub async fn invoke<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: RetryableError + std::fmt::Display,
    {
        let strategy = GeometricBackoff::from_policy(&self.policy).take(self.policy.max_retries);

        Retry::spawn(strategy, || async {
            match operation().await {
                Ok(value) => Ok(value),
                Err(e) if e.is_rate_limited() => {
                    warn!(error = %e, "Rate limited, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
    }
}
