//! Retry and rate limiting for external generative calls.
//!
//! The external provider enforces stricter per-minute limits on image and
//! search-grounded calls than on plain text calls, so retry budgets are
//! configured per call class. Rate-limit errors are retried with bounded
//! geometric backoff; every other error propagates unchanged.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backoff;
mod invoker;
mod limiter;
mod policy;

pub use backoff::GeometricBackoff;
pub use invoker::RetryingInvoker;
pub use limiter::RequestLimiter;
pub use policy::{CallClass, RetryPolicies, RetryPolicy};
