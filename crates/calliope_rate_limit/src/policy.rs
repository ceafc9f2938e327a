//! Per-call-class retry budgets.

use serde::{Deserialize, Serialize};

/// Class of external call, used to select a retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallClass {
    /// Plain text/JSON generation
    Text,
    /// Search-grounded generation
    Search,
    /// Image generation
    Image,
}

/// Retry budget for one call class.
///
/// A budget of `max_retries` allows `max_retries + 1` total attempts.
/// After each rate-limited attempt the delay is multiplied by
/// `backoff_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt
    pub max_retries: usize,
    /// Delay before the first retry, in milliseconds
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: f64,
}

impl RetryPolicy {
    /// Budget for plain text calls.
    pub fn text() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 2_000,
            backoff_factor: 1.5,
        }
    }

    /// Budget for search-grounded calls, which hit stricter per-minute
    /// provider limits.
    pub fn search() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 4_000,
            backoff_factor: 2.0,
        }
    }

    /// Budget for image calls, the most tightly limited call class.
    pub fn image() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 5_000,
            backoff_factor: 2.0,
        }
    }
}

/// The full set of per-class retry budgets, loadable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RetryPolicies {
    /// Budget for plain text calls
    #[serde(default = "RetryPolicy::text")]
    pub text: RetryPolicy,
    /// Budget for search-grounded calls
    #[serde(default = "RetryPolicy::search")]
    pub search: RetryPolicy,
    /// Budget for image calls
    #[serde(default = "RetryPolicy::image")]
    pub image: RetryPolicy,
}

impl RetryPolicies {
    /// Budget for the given call class.
    pub fn for_class(&self, class: CallClass) -> RetryPolicy {
        match class {
            CallClass::Text => self.text,
            CallClass::Search => self.search,
            CallClass::Image => self.image,
        }
    }
}

impl Default for RetryPolicies {
    fn default() -> Self {
        Self {
            text: RetryPolicy::text(),
            search: RetryPolicy::search(),
            image: RetryPolicy::image(),
        }
    }
}
