//! Gemini-specific error types and retry classification.

/// Gemini-specific error conditions.
///
/// Classification into these variants happens exactly once, at the API
/// adapter boundary. Retry logic dispatches on the variant, never on
/// message text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Rate limit or quota exhausted (HTTP 429 or RESOURCE_EXHAUSTED)
    #[display("Gemini rate limit exceeded: {}", message)]
    RateLimited {
        /// HTTP status code when the condition came from a status line
        status_code: Option<u16>,
        /// Provider-supplied error message
        message: String,
    },
    /// Non-rate-limit HTTP error with status code
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Network-level failure before a status line was received
    #[display("Gemini transport error: {}", _0)]
    Transport(String),
    /// Response carried no text payload
    #[display("Gemini response contained no text")]
    EmptyResponse,
    /// Response carried no inline image payload
    #[display("Gemini response contained no image data")]
    NoImageData,
    /// Request failed for a reason the adapter could not classify
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
}

impl GeminiErrorKind {
    /// Check if this error represents a rate-limit/quota condition.
    ///
    /// Only these errors are eligible for retry; everything else
    /// propagates to the caller unchanged.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GeminiErrorKind::RateLimited { .. })
    }
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use calliope_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that participate in rate-limit retry.
///
/// The retrying invoker retries an operation only when its error reports a
/// rate-limit/quota condition through this trait. Permanent failures
/// (authentication, malformed requests, contract violations) must return
/// false so they surface immediately.
///
/// # Examples
///
/// ```
/// use calliope_error::{GeminiError, GeminiErrorKind, RetryableError};
///
/// let err = GeminiError::new(GeminiErrorKind::RateLimited {
///     status_code: Some(429),
///     message: "quota exceeded".to_string(),
/// });
/// assert!(err.is_rate_limited());
///
/// let err = GeminiError::new(GeminiErrorKind::EmptyResponse);
/// assert!(!err.is_rate_limited());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a backoff retry.
    fn is_rate_limited(&self) -> bool;
}

impl RetryableError for GeminiError {
    fn is_rate_limited(&self) -> bool {
        self.kind.is_rate_limited()
    }
}

impl RetryableError for crate::CalliopeError {
    fn is_rate_limited(&self) -> bool {
        match self.kind() {
            crate::CalliopeErrorKind::Gemini(e) => e.is_rate_limited(),
            _ => false,
        }
    }
}
