//! Top-level error wrapper types.

use crate::{
    ConfigError, ContractError, GeminiError, HistoryError, JsonError, PlanError, TelegramError,
};

/// The foundation error enum for the Calliope workspace.
///
/// # Examples
///
/// ```
/// use calliope_error::{CalliopeError, ConfigError};
///
/// let cfg_err = ConfigError::new("bad value");
/// let err: CalliopeError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CalliopeErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Structured-output contract violation
    #[from(ContractError)]
    Contract(ContractError),
    /// Gemini API error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// History store error
    #[from(HistoryError)]
    History(HistoryError),
    /// Telegram publish error
    #[from(TelegramError)]
    Telegram(TelegramError),
    /// Plan state error
    #[from(PlanError)]
    Plan(PlanError),
}

/// Calliope error with kind discrimination.
///
/// # Examples
///
/// ```
/// use calliope_error::{CalliopeResult, ConfigError};
///
/// fn might_fail() -> CalliopeResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Calliope Error: {}", _0)]
pub struct CalliopeError(Box<CalliopeErrorKind>);

impl CalliopeError {
    /// Create a new error from a kind.
    pub fn new(kind: CalliopeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CalliopeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to CalliopeErrorKind
impl<T> From<T> for CalliopeError
where
    T: Into<CalliopeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Calliope operations.
///
/// # Examples
///
/// ```
/// use calliope_error::{CalliopeResult, JsonError};
///
/// fn decode() -> CalliopeResult<String> {
///     Err(JsonError::new("unexpected end of input"))?
/// }
/// ```
pub type CalliopeResult<T> = std::result::Result<T, CalliopeError>;
