//! Contract violation errors for structured model output.
//!
//! A generative call that promises a JSON shape and delivers something else
//! is a contract violation: fatal to the enclosing stage, never retried.

/// Contract violation conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContractErrorKind {
    /// Model returned an empty response body
    #[display("model response was empty")]
    EmptyResponse,
    /// No JSON payload could be located in the response text
    #[display("no JSON found in model response ({} chars)", response_length)]
    NoJson {
        /// Length of the response that was scanned
        response_length: usize,
    },
    /// JSON parsed but did not match the expected shape
    #[display("model output did not match expected shape: {}", message)]
    ShapeMismatch {
        /// Deserializer error text
        message: String,
    },
}

/// Contract violation error with source location tracking.
///
/// # Examples
///
/// ```
/// use calliope_error::{ContractError, ContractErrorKind};
///
/// let err = ContractError::new(ContractErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Contract Error: {} at line {} in {}", kind, line, file)]
pub struct ContractError {
    /// The kind of violation that occurred
    pub kind: ContractErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ContractError {
    /// Create a new ContractError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ContractErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
