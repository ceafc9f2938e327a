//! Plan state and pipeline lifecycle error types.

/// Plan lifecycle error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PlanErrorKind {
    /// No plan is currently loaded in the state store
    #[display("no active content plan")]
    NoPlan,
    /// A post with the given id does not exist in the plan
    #[display("post not found: {}", _0)]
    PostNotFound(String),
    /// A generation run is already in flight
    #[display("a generation run is already active")]
    RunActive,
    /// Publish was requested with no approved posts
    #[display("no approved posts to publish")]
    NothingToPublish,
}

/// Plan error with source location tracking.
///
/// # Examples
///
/// ```
/// use calliope_error::{PlanError, PlanErrorKind};
///
/// let err = PlanError::new(PlanErrorKind::RunActive);
/// assert!(format!("{}", err).contains("already active"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Plan Error: {} at line {} in {}", kind, line, file)]
pub struct PlanError {
    /// The kind of error that occurred
    pub kind: PlanErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PlanError {
    /// Create a new PlanError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlanErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
