//! Telegram publish channel error types.

/// Telegram-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TelegramErrorKind {
    /// Bot token not found in environment
    #[display("TELEGRAM_BOT_TOKEN environment variable not set")]
    MissingToken,
    /// Channel identifier not found in environment
    #[display("TELEGRAM_CHANNEL_ID environment variable not set")]
    MissingChannel,
    /// Bot API rejected the request
    #[display("Telegram API error: {}", _0)]
    Api(String),
    /// Network-level failure
    #[display("Telegram transport error: {}", _0)]
    Transport(String),
}

/// Telegram error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Telegram Error: {} at line {} in {}", kind, line, file)]
pub struct TelegramError {
    /// The kind of error that occurred
    pub kind: TelegramErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TelegramError {
    /// Create a new TelegramError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TelegramErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
