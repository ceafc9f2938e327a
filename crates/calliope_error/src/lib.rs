//! Error types for the Calliope content planner.
//!
//! This crate provides the foundation error types used throughout the
//! Calliope workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean
//! error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use calliope_error::{CalliopeResult, ConfigError};
//!
//! fn load_credentials() -> CalliopeResult<String> {
//!     Err(ConfigError::new("GEMINI_API_KEY not set"))?
//! }
//!
//! match load_credentials() {
//!     Ok(key) => println!("Got key of length {}", key.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod contract;
mod error;
mod gemini;
mod history;
mod json;
mod plan;
mod telegram;

pub use config::ConfigError;
pub use contract::{ContractError, ContractErrorKind};
pub use error::{CalliopeError, CalliopeErrorKind, CalliopeResult};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use history::HistoryError;
pub use json::JsonError;
pub use plan::{PlanError, PlanErrorKind};
pub use telegram::{TelegramError, TelegramErrorKind};
