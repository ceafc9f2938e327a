//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the
//! calliope binary.

mod commands;
mod history;
mod plan;

pub use commands::{Cli, Commands, HistoryCommands, PlanArgs};
pub use history::handle_history_command;
pub use plan::run_plan;
