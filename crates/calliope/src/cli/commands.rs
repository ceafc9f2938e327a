//! CLI command definitions.

use calliope_core::{Goal, Period, Tone};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Calliope - AI social-media content planner
#[derive(Parser, Debug)]
#[command(name = "calliope")]
#[command(about = "Generate multi-day social-media content plans with AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a content plan for a niche
    Plan(PlanArgs),

    /// Generation history commands
    #[command(subcommand)]
    History(HistoryCommands),
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Target niche, e.g. "coffee shop"
    #[arg(long)]
    pub niche: String,

    /// Planning horizon
    #[arg(long, default_value = "week")]
    pub period: Period,

    /// Stylistic voice
    #[arg(long, default_value = "friendly")]
    pub tone: Tone,

    /// Marketing objective
    #[arg(long, default_value = "engagement")]
    pub goal: Goal,

    /// Ground the analysis with live web search
    #[arg(long)]
    pub search: bool,

    /// Reference image for visual style matching (repeatable)
    #[arg(long)]
    pub reference: Vec<PathBuf>,

    /// Print the finished plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// History subcommands
#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List recorded titles
    List {
        /// Only titles for this niche
        #[arg(long)]
        niche: Option<String>,
    },

    /// Delete the recorded history
    Clear,
}
