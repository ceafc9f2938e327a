//! Calliope CLI binary.
//!
//! This binary provides command-line access to the content planner:
//! - Generate a multi-day content plan for a niche
//! - Inspect and clear the generation history

use clap::Parser;

mod cli;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_history_command, run_plan};

    // Load .env credentials if present
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Execute the requested command
    match cli.command {
        Commands::Plan(args) => {
            run_plan(args).await?;
        }

        Commands::History(history_cmd) => {
            handle_history_command(history_cmd)?;
        }
    }

    Ok(())
}
