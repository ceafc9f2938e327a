//! History command handlers.

use crate::cli::HistoryCommands;
use calliope_error::CalliopeResult;
use calliope_history::HistoryStore;
use calliope_pipeline::titles_for_niche;

/// Handle a history subcommand.
pub fn handle_history_command(command: HistoryCommands) -> CalliopeResult<()> {
    let store = HistoryStore::at_default_path()?;

    match command {
        HistoryCommands::List { niche } => {
            let entries = store.load()?;
            match niche {
                Some(niche) => {
                    for title in titles_for_niche(&entries, &niche) {
                        println!("{title}");
                    }
                }
                None => {
                    for entry in entries {
                        println!("{}: {}", entry.niche, entry.title);
                    }
                }
            }
        }
        HistoryCommands::Clear => {
            store.clear()?;
            println!("History cleared");
        }
    }

    Ok(())
}
