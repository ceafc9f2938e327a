//! JSON-file history store.

use calliope_core::HistoryEntry;
use calliope_error::{CalliopeResult, HistoryError, JsonError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum number of retained history entries.
pub const HISTORY_CAP: usize = 100;

/// File-backed store of previously generated post titles.
///
/// Entries are kept in append order; when the cap is exceeded the oldest
/// entries are dropped. The file is rewritten whole on every save, which
/// at 100 entries is cheaper than being clever.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store backed by the given file path.
    ///
    /// Creates the parent directory if it does not exist.
    pub fn new(path: impl AsRef<Path>) -> CalliopeResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                HistoryError::new(format!("Failed to create history directory: {}", e))
            })?;
        }

        debug!(path = %path.display(), "Initialized history store");
        Ok(Self { path })
    }

    /// Create a store at the default platform data path.
    ///
    /// Resolves to `{data_dir}/calliope/history.json`, falling back to
    /// the current directory when no data dir is available.
    pub fn at_default_path() -> CalliopeResult<Self> {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("calliope").join("history.json"))
    }

    /// Load all retained entries, oldest first.
    ///
    /// A missing file is an empty history, not an error.
    pub fn load(&self) -> CalliopeResult<Vec<HistoryEntry>> {
        if !self.path.exists() {
            debug!("No history file, returning empty history");
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| HistoryError::new(format!("Failed to read history file: {}", e)))?;

        let entries: Vec<HistoryEntry> = serde_json::from_str(&contents)
            .map_err(|e| JsonError::new(format!("Failed to parse history file: {}", e)))?;

        debug!(count = entries.len(), "Loaded history");
        Ok(entries)
    }

    /// Append entries and rewrite the file, enforcing the cap.
    ///
    /// When the combined list exceeds [`HISTORY_CAP`], the oldest
    /// entries are dropped.
    pub fn append(&self, new_entries: Vec<HistoryEntry>) -> CalliopeResult<()> {
        let mut entries = self.load()?;
        entries.extend(new_entries);

        if entries.len() > HISTORY_CAP {
            let excess = entries.len() - HISTORY_CAP;
            entries.drain(..excess);
        }

        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|e| JsonError::new(format!("Failed to serialize history: {}", e)))?;

        std::fs::write(&self.path, contents)
            .map_err(|e| HistoryError::new(format!("Failed to write history file: {}", e)))?;

        debug!(count = entries.len(), "Saved history");
        Ok(())
    }

    /// Delete the history file.
    pub fn clear(&self) -> CalliopeResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| HistoryError::new(format!("Failed to delete history file: {}", e)))?;
            debug!("Cleared history");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_store(name: &str) -> HistoryStore {
        let path = env::temp_dir()
            .join("calliope_history_test")
            .join(format!("{name}.json"));
        std::fs::remove_file(&path).ok();
        HistoryStore::new(&path).unwrap()
    }

    #[test]
    fn missing_file_is_empty_history() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_round_trips() {
        let store = temp_store("round_trip");
        store
            .append(vec![
                HistoryEntry::new("coffee shop".to_string(), "Latte art basics".to_string()),
                HistoryEntry::new("coffee shop".to_string(), "Bean origins".to_string()),
            ])
            .unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Latte art basics");

        store.clear().unwrap();
    }

    #[test]
    fn cap_drops_oldest_entries() {
        let store = temp_store("cap");
        let entries: Vec<_> = (0..HISTORY_CAP + 10)
            .map(|i| HistoryEntry::new("niche".to_string(), format!("Title {i}")))
            .collect();
        store.append(entries).unwrap();

        let retained = store.load().unwrap();
        assert_eq!(retained.len(), HISTORY_CAP);
        assert_eq!(retained[0].title, "Title 10");
        assert_eq!(retained[HISTORY_CAP - 1].title, format!("Title {}", HISTORY_CAP + 9));

        store.clear().unwrap();
    }
}
