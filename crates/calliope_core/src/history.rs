//! Generation history entries.

use serde::{Deserialize, Serialize};

/// One previously generated post title, recorded per niche.
///
/// Appended after every completed plan-text generation and used only to
/// reduce topic repetition in later runs for the same niche.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct HistoryEntry {
    /// Niche the title was generated for
    pub niche: String,
    /// Post title
    pub title: String,
}
