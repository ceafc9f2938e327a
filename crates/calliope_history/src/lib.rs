//! Generation history persistence.
//!
//! A small ordered list of `{niche, title}` entries, stored as a JSON
//! file, read at startup and rewritten after every completed plan-text
//! generation. Growth is capped by retaining only the most recent
//! entries; the list exists solely to reduce topic repetition in later
//! runs for the same niche.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod store;

pub use store::{HistoryStore, HISTORY_CAP};
