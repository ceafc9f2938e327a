//! Core data types for the Calliope content planner.
//!
//! This crate provides the foundation data types shared across the
//! pipeline, storage, and publishing crates: posts and their lifecycle,
//! content plans, niche analysis artifacts, history entries, and
//! user-supplied reference images.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod history;
mod media;
mod plan;
mod post;

pub use analysis::AnalysisData;
pub use history::HistoryEntry;
pub use media::ReferenceImage;
pub use plan::{ContentPlan, Goal, Period, Tone};
pub use post::{Post, PostDraft, PostPatch, PostStatus, PostType};
