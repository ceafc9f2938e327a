//! Calliope: an AI social-media content planner.
//!
//! Generates a multi-day content plan for a niche: analyzes the market,
//! produces a post sequence with text and visual directives, then fills
//! in one image per post under provider rate limits, with deterministic
//! placeholder fallback.
//!
//! This facade re-exports the public API of the workspace crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod settings;

pub use settings::{AnalysisSettings, CalliopeConfig, ImageSettings, ModelSettings};

pub use calliope_core::{
    AnalysisData, ContentPlan, Goal, HistoryEntry, Period, Post, PostPatch, PostStatus, PostType,
    ReferenceImage, Tone,
};
pub use calliope_error::{CalliopeError, CalliopeErrorKind, CalliopeResult};
pub use calliope_history::HistoryStore;
pub use calliope_models::{GeminiClient, ImageModel, TextModel};
pub use calliope_pipeline::{
    EditRequest, ImagePipeline, NicheAnalyzer, PipelineRunner, PlanGenerator, PlanStateStore,
    Publisher, RunParams,
};
pub use calliope_rate_limit::{RetryPolicies, RetryPolicy, RetryingInvoker};
pub use calliope_social::TelegramClient;
