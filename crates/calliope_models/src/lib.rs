//! Gemini API adapter for the Calliope content planner.
//!
//! This crate provides the [`GeminiClient`] REST adapter plus the
//! [`TextModel`] and [`ImageModel`] traits the pipeline consumes. The
//! adapter speaks the `generateContent` wire protocol directly and is
//! the single place where provider errors are classified into
//! structured kinds; nothing downstream inspects error message text.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod driver;
mod gemini;

pub use driver::{ImageModel, ImageRequest, InlineImage, TextModel, TextRequest};
pub use gemini::GeminiClient;
