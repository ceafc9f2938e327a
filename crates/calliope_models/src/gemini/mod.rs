//! Google Gemini REST adapter.

mod client;
mod wire;

pub use client::GeminiClient;
