//! All AI/LLM functionality

pub mod client;
pub mod params;
pub mod prompt_builder;

// Re-export main types for convenience
pub use client::{CompletionApi, LlmClient};
pub use params::{CompletionOverrides, CompletionParams};
