//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LlmProvider trait for
//! hosted LLM services.

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};
