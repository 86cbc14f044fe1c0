//! LLM provider abstraction layer for ohlc-chat
//!
//! This crate provides provider-agnostic abstractions for sending a prompt to
//! a hosted Large Language Model. It includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - A typed error whose rate-limit variant drives caller retry policy
//! - Concrete provider implementations (behind feature flags)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LlmError, Result};
pub use messages::{Message, Role};
pub use provider::LlmProvider;

#[cfg(any(test, feature = "mock"))]
pub use provider::MockLlmProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
