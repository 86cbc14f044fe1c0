//! Error types for chart preparation and chatbot operations

use thiserror::Error;

/// Chatbot specific errors
#[derive(Debug, Error)]
pub enum ChatError {
    /// Reading the input file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader could not be constructed or read headers
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Prompt template failed to render
    #[error("Failed to render prompt '{name}': {detail}")]
    PromptRender { name: String, detail: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for chatbot operations
pub type Result<T> = std::result::Result<T, ChatError>;
