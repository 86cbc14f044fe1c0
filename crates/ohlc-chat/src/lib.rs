//! OHLCV chart preparation and a statistics-backed stock chatbot
//!
//! This crate turns a single stock's daily history into:
//!
//! - the JSON payload an external candlestick widget renders ([`chart`])
//! - answers to free-text questions ([`bot`]), either computed directly
//!   from the data or delegated to a hosted language model with a
//!   statistical summary as context
//!
//! # Architecture
//!
//! - [`data`]: CSV loading into an immutable [`Dataset`]
//! - [`stats`]: bullish-day counts, overall and per-year statistics
//! - [`router`]: picks the direct-answer or delegated path for a question
//! - [`prompts`]: renders the model context
//! - [`answer`]: calls the model, retrying on rate limits ([`retry`])
//!
//! # Example
//!
//! ```rust,ignore
//! use ohlc_chat::{AnswerClient, ChatConfig, StockChatbot, data};
//! use ohlc_llm::providers::{GeminiConfig, GeminiProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ChatConfig::from_env()?;
//!     let dataset = Arc::new(data::load_path(&config.data_path)?.dataset);
//!
//!     let provider = Arc::new(GeminiProvider::with_config(GeminiConfig::from_env()?)?);
//!     let client = AnswerClient::from_config(provider, &config);
//!     let bot = StockChatbot::new(dataset, client, &config)?;
//!
//!     println!("{}", bot.ask("How many bullish days in 2023?").await);
//!     Ok(())
//! }
//! ```

pub mod answer;
pub mod bot;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod prompts;
pub mod retry;
pub mod router;
pub mod stats;

// Re-export main types for convenience
pub use answer::AnswerClient;
pub use bot::StockChatbot;
pub use chart::{ChartPoint, project, render_page, to_chart_json};
pub use config::ChatConfig;
pub use data::{Dataset, LoadedDataset, PriceBar};
pub use error::{ChatError, Result};
pub use prompts::PromptSynthesizer;
pub use retry::RetryPolicy;
pub use router::{IntentRouter, QueryIntent};
pub use stats::{BullishStats, OverallStats, YearlyStat};
