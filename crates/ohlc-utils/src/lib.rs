//! Shared utilities for ohlc-chat
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-backed configuration helpers.

pub mod env;
pub mod logging;

pub use env::{env_non_empty, env_or, env_parse};
pub use logging::init_tracing;
