//! Configuration for chart preparation and question answering

use crate::error::{ChatError, Result};
use ohlc_utils::{env_non_empty, env_or, env_parse};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SYMBOL: &str = "TSLA";
const DEFAULT_DATA_PATH: &str = "data/tsla.csv";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for the chatbot
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Ticker shown in answers and prompts
    pub symbol: String,

    /// Path of the OHLCV CSV file
    pub data_path: PathBuf,

    /// Model identifier passed to the provider
    pub model: String,

    /// Total attempts for one model call (first try included)
    pub max_attempts: u32,

    /// Fixed wait after a rate-limited attempt
    pub rate_limit_backoff: Duration,

    /// Rows sampled from each end of the dataset into the prompt
    pub sample_rows: usize,

    /// Maximum tokens the model may generate
    pub max_tokens: usize,

    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model: DEFAULT_MODEL.to_string(),
            max_attempts: 3,
            rate_limit_backoff: Duration::from_secs(60),
            sample_rows: 5,
            max_tokens: 2048,
            temperature: None,
        }
    }
}

impl ChatConfig {
    /// Create a new configuration builder
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder::default()
    }

    /// Load overrides from `OHLC_SYMBOL`, `OHLC_DATA_PATH`, `GEMINI_MODEL`
    /// and `GEMINI_TEMPERATURE`
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(ChatError::ConfigError(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.symbol.trim().is_empty() {
            return Err(ChatError::ConfigError("symbol must not be empty".to_string()));
        }

        if self.model.trim().is_empty() {
            return Err(ChatError::ConfigError("model must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for ChatConfig
#[derive(Debug, Default)]
pub struct ChatConfigBuilder {
    symbol: Option<String>,
    data_path: Option<PathBuf>,
    model: Option<String>,
    max_attempts: Option<u32>,
    rate_limit_backoff: Option<Duration>,
    sample_rows: Option<usize>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
}

impl ChatConfigBuilder {
    /// Set the ticker symbol
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the CSV path
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the total attempt count
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Set the rate-limit wait
    pub fn rate_limit_backoff(mut self, duration: Duration) -> Self {
        self.rate_limit_backoff = Some(duration);
        self
    }

    /// Set the head/tail sample size
    pub fn sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = Some(rows);
        self
    }

    /// Set the generation token limit
    pub fn max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Overlay values from the environment
    pub fn with_env(mut self) -> Self {
        let symbol = env_or("OHLC_SYMBOL", self.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL));
        self.symbol = Some(symbol.trim().to_uppercase());

        if let Some(path) = env_non_empty("OHLC_DATA_PATH") {
            self.data_path = Some(PathBuf::from(path));
        }

        self.model = Some(env_or(
            "GEMINI_MODEL",
            self.model.as_deref().unwrap_or(DEFAULT_MODEL),
        ));

        if let Some(temperature) = env_parse("GEMINI_TEMPERATURE") {
            self.temperature = Some(temperature);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ChatConfig> {
        let defaults = ChatConfig::default();

        let config = ChatConfig {
            symbol: self.symbol.unwrap_or(defaults.symbol),
            data_path: self.data_path.unwrap_or(defaults.data_path),
            model: self.model.unwrap_or(defaults.model),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            rate_limit_backoff: self.rate_limit_backoff.unwrap_or(defaults.rate_limit_backoff),
            sample_rows: self.sample_rows.unwrap_or(defaults.sample_rows),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.symbol, "TSLA");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.rate_limit_backoff, Duration::from_secs(60));
        assert_eq!(config.sample_rows, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ChatConfig::builder()
            .symbol("NVDA")
            .model("gemini-2.0-flash")
            .max_attempts(5)
            .sample_rows(3)
            .rate_limit_backoff(Duration::from_secs(1))
            .build()
            .unwrap();

        assert_eq!(config.symbol, "NVDA");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.sample_rows, 3);
        assert_eq!(config.rate_limit_backoff, Duration::from_secs(1));
    }

    #[test]
    fn test_validation_zero_attempts() {
        let result = ChatConfig::builder().max_attempts(0).build();
        assert!(matches!(result, Err(ChatError::ConfigError(_))));
    }

    #[test]
    fn test_blank_data_path_env_is_ignored() {
        // SAFETY: only this test touches OHLC_DATA_PATH
        unsafe {
            std::env::set_var("OHLC_DATA_PATH", "   ");
        }
        let config = ChatConfig::builder()
            .data_path("data/nvda.csv")
            .with_env()
            .build()
            .unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/nvda.csv"));

        let config = ChatConfig::builder().with_env().build().unwrap();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn test_validation_blank_model() {
        let config = ChatConfig {
            model: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
