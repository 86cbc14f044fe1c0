//! Client sending synthesized prompts to the external model

use crate::config::ChatConfig;
use crate::retry::RetryPolicy;
use ohlc_llm::{CompletionRequest, LlmError, LlmProvider, Message};
use std::sync::Arc;
use tracing::{error, info};

/// Sends one prompt per question and returns the generated text
#[derive(Clone)]
pub struct AnswerClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: usize,
    temperature: Option<f32>,
    retry: RetryPolicy,
}

impl AnswerClient {
    /// Create a client with default generation settings and retry policy
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        let defaults = ChatConfig::default();
        Self {
            provider,
            model: model.into(),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            retry: RetryPolicy::default(),
        }
    }

    /// Create a client from the chatbot configuration
    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &ChatConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry: RetryPolicy::new(config.max_attempts, config.rate_limit_backoff),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Generate text for `prompt`, retrying on rate limits
    pub async fn complete(&self, prompt: &str) -> ohlc_llm::Result<String> {
        let request = CompletionRequest::builder(self.model.clone())
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .maybe_temperature(self.temperature)
            .build();

        let response = self
            .retry
            .execute(self.provider.name(), || {
                self.provider.complete(request.clone())
            })
            .await?;

        info!(
            "Model answered: {} tokens ({:?})",
            response.usage.total(),
            response.stop_reason
        );

        response.text().map(str::to_string).ok_or_else(|| {
            LlmError::UnexpectedResponse("Model returned no text".to_string())
        })
    }

    /// Generate text for `prompt`, degrading any failure to an `Error: ...` string
    pub async fn answer(&self, prompt: &str) -> String {
        match self.complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Model call failed: {}", e);
                format!("Error: {e}")
            }
        }
    }
}

impl std::fmt::Debug for AnswerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohlc_llm::{CompletionResponse, MockLlmProvider, StopReason, TokenUsage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn reply(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        }
    }

    /// Provider failing with a rate limit `failures` times, then answering
    fn flaky_provider(failures: usize, expected_calls: usize) -> MockLlmProvider {
        let calls = AtomicUsize::new(0);
        let mut mock = MockLlmProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete()
            .times(expected_calls)
            .returning(move |request| {
                assert_eq!(request.model, "gemini-1.5-flash");
                assert_eq!(request.messages, vec![Message::user("prompt")]);
                if calls.fetch_add(1, Ordering::SeqCst) < failures {
                    Err(LlmError::RateLimitExceeded("quota exhausted".to_string()))
                } else {
                    Ok(reply("The trend is up."))
                }
            });
        mock
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_first_try() {
        let client = AnswerClient::new(Arc::new(flaky_provider(0, 1)), "gemini-1.5-flash");
        assert_eq!(client.answer("prompt").await, "The trend is up.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_twice_then_success() {
        let client = AnswerClient::new(Arc::new(flaky_provider(2, 3)), "gemini-1.5-flash");
        let started = Instant::now();

        assert_eq!(client.answer("prompt").await, "The trend is up.");
        assert_eq!(started.elapsed(), Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhaustion_degrades_to_error_string() {
        let client = AnswerClient::new(Arc::new(flaky_provider(3, 3)), "gemini-1.5-flash");

        let answer = client.answer("prompt").await;
        assert_eq!(answer, "Error: Rate limit exceeded: quota exhausted");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generic_failure_is_not_retried() {
        let mut mock = MockLlmProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(LlmError::RequestFailed("HTTP 500: boom".to_string())));

        let client = AnswerClient::new(Arc::new(mock), "gemini-1.5-flash");
        let started = Instant::now();

        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::RequestFailed(_)));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let mut mock = MockLlmProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete().times(1).returning(|_| Ok(reply("")));

        let client = AnswerClient::new(Arc::new(mock), "gemini-1.5-flash");
        assert!(client.answer("prompt").await.starts_with("Error:"));
    }

    #[test]
    fn test_from_config_uses_retry_settings() {
        let config = ChatConfig::builder()
            .max_attempts(5)
            .rate_limit_backoff(Duration::from_secs(2))
            .build()
            .unwrap();
        let client = AnswerClient::from_config(Arc::new(MockLlmProvider::new()), &config);

        assert_eq!(client.retry_policy(), RetryPolicy::new(5, Duration::from_secs(2)));
    }
}
