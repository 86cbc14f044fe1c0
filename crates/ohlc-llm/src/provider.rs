//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations of this trait provide access to a hosted text-generation
/// service. They are responsible for mapping the service's rate-limit signal
/// onto [`crate::LlmError::RateLimitExceeded`].
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from the LLM
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with messages and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant's message and metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, StopReason, TokenUsage};

    #[tokio::test]
    async fn test_mock_provider_as_trait_object() {
        let mut mock = MockLlmProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete().times(1).returning(|request| {
            Ok(CompletionResponse {
                message: Message::assistant(format!("echo: {}", request.messages.len())),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        });

        let provider: Box<dyn LlmProvider> = Box::new(mock);
        let response = provider
            .complete(CompletionRequest::builder("m").add_message(Message::user("hi")).build())
            .await
            .unwrap();

        assert_eq!(provider.name(), "mock");
        assert_eq!(response.text(), Some("echo: 1"));
    }
}
