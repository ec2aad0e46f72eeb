use crate::{CompleteResponse, Error, LLMRequest};

/// A trait for LLM providers that can generate text responses.
#[async_trait::async_trait]
pub trait LLMProvider: Send + Sync + 'static {
    /// Short provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Generate a chat completion for the request.
    async fn generate(&self, request: &LLMRequest) -> Result<CompleteResponse, Error>;
}
