use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, GroqError, GroqMessage,
};
use crate::provider::LLMProvider;
use crate::{CompleteResponse, Error, FinishReason, LLMRequest, Usage};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const PROVIDER: &str = "Groq";

/// Groq provider implementation (OpenAI-compatible Chat Completions API).
pub struct GroqProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GroqProvider {
    /// Create a new Groq provider.
    pub fn new(api_key: String) -> Result<Self, Error> {
        Self::with_options(api_key, DEFAULT_BASE_URL.to_string(), DEFAULT_TIMEOUT)
    }

    /// Create a new Groq provider with custom base URL.
    pub fn new_with_base_url(api_key: String, base_url: String) -> Result<Self, Error> {
        Self::with_options(api_key, base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new Groq provider with custom base URL and request timeout.
    pub fn with_options(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::config("Groq API key must not be empty"));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert internal request to Chat Completions format.
    fn convert_request(&self, request: &LLMRequest) -> ChatCompletionRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| GroqMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            })
            .collect();

        ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            stop: request.stop.clone(),
            stream: false,
        }
    }

    /// Convert a Chat Completions response into a complete response.
    fn convert_response(response: ChatCompletionResponse) -> Result<CompleteResponse, Error> {
        let mut choices = response.choices;
        choices.sort_by_key(|choice| choice.index);

        let choice = choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed(PROVIDER, "response contained no choices"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| Error::malformed(PROVIDER, "choice contained no message content"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            None | Some("stop") => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("tool_calls") => FinishReason::ToolCalls,
            Some("content_filter") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        };

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompleteResponse {
            output: vec![content],
            finish_reason,
            usage,
            model: response.model,
        })
    }

    /// Pull the human-readable message out of an error body, if it has one.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<GroqError>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string())
    }
}

#[async_trait::async_trait]
impl LLMProvider for GroqProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, request: &LLMRequest) -> Result<CompleteResponse, Error> {
        let groq_request = self.convert_request(request);

        tracing::debug!(model = %groq_request.model, messages = groq_request.messages.len(), "sending chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&groq_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(Error::provider(
                PROVIDER,
                format!("API error ({status}): {}", Self::error_message(&error_text)),
            ));
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(PROVIDER, format!("could not parse body: {e}")))?;

        let complete = Self::convert_response(parsed)?;
        tracing::debug!(
            input_tokens = complete.usage.input_tokens,
            output_tokens = complete.usage.output_tokens,
            "chat completion received"
        );

        Ok(complete)
    }
}
