use serde::{Deserialize, Serialize};

use super::message::Message;
use super::prompt::Prompt;

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Provider-neutral request handed to an [`crate::LLMProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub stop: Option<Vec<String>>,
}

impl LLMRequest {
    /// Build a request for `model` from a formatted prompt.
    pub fn from_prompt(model: impl Into<String>, prompt: &Prompt) -> Self {
        Self {
            model: model.into(),
            messages: prompt.messages().to_vec(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            stop: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_prompt() {
        let prompt = Prompt::system("Who is the equivalent?").with_user("");
        let request = LLMRequest::from_prompt("Gemma2-9b-It", &prompt)
            .temperature(0.2)
            .max_tokens(64);

        assert_eq!(request.model, "Gemma2-9b-It");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(64));
        assert_eq!(request.top_p, None);
    }
}
