//! Response handling for LLM generations.

use crate::{FinishReason, Usage};

/// A complete response from an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteResponse {
    /// Text segments in the order the provider returned them.
    pub output: Vec<String>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
    /// Model identifier echoed back by the provider.
    pub model: Option<String>,
}

impl CompleteResponse {
    /// Create a single-segment text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            output: vec![content.into()],
            finish_reason: FinishReason::Stop,
            usage: Usage::default(),
            model: None,
        }
    }

    /// Get all text content concatenated together.
    pub fn content(&self) -> String {
        self.output.concat()
    }
}
