//! The fixed template → model → parser sequence behind the service.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::parser::StrOutputParser;
use crate::template::ChatPromptTemplate;
use crate::{Error, LLMProvider, LLMRequest};

/// Input accepted by [`EquivalenceChain::invoke`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInput {
    /// Name of the player to find a modern equivalent for.
    pub player: String,
    /// Free-form user turn sent after the instruction.
    #[serde(default)]
    pub text: String,
}

impl ChainInput {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            text: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.player.trim().is_empty() {
            return Err(Error::invalid_input("'player' must not be empty"));
        }
        Ok(())
    }
}

/// Immutable pipeline shared by every request.
pub struct EquivalenceChain {
    template: ChatPromptTemplate,
    provider: Arc<dyn LLMProvider>,
    parser: StrOutputParser,
    model: String,
    temperature: Option<f32>,
}

impl EquivalenceChain {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            template: ChatPromptTemplate::equivalence(),
            provider,
            parser: StrOutputParser,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the provider request for one input without sending it.
    pub fn build_request(&self, input: &ChainInput) -> Result<LLMRequest, Error> {
        input.validate()?;

        let values = HashMap::from([
            ("player", input.player.as_str()),
            ("text", input.text.as_str()),
        ]);
        let prompt = self.template.format(&values)?;

        let mut request = LLMRequest::from_prompt(self.model.clone(), &prompt);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }
        Ok(request)
    }

    /// Answer one input with exactly one provider call.
    pub async fn invoke(&self, input: &ChainInput) -> Result<String, Error> {
        let request = self.build_request(input)?;

        let response = self.provider.generate(&request).await.map_err(|e| {
            tracing::warn!(provider = self.provider.name(), error = %e, "model call failed");
            e
        })?;

        Ok(self.parser.parse(&response))
    }

    /// Answer several inputs concurrently; output order matches input order.
    /// The first failure fails the whole batch.
    pub async fn batch(&self, inputs: &[ChainInput]) -> Result<Vec<String>, Error> {
        for input in inputs {
            input.validate()?;
        }
        try_join_all(inputs.iter().map(|input| self.invoke(input))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompleteResponse, Role};
    use std::sync::Mutex;

    /// Replies with the system turn and records every request it sees.
    #[derive(Default)]
    struct EchoProvider {
        seen: Mutex<Vec<LLMRequest>>,
    }

    #[async_trait::async_trait]
    impl LLMProvider for EchoProvider {
        fn name(&self) -> &'static str {
            "Echo"
        }

        async fn generate(&self, request: &LLMRequest) -> Result<CompleteResponse, Error> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(CompleteResponse::text(request.messages[0].content.clone()))
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl LLMProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "Failing"
        }

        async fn generate(&self, _request: &LLMRequest) -> Result<CompleteResponse, Error> {
            Err(Error::provider("Failing", "API error (500 Internal Server Error)"))
        }
    }

    #[test]
    fn test_build_request() {
        let chain = EquivalenceChain::new(Arc::new(EchoProvider::default()), "Gemma2-9b-It")
            .with_temperature(0.0);
        let request = chain
            .build_request(&ChainInput::new("Bradman").with_text("Test batsmen only"))
            .unwrap();

        assert_eq!(request.model, "Gemma2-9b-It");
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(
            request.messages[0].content,
            "Who is the equivalent cricket player to Bradman in today's era?"
        );
        assert_eq!(request.messages[1].content, "Test batsmen only");
    }

    #[test]
    fn test_empty_player_rejected() {
        let chain = EquivalenceChain::new(Arc::new(EchoProvider::default()), "m");
        for player in ["", "   "] {
            let err = chain.build_request(&ChainInput::new(player)).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
    }

    #[test]
    fn test_invoke_makes_one_call() {
        let provider = Arc::new(EchoProvider::default());
        let chain = EquivalenceChain::new(provider.clone(), "m");

        let answer = tokio_test::block_on(chain.invoke(&ChainInput::new("Bradman"))).unwrap();

        assert!(answer.contains("Bradman"));
        assert_eq!(provider.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_call() {
        let provider = Arc::new(EchoProvider::default());
        let chain = EquivalenceChain::new(provider.clone(), "m");

        assert!(chain.invoke(&ChainInput::new("")).await.is_err());
        assert!(chain
            .batch(&[ChainInput::new("Hobbs"), ChainInput::new(" ")])
            .await
            .is_err());
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let chain = EquivalenceChain::new(Arc::new(EchoProvider::default()), "m");
        let inputs = vec![
            ChainInput::new("Bradman"),
            ChainInput::new("Hobbs"),
            ChainInput::new("Grace"),
        ];

        let answers = chain.batch(&inputs).await.unwrap();

        assert_eq!(answers.len(), 3);
        for (answer, input) in answers.iter().zip(&inputs) {
            assert!(answer.contains(&input.player));
        }
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let chain = EquivalenceChain::new(Arc::new(FailingProvider), "m");
        let err = chain.invoke(&ChainInput::new("Bradman")).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_input_text_defaults_to_empty() {
        let input: ChainInput = serde_json::from_str(r#"{"player":"Bradman"}"#).unwrap();
        assert_eq!(input, ChainInput::new("Bradman"));
    }
}
