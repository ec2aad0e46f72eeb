use std::time::Duration;

use player_equivalence::{Error, GroqProvider, LLMProvider, LLMRequest, Prompt};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gemma2-9b-it",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 24, "completion_tokens": 3, "total_tokens": 27}
    })
}

fn bradman_request() -> LLMRequest {
    let prompt = Prompt::system("Who is the equivalent cricket player to Bradman in today's era?")
        .with_user("");
    LLMRequest::from_prompt("Gemma2-9b-It", &prompt)
}

#[tokio::test]
async fn test_generate_sends_expected_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_json(json!({
            "model": "Gemma2-9b-It",
            "messages": [
                {"role": "system", "content": "Who is the equivalent cricket player to Bradman in today's era?"},
                {"role": "user", "content": ""}
            ],
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Steve Smith")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider =
        GroqProvider::new_with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let response = provider.generate(&bradman_request()).await.unwrap();

    assert_eq!(response.content(), "Steve Smith");
    assert_eq!(response.usage.output_tokens, 3);
}

#[tokio::test]
async fn test_error_status_is_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API Key", "type": "invalid_request_error", "code": "invalid_api_key"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider =
        GroqProvider::new_with_base_url("bad-key".to_string(), mock_server.uri()).unwrap();
    let err = provider.generate(&bradman_request()).await.unwrap_err();

    match &err {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "Groq");
            assert!(message.contains("401"));
            assert!(message.contains("Invalid API Key"));
        }
        other => panic!("Expected provider error, got {other:?}"),
    }
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_unparseable_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let provider =
        GroqProvider::new_with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let err = provider.generate(&bradman_request()).await.unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let provider = GroqProvider::with_options(
        "test-api-key".to_string(),
        mock_server.uri(),
        Duration::from_millis(200),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let err = provider.generate(&bradman_request()).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(5));
}
