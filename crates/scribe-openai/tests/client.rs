//! Integration tests for OpenAiClient.
//!
//! Uses wiremock for HTTP mocking. Covers success, error statuses, malformed
//! envelopes, JSON response mode and timeouts.

use std::time::Duration;

use scribe_core::{ResponseContract, Schema};
use scribe_openai::{CompletionClient, CompletionOutcome, GenerationParams, OpenAiClient, OpenAiConfig, RenderedPrompt};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer) -> OpenAiClient {
    let config = OpenAiConfig::new("test-key").with_base_url(format!("{}/v1", mock_server.uri()));
    OpenAiClient::new(config).expect("failed to create client")
}

fn prompt(contract: ResponseContract) -> RenderedPrompt {
    RenderedPrompt {
        system_instruction: "You are a test assistant.".to_string(),
        user_prompt: "Say hello.".to_string(),
        response_contract: contract,
    }
}

fn params(timeout: Duration) -> GenerationParams {
    GenerationParams {
        model_identifier: "gpt-test".to_string(),
        temperature: 0.2,
        max_output_tokens: 50,
        timeout,
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

#[tokio::test]
async fn test_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "messages": [
                {"role": "system", "content": "You are a test assistant."},
                {"role": "user", "content": "Say hello."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hello!")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let outcome = client
        .complete(&prompt(ResponseContract::FreeText), &params(Duration::from_secs(5)))
        .await;

    assert_eq!(outcome, CompletionOutcome::success("Hello!"));
}

#[tokio::test]
async fn test_structured_contract_sends_json_mode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"response_format": {"type": "json_object"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{\"topics\": []}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let outcome = client
        .complete(
            &prompt(ResponseContract::StructuredJson(Schema::Topics)),
            &params(Duration::from_secs(5)),
        )
        .await;

    // Decoding is the parser's job; the client hands back the raw text.
    assert_eq!(outcome, CompletionOutcome::success("{\"topics\": []}"));
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "upstream overloaded", "type": "server_error"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let outcome = client
        .complete(&prompt(ResponseContract::FreeText), &params(Duration::from_secs(5)))
        .await;

    match outcome {
        CompletionOutcome::TransportFailure { message } => {
            assert!(message.contains("500"), "message: {message}");
            assert!(message.contains("upstream overloaded"), "message: {message}");
        }
        other => panic!("expected TransportFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let outcome = client
        .complete(&prompt(ResponseContract::FreeText), &params(Duration::from_secs(5)))
        .await;

    assert!(matches!(outcome, CompletionOutcome::TransportFailure { .. }));
}

#[tokio::test]
async fn test_malformed_envelope_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let outcome = client
        .complete(&prompt(ResponseContract::FreeText), &params(Duration::from_secs(5)))
        .await;

    match outcome {
        CompletionOutcome::TransportFailure { message } => {
            assert!(message.starts_with("Malformed response envelope"), "message: {message}");
        }
        other => panic!("expected TransportFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let outcome = client
        .complete(&prompt(ResponseContract::FreeText), &params(Duration::from_secs(5)))
        .await;

    assert!(matches!(outcome, CompletionOutcome::TransportFailure { .. }));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let timeout = Duration::from_millis(200);
    let outcome = client
        .complete(&prompt(ResponseContract::FreeText), &params(timeout))
        .await;

    assert_eq!(outcome, CompletionOutcome::Timeout { after: timeout });
}
