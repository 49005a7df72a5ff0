use mission_engine::{CompletionRequest, CompletionService, GroqClient, LlmError, LlmSettings};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> LlmSettings {
    LlmSettings {
        base_url: format!("{}/openai/v1/", server.uri()),
        ..LlmSettings::new("test-key")
    }
}

fn request() -> CompletionRequest {
    CompletionRequest {
        prompt: "도메인: example.com".to_string(),
        temperature: 0.5,
        max_tokens: 2000,
    }
}

#[tokio::test]
async fn posts_single_user_message_with_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "llama-3.3-70b-versatile",
            "messages": [{"role": "user", "content": "도메인: example.com"}],
            "max_tokens": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"summary\":\"ok\"}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GroqClient::new(&settings(&server));
    let text = client.complete(&request()).await.unwrap();

    assert_eq!(text, "{\"summary\":\"ok\"}");
}

#[tokio::test]
async fn api_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = GroqClient::new(&settings(&server));
    let err = client.complete(&request()).await.unwrap_err();

    assert!(matches!(err, LlmError::Api(ref msg) if msg.contains("rate limited")));
}

#[tokio::test]
async fn empty_choices_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = GroqClient::new(&settings(&server));
    let err = client.complete(&request()).await.unwrap_err();

    assert!(matches!(err, LlmError::Api(_)));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = GroqClient::new(&settings(&server));
    let err = client.complete(&request()).await.unwrap_err();

    assert!(matches!(err, LlmError::Parse(_)));
}
