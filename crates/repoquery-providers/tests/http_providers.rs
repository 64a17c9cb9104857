//! Integration tests for the HTTP-backed providers against a local mock server
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use repoquery_core::{Error, ModelProvider, Prompt};
use repoquery_providers::{OllamaProvider, OpenAiProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 5 }
    })
}

fn openai(server: &MockServer) -> OpenAiProvider {
    OpenAiProvider::new("sk-test")
        .unwrap()
        .with_base_url(server.uri())
        .with_model("gpt-5")
        .with_fallback_model(Some("gpt-4o".to_owned()))
}

#[tokio::test]
async fn openai_returns_first_choice_with_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "gpt-5", "max_completion_tokens": 800 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("  Hello there  ")))
        .expect(1)
        .mount(&server)
        .await;

    let completion = openai(&server)
        .generate(&Prompt::new("system", "hi"))
        .await
        .unwrap();

    assert_eq!(completion.text, "Hello there");
    assert_eq!(completion.provider, "openai/gpt-5");
    assert_eq!(completion.tokens_used.total(), 17);
}

#[tokio::test]
async fn openai_falls_back_to_secondary_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-5" })))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o", "max_tokens": 800 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("from fallback")))
        .expect(1)
        .mount(&server)
        .await;

    let completion = openai(&server)
        .generate(&Prompt::new("system", "hi"))
        .await
        .unwrap();

    assert_eq!(completion.text, "from fallback");
    assert_eq!(completion.provider, "openai/gpt-4o");
}

#[tokio::test]
async fn openai_error_status_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = openai(&server)
        .with_fallback_model(None)
        .generate(&Prompt::new("system", "hi"))
        .await;

    match result {
        Err(Error::Provider(message)) => assert!(message.contains("boom")),
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn openai_empty_choices_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let result = openai(&server)
        .with_fallback_model(None)
        .generate(&Prompt::new("system", "hi"))
        .await;

    assert!(matches!(result, Err(Error::InvalidResponse(_))));
}

#[tokio::test]
async fn ollama_generates_without_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama2",
            "stream": false,
            "system": "system",
            "options": { "num_predict": 800 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Local answer\n",
            "prompt_eval_count": 3,
            "eval_count": 4
        })))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new("llama2").with_url(server.uri());
    let completion = provider
        .generate(&Prompt::new("system", "hi"))
        .await
        .unwrap();

    assert_eq!(completion.text, "Local answer");
    assert_eq!(completion.provider, "ollama/llama2");
    assert_eq!(completion.tokens_used.total(), 7);
}

#[tokio::test]
async fn ollama_availability_follows_version_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "0.5.0" })))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new("llama2").with_url(server.uri());
    assert!(provider.is_available().await);

    let missing = MockServer::start().await;
    let provider = OllamaProvider::new("llama2").with_url(missing.uri());
    assert!(!provider.is_available().await);
}

#[tokio::test]
async fn ollama_error_status_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new("llama2").with_url(server.uri());
    let result = provider.generate(&Prompt::new("", "hi")).await;
    assert!(matches!(result, Err(Error::Provider(_))));
}
