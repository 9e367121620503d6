//! Tests for the OpenAI-compatible backend client

use super::{LlmBackend, OpenAiCompatBackend};
use crate::config::{Config, ProviderConfig, ProviderLimits};
use crate::core::models::ChatCompletionRequest;
use crate::utils::error::GatewayError;
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> OpenAiCompatBackend {
    let config = Config {
        providers: vec![ProviderConfig {
            name: "openrouter".to_string(),
            keys: vec!["sk-test".to_string()],
            base_url: Some(server.uri()),
            limits: ProviderLimits::default(),
        }],
        ..Config::default()
    };
    OpenAiCompatBackend::new(&config)
}

fn sample_request() -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        "deepseek/deepseek-r1:free",
        vec![json!({ "role": "user", "content": "Hi" })],
    )
}

#[tokio::test]
async fn test_chat_completion_returns_body_verbatim() {
    let server = MockServer::start().await;
    let upstream_body = json!({
        "id": "chatcmpl-123",
        "choices": [{ "message": { "role": "assistant", "content": "Hello" } }]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "deepseek/deepseek-r1:free" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let body = backend
        .chat_completion("openrouter", "sk-test", &sample_request())
        .await
        .unwrap();
    assert_eq!(body, upstream_body);
}

#[tokio::test]
async fn test_error_status_surfaces_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend
        .chat_completion("openrouter", "sk-test", &sample_request())
        .await
        .unwrap_err();

    // The upstream text must survive into the error so quota classification
    // can see it
    match err {
        GatewayError::Backend { provider, detail } => {
            assert_eq!(provider, "openrouter");
            assert!(detail.contains("429"));
            assert!(detail.contains("rate limit exceeded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_streaming_decodes_sse_until_done() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        ": comment\n\n",
        "data: not-json\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"late\"}}]}\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body, "text/event-stream"),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut request = sample_request();
    request.stream = Some(true);

    let chunks = backend
        .chat_completion_stream("openrouter", "sk-test", &request)
        .await
        .unwrap();
    let collected: Vec<_> = chunks.collect().await;

    // Undecodable lines are skipped, nothing after [DONE] is yielded
    assert_eq!(collected.len(), 2);
    let first = collected[0].as_ref().unwrap();
    assert_eq!(first["choices"][0]["delta"]["content"], "Hel");
    let second = collected[1].as_ref().unwrap();
    assert_eq!(second["choices"][0]["delta"]["content"], "lo");
}

#[tokio::test]
async fn test_streaming_error_status_fails_before_relay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut request = sample_request();
    request.stream = Some(true);

    let err = backend
        .chat_completion_stream("openrouter", "sk-test", &request)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, GatewayError::Backend { .. }));
}

#[tokio::test]
async fn test_list_models_extracts_data_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "deepseek/deepseek-r1:free" },
                { "id": "anthropic/claude-3.5-sonnet" }
            ]
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let models = backend.list_models("openrouter", "sk-test").await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0]["id"], "deepseek/deepseek-r1:free");
}

#[tokio::test]
async fn test_unknown_provider_is_config_error() {
    let server = MockServer::start().await;
    let backend = backend_for(&server);

    let err = backend
        .chat_completion("anthropic", "sk-test", &sample_request())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Config(_)));
}
