//! OpenAI-compatible backend client
//!
//! Both supported providers expose OpenAI-compatible chat completion
//! endpoints, so a single reqwest client covers them; only the base URL and
//! the credential differ per call.

use super::backend::{ChunkStream, LlmBackend};
use crate::config::Config;
use crate::core::models::ChatCompletionRequest;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::warn;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

fn default_base_url(provider: &str) -> Option<&'static str> {
    match provider {
        "openrouter" => Some(OPENROUTER_BASE_URL),
        "gemini" => Some(GEMINI_BASE_URL),
        _ => None,
    }
}

/// reqwest-based [`LlmBackend`] for OpenAI-compatible providers
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    base_urls: HashMap<String, String>,
}

impl OpenAiCompatBackend {
    /// Build the client, resolving each configured provider's base URL
    pub fn new(config: &Config) -> Self {
        let base_urls = config
            .providers
            .iter()
            .filter_map(|p| {
                p.base_url
                    .clone()
                    .or_else(|| default_base_url(&p.name).map(String::from))
                    .map(|url| (p.name.clone(), url))
            })
            .collect();
        Self {
            client: reqwest::Client::new(),
            base_urls,
        }
    }

    fn endpoint(&self, provider: &str, path: &str) -> Result<String> {
        let base = self.base_urls.get(provider).ok_or_else(|| {
            GatewayError::config(format!("No base URL known for provider '{}'", provider))
        })?;
        Ok(format!("{}/{}", base.trim_end_matches('/'), path))
    }

    async fn post_completion(
        &self,
        provider: &str,
        credential: &str,
        payload: &Value,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(provider, "chat/completions")?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .json(payload)
            .send()
            .await
            .map_err(|e| GatewayError::backend(provider, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::backend(
                provider,
                format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatBackend {
    async fn chat_completion(
        &self,
        provider: &str,
        credential: &str,
        request: &ChatCompletionRequest,
    ) -> Result<Value> {
        let payload = serde_json::to_value(request)?;
        let response = self.post_completion(provider, credential, &payload).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::backend(provider, e.to_string()))
    }

    async fn chat_completion_stream(
        &self,
        provider: &str,
        credential: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChunkStream> {
        let mut payload = serde_json::to_value(request)?;
        payload["stream"] = json!(true);
        let response = self.post_completion(provider, credential, &payload).await?;
        Ok(sse_chunk_stream(response, provider.to_string()))
    }

    async fn list_models(&self, provider: &str, credential: &str) -> Result<Vec<Value>> {
        let url = self.endpoint(provider, "models")?;
        let response = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| GatewayError::backend(provider, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::backend(
                provider,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::backend(provider, e.to_string()))?;
        Ok(body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

/// Decode a provider's SSE body into a stream of chunk objects
///
/// Lines that fail to parse as JSON are logged and skipped; the stream ends
/// at the provider's `[DONE]` marker or when the body closes.
fn sse_chunk_stream(response: reqwest::Response, provider: String) -> ChunkStream {
    Box::pin(async_stream::stream! {
        let mut body = response.bytes_stream();
        let mut buffer = String::new();

        'read: while let Some(part) = body.next().await {
            let part = match part {
                Ok(part) => part,
                Err(e) => {
                    yield Err(GatewayError::backend(&provider, e.to_string()));
                    break;
                }
            };
            buffer.push_str(&String::from_utf8_lossy(&part));

            while let Some(pos) = buffer.find("\n\n") {
                let event: String = buffer.drain(..pos + 2).collect();
                for line in event.lines() {
                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        break 'read;
                    }
                    match serde_json::from_str::<Value>(data) {
                        Ok(chunk) => yield Ok(chunk),
                        Err(e) => warn!("Skipping undecodable SSE chunk: {}", e),
                    }
                }
            }
        }
    })
}
