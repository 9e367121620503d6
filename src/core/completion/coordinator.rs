//! Request coordination
//!
//! Entry point for chat completion requests: validates the caller, resolves
//! auto-model requests, picks a credential, dispatches through the backend
//! client, and hands streamed responses to the relay. Credential selection
//! happens exactly once per request; a quota failure surfaces to the caller
//! instead of transparently retrying on another key.

use crate::config::Config;
use crate::core::models::{ChatCompletionRequest, ModelEntry, ModelListResponse};
use crate::core::providers::LlmBackend;
use crate::core::rate_limiter::{RateLimiter, UsageReport, quota};
use crate::core::router::{AUTO_MODEL_ID, KeySelector, ModelRouter, provider_for_model};
use crate::core::streaming::relay_sse;
use crate::utils::error::{GatewayError, Result};
use crate::utils::redact_key;
use actix_web::web::Bytes;
use futures::stream::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Outcome of a coordinated chat completion
pub enum ChatReply {
    /// Buffered provider response, returned verbatim
    Completed(Value),
    /// Live SSE frame stream
    Streaming(Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>),
}

impl std::fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatReply::Completed(value) => f.debug_tuple("Completed").field(value).finish(),
            ChatReply::Streaming(_) => f.debug_tuple("Streaming").finish(),
        }
    }
}

/// Coordinates authentication, routing, selection, and dispatch
pub struct RequestCoordinator {
    config: Arc<Config>,
    limiter: Arc<RateLimiter>,
    selector: Arc<KeySelector>,
    router: ModelRouter,
    backend: Arc<dyn LlmBackend>,
}

impl RequestCoordinator {
    /// Wire the coordinator over shared state and a backend client
    pub fn new(
        config: Arc<Config>,
        limiter: Arc<RateLimiter>,
        backend: Arc<dyn LlmBackend>,
    ) -> Self {
        let selector = Arc::new(KeySelector::new(config.clone(), limiter.clone()));
        let router = ModelRouter::new(config.routing.auto_models.clone(), selector.clone());
        Self {
            config,
            limiter,
            selector,
            router,
            backend,
        }
    }

    /// Handle one chat completion request
    pub async fn chat_completion(
        &self,
        auth_header: Option<&str>,
        mut request: ChatCompletionRequest,
    ) -> Result<ChatReply> {
        self.authorize(auth_header)?;

        if request.model == AUTO_MODEL_ID {
            let resolved = self
                .router
                .resolve_auto_model()
                .ok_or(GatewayError::NoAdmissibleModel)?;
            debug!(model = %resolved, "Resolved auto-model request");
            request.model = resolved;
        }

        request.strip_empty_tools();

        let provider = provider_for_model(&request.model);
        let key = self.selector.select(provider)?;

        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            model = %request.model,
            provider,
            key = %redact_key(&key),
            "Dispatching chat completion"
        );

        if request.is_streaming() {
            match self
                .backend
                .chat_completion_stream(provider, &key, &request)
                .await
            {
                Ok(chunks) => Ok(ChatReply::Streaming(Box::pin(relay_sse(
                    chunks,
                    self.config.streaming,
                )))),
                Err(err) => Err(self.classify_backend_error(provider, &key, err)),
            }
        } else {
            match self.backend.chat_completion(provider, &key, &request).await {
                Ok(body) => Ok(ChatReply::Completed(body)),
                Err(err) => Err(self.classify_backend_error(provider, &key, err)),
            }
        }
    }

    /// Catalog of available models
    ///
    /// Sourced from the OpenRouter catalog filtered to free-tier entries; a
    /// failed catalog fetch is swallowed and only the synthetic auto-model
    /// entry is served.
    pub async fn list_models(&self) -> ModelListResponse {
        let mut entries = Vec::new();

        if let Some(key) = self.config.first_key("openrouter") {
            match self.backend.list_models("openrouter", key).await {
                Ok(models) => {
                    for model in models {
                        let Some(id) = model.get("id").and_then(Value::as_str) else {
                            continue;
                        };
                        if id.ends_with(":free") {
                            entries.push(ModelEntry::new(id, "openrouter"));
                        }
                    }
                }
                Err(e) => {
                    debug!("Model catalog fetch failed, serving synthetic entry only: {}", e);
                }
            }
        }

        entries.push(ModelEntry::new(AUTO_MODEL_ID, "proxy"));
        ModelListResponse::new(entries)
    }

    /// Read-only usage report over the configured providers
    pub fn usage_report(&self) -> UsageReport {
        self.limiter.usage_report(&self.config.providers)
    }

    /// Validate the bearer token before any other work
    fn authorize(&self, auth_header: Option<&str>) -> Result<()> {
        let header = auth_header.ok_or(GatewayError::AuthMissing)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(GatewayError::AuthMissing)?;
        if token != self.config.auth.access_key {
            return Err(GatewayError::AuthInvalid);
        }
        Ok(())
    }

    /// Turn an upstream failure into its request-scoped error
    ///
    /// Quota-classified errors blacklist the credential first, so the next
    /// request avoids it without re-deriving the failure.
    fn classify_backend_error(
        &self,
        provider: &str,
        key: &str,
        err: GatewayError,
    ) -> GatewayError {
        let GatewayError::Backend { detail, .. } = &err else {
            return err;
        };
        let limits = self.config.limits_for(provider).unwrap_or_default();
        if quota::register_quota_error(&self.limiter, provider, key, &limits, detail) {
            return GatewayError::ProviderQuotaExceeded {
                provider: provider.to_string(),
                detail: detail.clone(),
            };
        }
        error!(
            provider,
            key = %redact_key(key),
            "Upstream request failed: {}",
            detail
        );
        err
    }
}
