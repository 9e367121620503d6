//! Backend client seam
//!
//! The coordinator talks to upstream providers only through this trait, so
//! the HTTP transport can be swapped for a stub in tests.

use crate::core::models::ChatCompletionRequest;
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::Stream;
use serde_json::Value;
use std::pin::Pin;

/// A lazy sequence of provider-native streaming chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Value>> + Send>>;

/// Client capability for one upstream call with a chosen credential
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Buffered chat completion; returns the provider response body verbatim
    async fn chat_completion(
        &self,
        provider: &str,
        credential: &str,
        request: &ChatCompletionRequest,
    ) -> Result<Value>;

    /// Streaming chat completion; yields provider-native chunk objects
    async fn chat_completion_stream(
        &self,
        provider: &str,
        credential: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChunkStream>;

    /// The provider's model catalog entries
    async fn list_models(&self, provider: &str, credential: &str) -> Result<Vec<Value>>;
}
