//! OpenAI-compatible request and response models
//!
//! The gateway relays payloads mostly untouched, so only the fields it
//! actually inspects are typed; everything else rides along in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chat completion request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Requested model, possibly the `auto-model` pseudo-model
    pub model: String,
    /// Conversation messages, passed through verbatim
    pub messages: Vec<Value>,
    /// Tool definitions, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Whether the caller wants a live token stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Completion length cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Any further fields, forwarded unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionRequest {
    /// Build a minimal request for the given model and messages
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            stream: None,
            temperature: None,
            max_tokens: None,
            extra: Map::new(),
        }
    }

    /// Drop an empty-but-present tool list
    ///
    /// Upstream providers reject `"tools": []`, so it must not survive into
    /// the dispatched payload.
    pub fn strip_empty_tools(&mut self) {
        if self.tools.as_ref().is_some_and(Vec::is_empty) {
            self.tools = None;
        }
    }

    /// Whether the caller requested streaming
    pub fn is_streaming(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

/// One entry of the model catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model identifier
    pub id: String,
    /// Object type, always `model`
    pub object: String,
    /// Owning organization
    pub owned_by: String,
}

impl ModelEntry {
    /// Create a catalog entry
    pub fn new(id: impl Into<String>, owned_by: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: "model".to_string(),
            owned_by: owned_by.into(),
        }
    }
}

/// The model catalog response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListResponse {
    /// Object type, always `list`
    pub object: String,
    /// Catalog entries
    pub data: Vec<ModelEntry>,
}

impl ModelListResponse {
    /// Wrap catalog entries in the list envelope
    pub fn new(data: Vec<ModelEntry>) -> Self {
        Self {
            object: "list".to_string(),
            data,
        }
    }
}
