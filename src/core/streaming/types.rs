//! Type definitions for streaming responses

use actix_web::web::Bytes;
use serde::Deserialize;
use serde_json::json;

/// Provider-native streaming chunk, as far as the relay needs to see it
///
/// Unknown fields are ignored; a chunk that fails to deserialize into this
/// shape is malformed and gets skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    /// Completion choices carried by the chunk
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

/// A choice in a streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// The incremental delta
    #[serde(default)]
    pub delta: StreamDelta,
}

/// Delta payload of a streaming choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDelta {
    /// Incremental content
    #[serde(default)]
    pub content: Option<String>,
    /// Incremental tool calls
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

/// Tool call fragment within a delta
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallDelta {
    /// Position in the tool_calls array
    #[serde(default)]
    pub index: u32,
    /// Tool call id (first fragment only)
    #[serde(default)]
    pub id: Option<String>,
    /// Function call fragment
    #[serde(default)]
    pub function: Option<FunctionDelta>,
}

/// Function call fragment
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDelta {
    /// Function name (first fragment only)
    #[serde(default)]
    pub name: Option<String>,
    /// Incremental argument JSON
    #[serde(default)]
    pub arguments: Option<String>,
}

impl ToolCallDelta {
    /// Wire shape of a relayed tool-call fragment
    pub(super) fn to_wire(&self) -> serde_json::Value {
        json!({
            "index": self.index,
            "id": self.id,
            "type": "function",
            "function": {
                "name": self.function.as_ref().and_then(|f| f.name.clone()),
                "arguments": self.function.as_ref().and_then(|f| f.arguments.clone()),
            }
        })
    }
}

/// An SSE data frame carrying a JSON payload
pub fn data_frame(payload: &serde_json::Value) -> Bytes {
    Bytes::from(format!("data: {}\n\n", payload))
}

/// The terminal sentinel frame
pub fn done_frame() -> Bytes {
    Bytes::from_static(b"data: [DONE]\n\n")
}

/// A protocol-level comment frame that keeps the transport open
pub fn keep_alive_frame() -> Bytes {
    Bytes::from_static(b": keep-alive\n\n")
}

/// An error frame surfaced to the caller before the sentinel
pub fn error_frame(message: &str) -> Bytes {
    data_frame(&json!({ "error": message }))
}
