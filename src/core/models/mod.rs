//! Wire-level data models

pub mod openai;

pub use openai::{ChatCompletionRequest, ModelEntry, ModelListResponse};
