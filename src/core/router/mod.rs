//! Credential and model routing
//!
//! Key pools, the admission-aware key selection policy, and resolution of the
//! `auto-model` pseudo-model.

mod auto_model;
mod key_pool;
mod selection;

#[cfg(test)]
mod tests;

pub use auto_model::{AUTO_MODEL_ID, ModelRouter, provider_for_model};
pub use key_pool::KeyPool;
pub use selection::KeySelector;
