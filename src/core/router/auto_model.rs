//! Auto-model resolution
//!
//! Callers may request the `auto-model` pseudo-model instead of a concrete
//! one; the router walks the configured preference list and picks the first
//! model whose provider still has an admissible credential.

use super::selection::KeySelector;
use std::sync::Arc;
use tracing::debug;

/// Pseudo-model id that triggers auto-routing
pub const AUTO_MODEL_ID: &str = "auto-model";

/// Derive the owning provider from a model identifier
///
/// Model ids starting with `gemini` belong to the Gemini provider; everything
/// else is served through OpenRouter.
pub fn provider_for_model(model: &str) -> &'static str {
    if model.starts_with("gemini") {
        "gemini"
    } else {
        "openrouter"
    }
}

/// Resolves the `auto-model` pseudo-model to a concrete model
pub struct ModelRouter {
    auto_models: Vec<String>,
    selector: Arc<KeySelector>,
}

impl ModelRouter {
    /// Create a router over the configured preference list
    pub fn new(auto_models: Vec<String>, selector: Arc<KeySelector>) -> Self {
        Self {
            auto_models,
            selector,
        }
    }

    /// First candidate model whose provider admits a credential
    ///
    /// Probing a provider goes through regular selection, so a successful
    /// probe records an admission for the chosen credential. `None` means no
    /// candidate provider has capacity, which callers must surface as an
    /// admission failure rather than a routing error.
    pub fn resolve_auto_model(&self) -> Option<String> {
        for model in &self.auto_models {
            let provider = provider_for_model(model);
            match self.selector.select(provider) {
                Ok(_) => return Some(model.clone()),
                Err(e) => {
                    debug!(model, provider, "Auto-model candidate unavailable: {}", e);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_for_model_prefix() {
        assert_eq!(provider_for_model("gemini-2.0-flash"), "gemini");
        assert_eq!(provider_for_model("gemini-pro"), "gemini");
        assert_eq!(provider_for_model("deepseek/deepseek-r1:free"), "openrouter");
        assert_eq!(provider_for_model("auto-model"), "openrouter");
    }
}
