//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::completion::RequestCoordinator;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for cheap cloning into each worker.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Request coordinator
    pub coordinator: Arc<RequestCoordinator>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Arc<Config>, coordinator: Arc<RequestCoordinator>) -> Self {
        Self {
            config,
            coordinator,
        }
    }
}
