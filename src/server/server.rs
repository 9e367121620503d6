//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::core::completion::RequestCoordinator;
use crate::core::providers::OpenAiCompatBackend;
use crate::core::rate_limiter::RateLimiter;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::StateFile;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, web};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server, wiring up all shared state
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let config = Arc::new(config.clone());
        let store = StateFile::new(&config.storage.state_file);
        let limiter = Arc::new(RateLimiter::open(store).await?);
        let backend = Arc::new(OpenAiCompatBackend::new(&config));
        let coordinator = Arc::new(RequestCoordinator::new(
            config.clone(),
            limiter,
            backend,
        ));

        Ok(Self {
            config: config.server.clone(),
            state: AppState::new(config, coordinator),
        })
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(Cors::permissive())
                .wrap(TracingLogger::default())
                .route("/health", web::get().to(routes::health::health_check))
                .configure(routes::configure_routes)
        })
        .bind(&bind_addr)
        .map_err(|e| {
            GatewayError::config(format!("Failed to bind {}: {}", bind_addr, e))
        })?
        .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::config(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
