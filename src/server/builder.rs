//! Server startup with automatic configuration loading

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::Result;
use std::path::Path;
use tracing::info;

/// Run the server with configuration loaded from the given file
pub async fn run_server<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config_path = config_path.as_ref();
    info!("🚀 Starting keyrelay gateway");
    info!("📄 Loading configuration file: {}", config_path.display());

    let config = match Config::from_file(config_path).await {
        Ok(config) => {
            info!("✅ Configuration file loaded successfully");
            config
        }
        Err(e) => {
            info!(
                "⚠️  Configuration file loading failed, using default config: {}",
                e
            );
            info!("💡 Please ensure {} exists with provider keys", config_path.display());
            Config::default()
        }
    };

    let server = HttpServer::new(&config).await?;
    info!(
        "🌐 Server starting at: http://{}:{}",
        server.config().host,
        server.config().port
    );
    info!("📋 API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /v1/models - Model list");
    info!("   GET  /v1/usage - Credential usage report");
    info!("   POST /v1/chat/completions - Chat completions");

    server.start().await
}
