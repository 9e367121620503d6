//! Health check endpoint

use actix_web::{HttpResponse, Result as ActixResult};
use serde_json::json;

/// Liveness probe
pub async fn health_check() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
