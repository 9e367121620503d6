//! HTTP route modules

pub mod chat;
pub mod health;
pub mod models;
pub mod usage;

use actix_web::web;

/// Configure the gateway's API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/chat/completions", web::post().to(chat::chat_completions))
            .route("/models", web::get().to(models::list_models))
            .route("/usage", web::get().to(usage::usage)),
    );
}
