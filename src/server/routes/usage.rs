//! Credential usage introspection endpoint

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};

/// Report per-provider and per-key usage from the rate limit tracker
pub async fn usage(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.coordinator.usage_report()))
}
