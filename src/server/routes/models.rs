//! Model catalog endpoint

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::debug;

/// List available models
///
/// Upstream catalog fetch failures are swallowed; the synthetic auto-model
/// entry is always present.
pub async fn list_models(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Listing available models");
    let catalog = state.coordinator.list_models().await;
    Ok(HttpResponse::Ok().json(catalog))
}
