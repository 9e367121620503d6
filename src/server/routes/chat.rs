//! Chat completion endpoint (OpenAI compatible)

use crate::core::completion::ChatReply;
use crate::core::models::ChatCompletionRequest;
use crate::core::streaming::create_sse_response;
use crate::server::state::AppState;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, ResponseError, web};
use tracing::debug;

/// Proxy a chat completion to an upstream provider
///
/// Returns the provider's JSON body unchanged, or an SSE stream when the
/// caller set the `stream` flag.
pub async fn chat_completions(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<ChatCompletionRequest>,
) -> ActixResult<HttpResponse> {
    debug!(model = %request.model, "Chat completion request");

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state
        .coordinator
        .chat_completion(auth_header, request.into_inner())
        .await
    {
        Ok(ChatReply::Completed(body)) => Ok(HttpResponse::Ok().json(body)),
        Ok(ChatReply::Streaming(frames)) => Ok(create_sse_response(frames)),
        Err(e) => Ok(e.error_response()),
    }
}
