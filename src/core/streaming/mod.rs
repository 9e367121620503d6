//! Streaming response handling
//!
//! Server-Sent Events relay between provider streams and the caller.

mod relay;
mod types;


pub use relay::{format_stream_chunk, relay_sse};
pub use types::{
    FunctionDelta, StreamChoice, StreamChunk, StreamDelta, ToolCallDelta, data_frame,
    done_frame, error_frame, keep_alive_frame,
};

use crate::utils::error::Result;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{HttpResponse, web};
use futures::stream::Stream;

/// Create a Server-Sent Events response for actix-web
pub fn create_sse_response<S>(stream: S) -> HttpResponse
where
    S: Stream<Item = Result<web::Bytes>> + 'static,
{
    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .insert_header(("Connection", "keep-alive"))
        .streaming(stream)
}
