//! Streaming relay
//!
//! Reformats a live sequence of provider-native chunks into wire-ready SSE
//! frames for the caller. The relay is pull-based: a frame is produced only
//! when the consumer polls for it, so backpressure is implicit and dropping
//! the output stream abandons the upstream source.

use super::types::{
    StreamChunk, data_frame, done_frame, error_frame, keep_alive_frame,
};
use crate::config::StreamingConfig;
use crate::utils::error::Result;
use actix_web::web::Bytes;
use futures::stream::{Stream, StreamExt};
use serde_json::json;
use tracing::{debug, error, warn};

/// Relay provider chunks as SSE frames
///
/// Emits a keep-alive comment when no real frame has gone out for the
/// configured interval, aborts with an error frame when the idle ceiling is
/// reached or the source fails, and always terminates with the `[DONE]`
/// sentinel.
pub fn relay_sse<S>(
    source: S,
    settings: StreamingConfig,
) -> impl Stream<Item = Result<Bytes>> + Send
where
    S: Stream<Item = Result<serde_json::Value>> + Send + 'static,
{
    async_stream::stream! {
        tokio::pin!(source);
        let mut last_frame = tokio::time::Instant::now();

        loop {
            tokio::select! {
                chunk = source.next() => match chunk {
                    Some(Ok(value)) => {
                        if let Some(frame) = format_stream_chunk(&value) {
                            last_frame = tokio::time::Instant::now();
                            yield Ok(frame);
                        } else {
                            debug!("Skipping empty or malformed stream chunk");
                        }
                    }
                    Some(Err(e)) => {
                        error!("Streaming error: {}", e);
                        yield Ok(error_frame(&e.to_string()));
                        break;
                    }
                    None => break,
                },
                _ = tokio::time::sleep(settings.keep_alive()) => {
                    if last_frame.elapsed() >= settings.idle_timeout() {
                        warn!(
                            idle_secs = settings.idle_timeout_secs,
                            "Stream idle past the ceiling, terminating relay"
                        );
                        yield Ok(error_frame("stream timed out"));
                        break;
                    }
                    yield Ok(keep_alive_frame());
                }
            }
        }

        yield Ok(done_frame());
    }
}

/// Reshape one provider chunk into a wire frame
///
/// A chunk is either a tool-call delta or a content delta; chunks with no
/// usable delta are dropped, never surfaced to the caller.
pub fn format_stream_chunk(value: &serde_json::Value) -> Option<Bytes> {
    let chunk: StreamChunk = serde_json::from_value(value.clone()).ok()?;
    let choice = chunk.choices.first()?;

    if let Some(tool_calls) = choice
        .delta
        .tool_calls
        .as_ref()
        .filter(|calls| !calls.is_empty())
    {
        let calls: Vec<serde_json::Value> =
            tool_calls.iter().map(|call| call.to_wire()).collect();
        return Some(data_frame(&json!({
            "choices": [{
                "index": choice.index,
                "delta": { "tool_calls": calls }
            }]
        })));
    }

    let content = choice.delta.content.as_deref().filter(|c| !c.is_empty())?;
    Some(data_frame(&json!({
        "choices": [{
            "index": choice.index,
            "delta": { "content": content }
        }]
    })))
}
