//! # Stream Relay
//!
//! Bridges the invoker's chunk sequence to the HTTP response body. One chunk
//! in, one body frame out, in order, with nothing buffered beyond the chunk
//! in flight — the HTTP layer pulls, the pull propagates upstream, and a
//! slow client therefore slows the upstream read instead of growing a
//! buffer.
//!
//! If the upstream sequence fails mid-stream the body is terminated where it
//! stands. The 200 status line has already been sent by then, so partial
//! output followed by an abrupt close is the observable failure mode for
//! streaming requests; clients must treat an unexpectedly-closed stream as
//! an error.

use crate::{error::ProxyError, upstream::ChunkStream};
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures_util::stream::TryStreamExt;
use serde_json::Value;

/// Wrap a chunk sequence as an incrementally-written HTTP response body.
pub fn streaming_response(chunks: ChunkStream) -> Result<Response, ProxyError> {
    let bytes = chunks.map_ok(|chunk| Bytes::from(chunk.text));
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(bytes))?)
}

/// Return the upstream's single result object as one complete JSON document.
pub fn unary_response(result: Value) -> Response {
    Json(result).into_response()
}
