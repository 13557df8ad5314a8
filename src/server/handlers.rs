//! HTTP handlers for the gateway.

use super::AppState;
use crate::{error::ProxyError, relay, schemas::GenerationRequest};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as JsonResponse, Response},
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// Generation entry point: credential pool → upstream invoker → relay.
///
/// `stream` selects the response shape. Any error that occurs before the
/// response has started renders as `{ "error": <message> }` with a non-2xx
/// status via [`ProxyError::into_response`]; an error after streaming has
/// begun terminates the body instead (the status line is already gone).
/// The body is parsed by hand rather than through the `Json` extractor so
/// malformed input gets the same error shape as everything else.
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let request: GenerationRequest = serde_json::from_slice(&body)
        .map_err(|e| ProxyError::BadRequest(format!("invalid generation request: {}", e)))?;

    let span = info_span!(
        "generate",
        request_id = %Uuid::new_v4(),
        model = %request.model,
        stream = request.stream,
    );

    async move {
        // No credentials is a configuration error; the upstream is never
        // attempted in that case.
        let credential = state.pool.next()?;

        if request.stream {
            let chunks = state.backend.generate_stream(&request, credential).await?;
            relay::streaming_response(chunks)
        } else {
            let result = state.backend.generate(&request, credential).await?;
            Ok(relay::unary_response(result))
        }
    }
    .instrument(span)
    .await
}

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    let health_status = serde_json::json!({
        "status": "healthy",
        "service": "lingua-proxy",
        "version": env!("CARGO_PKG_VERSION")
    });

    (StatusCode::OK, JsonResponse(health_status))
}
