//! # Request Gateway
//!
//! HTTP-facing entry point: a single-purpose router with the CORS and
//! tracing middleware the browser client depends on.

pub mod handlers;
pub mod state;

pub use handlers::generate;
pub use state::AppState;

use axum::{
    http::{
        header::{HeaderName, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{self, TraceLayer},
};
use tracing::Level;

/// Create the router with all routes and middleware.
///
/// The CORS layer answers `OPTIONS` preflights with `200`, wildcard origin,
/// and the header set the browser client sends: `authorization`,
/// `x-client-info`, `apikey`, `content-type`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        .route("/", post(generate))
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors),
        )
        .with_state(state)
}
