//! # Lingua Proxy
//!
//! The generative-AI gateway behind the Lingua language-learning app, plus
//! the client-side stream consumer. The server half accepts generation
//! requests over HTTP, rotates round-robin across a pool of upstream API
//! credentials, invokes a Gemini-style generation backend (unary or
//! streaming), and relays streaming responses incrementally — one upstream
//! chunk, one body write, pull-based end to end. The client half turns an
//! OpenRouter-style SSE response into a lazy, cancellable stream of text
//! deltas for progressive rendering.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lingua_proxy::{AppState, Config, create_router};
//! use std::net::SocketAddr;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::parse_args();
//!     let state = AppState::from_config(config)?;
//!     let app = create_router(state);
//!
//!     let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - CLI/environment configuration
//! - [`credentials`] - round-robin credential pool
//! - [`upstream`] - Gemini-style backend invoker
//! - [`sse`] - incremental SSE frame decoding and payload adapters
//! - [`relay`] - upstream chunk sequence → HTTP response body
//! - [`server`] - router, state, and handlers
//! - [`client`] - client-side delta-stream consumer
//! - [`error`] - error taxonomy

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod relay;
pub mod schemas;
pub mod server;
pub mod sse;
pub mod upstream;

pub use client::{ClientConfig, ClientError, DeltaStream, StreamingClient};
pub use config::Config;
pub use credentials::{Credential, CredentialPool};
pub use error::ProxyError;
pub use schemas::{GenerationChunk, GenerationRequest, StreamFrame};
pub use server::{create_router, AppState};
pub use upstream::{GeminiInvoker, GenerationBackend};

/// The result type used throughout the library.
pub type Result<T> = std::result::Result<T, ProxyError>;
