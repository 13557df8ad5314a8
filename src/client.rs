//! # Client-Side Stream Consumer
//!
//! The browser-facing half of the system: opens a streaming chat request
//! against an OpenRouter-style endpoint and exposes the response as a lazy,
//! single-pass stream of text deltas for progressive UI rendering.
//!
//! Error discipline mirrors the wire contract: a non-success HTTP status or
//! a network failure is a typed, terminal error; an individual frame that
//! fails to parse is skipped and never reaches the consumer. Dropping the
//! delta stream drops the underlying response, so cancelling mid-stream
//! stops all further transport reads.

use crate::sse;
use futures_util::stream::{Stream, TryStreamExt};
use reqwest::{header::HeaderMap, Client};
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;

/// Lazy sequence of text deltas from one streaming request.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>;

/// Client-side error taxonomy. Malformed individual frames are deliberately
/// absent: they are recovered locally by skipping the frame.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
}

/// Configuration for the streaming client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Idle-read timeout between deltas.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(60),
        }
    }
}

/// Streaming chat client over a pooled reqwest client.
pub struct StreamingClient {
    client: Client,
    config: ClientConfig,
}

impl StreamingClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Use a pre-built client (tests, custom pooling).
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Open a streaming request and return the delta sequence.
    ///
    /// `headers` carries whatever the caller's endpoint requires
    /// (authorization and friends); the client itself holds no credentials.
    /// A non-2xx status surfaces here, before any delta is yielded; after
    /// that, the only error the stream can produce is a transport failure,
    /// raised exactly once.
    pub async fn stream_chat(
        &self,
        body: &Value,
        headers: HeaderMap,
    ) -> Result<DeltaStream, ClientError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| ClientError::Transport(e.to_string())),
        );
        Ok(Box::pin(sse::delta_stream(bytes, sse::openai_delta)))
    }
}
