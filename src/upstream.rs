//! # Upstream Invoker
//!
//! Talks to the Gemini-style generation backend. One credential in, one call
//! out: unary requests come back as the upstream's JSON verbatim, streaming
//! requests come back as a pull-based sequence of text chunks decoded from
//! the upstream's SSE wire. No retries, no credential failover, and no
//! inspection of `contents`/`config` — they pass through opaquely.

use crate::{
    config::Config,
    credentials::Credential,
    error::ProxyError,
    schemas::{GenerationChunk, GenerationRequest},
    sse,
};
use async_trait::async_trait;
use futures_util::stream::{Stream, StreamExt, TryStreamExt};
use reqwest::Client;
use serde_json::{json, Value};
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Boxed pull-based chunk sequence produced by a streaming call.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<GenerationChunk, ProxyError>> + Send>>;

/// Seam between the gateway and the vendor API. The production
/// implementation is [`GeminiInvoker`]; tests substitute their own.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Unary call: the upstream's single result object, returned verbatim.
    async fn generate(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<Value, ProxyError>;

    /// Streaming call: a lazy sequence of text chunks, terminated by
    /// upstream stream closure.
    async fn generate_stream(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<ChunkStream, ProxyError>;
}

/// Invoker for the Gemini `generateContent` family of endpoints.
#[derive(Clone)]
pub struct GeminiInvoker {
    base: String,
    client: Client,
}

impl GeminiInvoker {
    pub fn from_config(config: &Config) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.upstream_connect_timeout))
            .read_timeout(Duration::from_secs(config.upstream_read_timeout))
            .build()
            .map_err(|e| ProxyError::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(config.upstream_url.clone(), client))
    }

    pub fn with_client(base: String, client: Client) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn endpoint(&self, model: &str, operation: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base, model, operation)
    }

    /// The upstream request body. `contents` and `generationConfig` ride
    /// through unchanged, which keeps the proxy forward-compatible with
    /// upstream schema additions.
    fn request_body(request: &GenerationRequest) -> Value {
        let mut body = json!({ "contents": request.contents });
        if let Some(config) = &request.config {
            body["generationConfig"] = config.clone();
        }
        body
    }

    async fn send(
        &self,
        url: &str,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<reqwest::Response, ProxyError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", credential.secret())
            .json(&Self::request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "upstream rejected request");
            return Err(ProxyError::Upstream {
                status: Some(status.as_u16()),
                message: upstream_message(&body, status.as_u16()),
            });
        }
        Ok(response)
    }
}

/// Pull the human-readable message out of an upstream error body when it has
/// the conventional `{"error":{"message":...}}` shape, else fall back to the
/// raw text.
fn upstream_message(body: &str, status: u16) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                format!("upstream returned HTTP {}", status)
            } else {
                body.to_string()
            }
        })
}

#[async_trait]
impl GenerationBackend for GeminiInvoker {
    async fn generate(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<Value, ProxyError> {
        let url = self.endpoint(&request.model, "generateContent");
        let response = self.send(&url, request, credential).await?;
        let result = response.json::<Value>().await?;
        Ok(result)
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<ChunkStream, ProxyError> {
        let url = format!(
            "{}?alt=sse",
            self.endpoint(&request.model, "streamGenerateContent")
        );
        let response = self.send(&url, request, credential).await?;

        // Decode the upstream SSE incrementally; each frame's candidate text
        // becomes one chunk. Pull-based: nothing is read from the socket
        // until the relay asks for the next chunk.
        let bytes = Box::pin(response.bytes_stream().map_err(ProxyError::from));
        let chunks = sse::delta_stream(bytes, sse::gemini_text)
            .map(|delta| delta.map(GenerationChunk::new));
        Ok(Box::pin(chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoker() -> GeminiInvoker {
        GeminiInvoker::with_client("http://localhost:9999/".to_string(), Client::new())
    }

    #[test]
    fn test_endpoint_building() {
        let invoker = invoker();
        assert_eq!(
            invoker.endpoint("gemini-2.0-flash", "generateContent"),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_passes_contents_and_config_through() {
        let request = GenerationRequest {
            model: "gemini-2.0-flash".to_string(),
            contents: json!([{"role": "user", "parts": [{"text": "hi"}]}]),
            config: Some(json!({"temperature": 0.7, "futureKnob": true})),
            stream: true,
        };
        let body = GeminiInvoker::request_body(&request);
        assert_eq!(body["contents"], request.contents);
        assert_eq!(body["generationConfig"]["futureKnob"], json!(true));
    }

    #[test]
    fn test_request_body_omits_absent_config() {
        let request = GenerationRequest {
            model: "gemini-2.0-flash".to_string(),
            contents: json!("hola"),
            config: None,
            stream: false,
        };
        let body = GeminiInvoker::request_body(&request);
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_upstream_message_extraction() {
        let body = r#"{"error":{"message":"API key not valid","code":400}}"#;
        assert_eq!(upstream_message(body, 400), "API key not valid");
        assert_eq!(upstream_message("plain failure", 500), "plain failure");
        assert_eq!(upstream_message("", 503), "upstream returned HTTP 503");
    }
}
