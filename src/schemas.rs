//! Request and wire data structures.
//!
//! The inbound request mirrors the browser's generation payload. `contents`
//! and `config` are deliberately opaque `Value`s: the proxy forwards them to
//! the backend untouched, so upstream schema additions need no code change
//! here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One generation request as posted by the browser client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Upstream model identifier, e.g. "gemini-2.0-flash".
    pub model: String,
    /// Conversation/content payload, passed through opaquely.
    pub contents: Value,
    /// Generation configuration (temperature, max tokens, ...), passed
    /// through opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    /// Whether the caller wants an incremental streaming response.
    #[serde(default)]
    pub stream: bool,
}

/// One incremental piece of generated text within a streaming response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationChunk {
    pub text: String,
}

impl GenerationChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// OpenRouter-style streaming frame payload, as consumed by the client-side
/// delta parser: `{"choices":[{"delta":{"content":"..."}}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamFrame {
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    pub delta: StreamDelta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl StreamFrame {
    /// Build a frame carrying one content delta. Used by tests and by
    /// anything that needs to synthesize the OpenRouter wire convention.
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            choices: vec![StreamChoice {
                delta: StreamDelta {
                    content: Some(text.into()),
                },
            }],
        }
    }
}
