use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Central error type for the proxy.
///
/// Every failure a handler can hit is converted into one of these variants,
/// and `IntoResponse` renders all of them as a JSON body of the shape
/// `{ "error": <message> }` — a raw, bodyless 500 must never escape.
#[derive(Debug)]
pub enum ProxyError {
    /// The credential pool is unset or empty. Fatal configuration problem,
    /// surfaced per-request with a descriptive message; never retried.
    Configuration(String),
    /// The inbound request was malformed (missing fields, bad JSON).
    BadRequest(String),
    /// The generation backend rejected the request or failed mid-call.
    /// Carries the upstream HTTP status when one was distinguishable.
    Upstream {
        status: Option<u16>,
        message: String,
    },
    /// Anything else: serialization bugs, response construction failures.
    Internal(String),
}

impl ProxyError {
    /// Shorthand for an upstream failure with no usable status code.
    pub fn upstream(message: impl Into<String>) -> Self {
        ProxyError::Upstream {
            status: None,
            message: message.into(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ProxyError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ProxyError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ProxyError::Upstream { status, message } => {
                // Use the upstream's own status when we have one; otherwise the
                // failure is attributed to the gateway hop.
                let code = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (code, message)
            }
            ProxyError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            ProxyError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ProxyError::Upstream {
                status: Some(status),
                message,
            } => write!(f, "Upstream error (HTTP {}): {}", status, message),
            ProxyError::Upstream {
                status: None,
                message,
            } => write!(f, "Upstream error: {}", message),
            ProxyError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ProxyError {}

impl From<reqwest::Error> for ProxyError {
    /// Classify transport-layer failures against the generation backend.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::upstream("request timeout - generation backend did not respond in time")
        } else if err.is_connect() {
            ProxyError::upstream("connection failed - unable to reach generation backend")
        } else if let Some(status) = err.status() {
            ProxyError::Upstream {
                status: Some(status.as_u16()),
                message: format!("HTTP {}: {}", status.as_u16(), err),
            }
        } else {
            ProxyError::upstream(format!("HTTP client error: {}", err))
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::Internal(format!("JSON error: {}", err))
    }
}

impl From<axum::http::Error> for ProxyError {
    fn from(err: axum::http::Error) -> Self {
        ProxyError::Internal(format!("HTTP protocol error: {}", err))
    }
}
