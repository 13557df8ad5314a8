//! Shared application state passed to every handler.

use crate::{
    config::Config,
    credentials::CredentialPool,
    error::ProxyError,
    upstream::{GeminiInvoker, GenerationBackend},
};
use std::sync::Arc;

/// State shared across concurrent requests. The credential pool's cursor is
/// the only mutable piece; everything else is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: Arc<CredentialPool>,
    pub backend: Arc<dyn GenerationBackend>,
}

impl AppState {
    /// Build state for production: credentials from the environment
    /// (fail-fast when absent) and the Gemini invoker as backend.
    pub fn from_config(config: Config) -> Result<Self, ProxyError> {
        let pool = Arc::new(CredentialPool::from_env(&config.credentials_env)?);
        let backend = Arc::new(GeminiInvoker::from_config(&config)?);
        Ok(Self {
            config,
            pool,
            backend,
        })
    }

    /// Build state from explicit parts. Tests use this to inject an empty
    /// pool or a mock backend.
    pub fn with_parts(
        config: Config,
        pool: Arc<CredentialPool>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            config,
            pool,
            backend,
        }
    }
}
