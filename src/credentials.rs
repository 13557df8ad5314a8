//! # Credential Pool
//!
//! Holds the upstream API keys and hands them out round-robin. The cursor is
//! a single `AtomicUsize` advanced with `fetch_add`, so selection is one
//! atomic step. Concurrent requests may still interleave in any order —
//! this is best-effort load distribution across keys, not exclusive access.

use crate::error::ProxyError;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// One upstream API key. The inner secret is reachable only through
/// [`Credential::secret`]; `Debug` is redacted so a credential can never
/// leak through log formatting.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Ordered set of credentials plus the round-robin cursor.
#[derive(Debug)]
pub struct CredentialPool {
    keys: Vec<Credential>,
    cursor: AtomicUsize,
}

impl CredentialPool {
    /// Load the pool from a comma-separated environment variable. Empty
    /// entries (stray commas, whitespace) are dropped. An unset or empty
    /// variable is a configuration error — the binary treats it as fatal at
    /// startup.
    pub fn from_env(var: &str) -> Result<Self, ProxyError> {
        let raw = env::var(var).map_err(|_| {
            ProxyError::Configuration(format!("environment variable {} is not set", var))
        })?;

        let pool = Self::from_keys(
            raw.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
        );

        if pool.is_empty() {
            return Err(ProxyError::Configuration(format!(
                "environment variable {} contains no credentials",
                var
            )));
        }

        info!(count = pool.len(), "loaded upstream credential pool");
        Ok(pool)
    }

    /// Build a pool from explicit keys. An empty list is allowed here so the
    /// per-request failure path stays constructible; `next()` reports the
    /// configuration error.
    pub fn from_keys(keys: Vec<String>) -> Self {
        Self {
            keys: keys.into_iter().map(Credential).collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Select the current credential and advance the cursor in one atomic
    /// step. Relaxed ordering is enough: the cursor guards nothing but
    /// itself, and fairness under contention is best-effort by design.
    pub fn next(&self) -> Result<&Credential, ProxyError> {
        if self.keys.is_empty() {
            return Err(ProxyError::Configuration(
                "no upstream credentials configured".to_string(),
            ));
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        Ok(&self.keys[index])
    }
}
