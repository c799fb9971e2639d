// crates/content-gate-client/src/cache.rs
// ============================================================================
// Module: Client Cache
// Description: Memoized platform clients keyed by credential pair.
// Purpose: Reuse one transport per token/environment across tool calls.
// Dependencies: serde_json (transitively via api)
// ============================================================================

//! ## Overview
//! Tool calls carry their own credentials, so a session can address many
//! environments. [`ClientCache`] memoizes one [`PlatformClient`] per
//! token/environment pair; repeated calls with the same pair share one
//! connection pool.
//!
//! ## Invariants
//! - Construction happens under the cache lock; two concurrent calls with
//!   the same key never build two transports.
//! - A poisoned lock surfaces as [`ClientError::Lock`], never a panic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use thiserror::Error;

use crate::api::PlatformClient;
use crate::error::ApiError;
use crate::http::HttpPlatformApi;
use crate::http::HttpTransport;
use crate::http::PlatformHttpConfig;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Credential pair identifying one cached client.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ClientKey {
    /// Management API token.
    token: String,
    /// Target sandbox environment, when selected.
    environment: Option<String>,
}

/// Cache construction and lookup failures.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport construction failed for this credential pair.
    #[error("failed to build platform client: {0}")]
    Build(String),
    /// Cache lock was poisoned by a panicking holder.
    #[error("client cache lock poisoned")]
    Lock,
}

/// Memoized platform clients keyed by credential pair.
pub struct ClientCache {
    /// Connection settings shared by every client built here.
    config: PlatformHttpConfig,
    /// Built clients by credential pair.
    clients: Mutex<BTreeMap<ClientKey, Arc<PlatformClient>>>,
}

// ============================================================================
// SECTION: Implementation
// ============================================================================

impl ClientCache {
    /// Creates an empty cache over one connection configuration.
    #[must_use]
    pub const fn new(config: PlatformHttpConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the memoized client for a credential pair, building it on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the transport cannot be
    /// constructed and [`ClientError::Lock`] when the cache lock is
    /// poisoned.
    pub fn get_or_create(
        &self,
        token: &str,
        environment: Option<&str>,
    ) -> Result<Arc<PlatformClient>, ClientError> {
        let key = ClientKey {
            token: token.to_string(),
            environment: environment.map(str::to_string),
        };
        let mut clients = self.clients.lock().map_err(|_| ClientError::Lock)?;
        if let Some(existing) = clients.get(&key) {
            return Ok(Arc::clone(existing));
        }
        let transport = HttpTransport::new(
            &self.config,
            key.token.clone(),
            key.environment.clone(),
        )
        .map_err(|err| match err {
            ApiError::Transport(message) => ClientError::Build(message),
            ApiError::Upstream { message, .. } => ClientError::Build(message),
        })?;
        let client = Arc::new(HttpPlatformApi::new(Arc::new(transport)).into_client());
        clients.insert(key, Arc::clone(&client));
        Ok(client)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
