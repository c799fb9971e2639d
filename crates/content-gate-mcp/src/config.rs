// crates/content-gate-mcp/src/config.rs
// ============================================================================
// Module: Server Configuration
// Description: Canonical config model for content-gate.toml.
// Purpose: Strict, fail-closed validation of server and platform settings.
// Dependencies: content-gate-client, serde, toml
// ============================================================================

//! ## Overview
//! Configuration model for the Content Gate server. Loading is strict:
//! unknown validation states fail closed, a non-loopback bind without an
//! auth policy is rejected, and the stdio transport never accepts an auth
//! mode other than local-only.
//!
//! ## Invariants
//! - `validate` passes if and only if the server can start with these
//!   settings; no deferred validation at serve time.
//! - Bearer tokens never appear in rendered errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use content_gate_client::PlatformHttpConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted config file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum number of configured bearer tokens.
const MAX_AUTH_TOKENS: usize = 64;
/// Maximum accepted bearer token length in bytes.
const MAX_AUTH_TOKEN_BYTES: usize = 4 * 1024;
/// Default maximum request body size in bytes.
const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Default config file name resolved relative to the working directory.
const DEFAULT_CONFIG_FILE: &str = "content-gate.toml";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Content Gate server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentGateConfig {
    /// Server transport and auth configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound content platform connection settings.
    pub platform: PlatformHttpConfig,
}

impl ContentGateConfig {
    /// Loads configuration from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        validate_platform(&self.platform)?;
        Ok(())
    }
}

/// Server configuration for inbound transports.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Transport type.
    #[serde(default)]
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Optional authentication configuration for inbound tool calls.
    #[serde(default)]
    pub auth: Option<ServerAuthConfig>,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            bind: None,
            max_body_bytes: default_max_body_bytes(),
            auth: None,
            audit: ServerAuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validates server transport configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if let Some(auth) = &self.auth {
            auth.validate()?;
        }
        self.audit.validate()?;
        let auth_mode = self.auth.as_ref().map_or(ServerAuthMode::LocalOnly, |auth| auth.mode);
        match self.transport {
            ServerTransport::Http => {
                let bind = self.bind.as_deref().unwrap_or_default().trim();
                if bind.is_empty() {
                    return Err(ConfigError::Invalid(
                        "http transport requires bind address".to_string(),
                    ));
                }
                let addr: SocketAddr = bind
                    .parse()
                    .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))?;
                if !addr.ip().is_loopback() && auth_mode == ServerAuthMode::LocalOnly {
                    return Err(ConfigError::Invalid(
                        "non-loopback bind disallowed without auth policy".to_string(),
                    ));
                }
            }
            ServerTransport::Stdio => {
                if auth_mode != ServerAuthMode::LocalOnly {
                    return Err(ConfigError::Invalid(
                        "stdio transport only supports local_only auth".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Supported inbound transport types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// Use stdin/stdout transport.
    #[default]
    Stdio,
    /// Use HTTP JSON-RPC transport.
    Http,
}

/// Inbound auth modes for server tool calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerAuthMode {
    /// Local-only loopback or stdio access.
    #[default]
    LocalOnly,
    /// Bearer token authentication.
    BearerToken,
}

/// Server authentication configuration for inbound tool calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerAuthConfig {
    /// Auth mode for inbound tool calls.
    #[serde(default)]
    pub mode: ServerAuthMode,
    /// Accepted bearer tokens (required for `bearer_token` mode).
    #[serde(default)]
    pub bearer_tokens: Vec<String>,
}

impl ServerAuthConfig {
    /// Validates auth configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bearer_tokens.len() > MAX_AUTH_TOKENS {
            return Err(ConfigError::Invalid("too many auth tokens".to_string()));
        }
        for token in &self.bearer_tokens {
            if token.trim().is_empty() {
                return Err(ConfigError::Invalid("bearer tokens must be non-empty".to_string()));
            }
            if token.len() > MAX_AUTH_TOKEN_BYTES {
                return Err(ConfigError::Invalid("bearer token exceeds size limit".to_string()));
            }
        }
        if self.mode == ServerAuthMode::BearerToken && self.bearer_tokens.is_empty() {
            return Err(ConfigError::Invalid(
                "bearer_token mode requires at least one token".to_string(),
            ));
        }
        Ok(())
    }
}

/// Audit sink selection for tool call logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit logging disabled.
    None,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerAuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path (required for the file sink).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl ServerAuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sink == AuditSinkKind::File && self.path.is_none() {
            return Err(ConfigError::Invalid("file audit sink requires a path".to_string()));
        }
        Ok(())
    }
}

/// Validates outbound platform connection settings.
fn validate_platform(platform: &PlatformHttpConfig) -> Result<(), ConfigError> {
    if platform.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("platform.base_url must be set".to_string()));
    }
    let secure = platform.base_url.starts_with("https://");
    let insecure = platform.base_url.starts_with("http://");
    if !secure && !insecure {
        return Err(ConfigError::Invalid(
            "platform.base_url must include http:// or https://".to_string(),
        ));
    }
    if insecure && !platform.allow_insecure_http {
        return Err(ConfigError::Invalid(
            "platform.base_url uses http:// without allow_insecure_http".to_string(),
        ));
    }
    if platform.connect_timeout_ms == 0 || platform.request_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "platform timeouts must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem read failure.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse failure.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Semantic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
