// crates/content-gate-mcp/src/auth.rs
// ============================================================================
// Module: Tool Authn/Authz
// Description: Authentication and authorization enforcement for tool calls.
// Purpose: Provide strict, fail-closed auth policies for inbound requests.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Authn/authz interfaces for inbound tool calls with default policies for
//! local-only and bearer token enforcement. All decisions are fail-closed
//! and emit audit events. Inbound auth is independent of the per-call
//! platform credentials: a caller authorized here still needs a valid
//! `api_token` argument for any platform operation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::Write;
use std::net::IpAddr;

use serde::Serialize;
use thiserror::Error;

use crate::config::ServerAuthConfig;
use crate::config::ServerAuthMode;
use crate::config::ServerTransport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Hard cap on the inbound authorization header size.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request context used for auth decisions.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Transport used by the caller.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer_ip: Option<IpAddr>,
    /// Authorization header value (HTTP).
    pub auth_header: Option<String>,
}

impl RequestContext {
    /// Builds a stdio request context.
    #[must_use]
    pub const fn stdio() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            peer_ip: None,
            auth_header: None,
        }
    }

    /// Builds an HTTP request context.
    #[must_use]
    pub const fn http(peer_ip: Option<IpAddr>, auth_header: Option<String>) -> Self {
        Self {
            transport: ServerTransport::Http,
            peer_ip,
            auth_header,
        }
    }

    /// Returns true when the peer IP is loopback.
    #[must_use]
    pub fn peer_is_loopback(&self) -> bool {
        self.peer_ip.is_some_and(|ip| ip.is_loopback())
    }
}

// ============================================================================
// SECTION: Auth Context
// ============================================================================

/// Authenticated caller context.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authentication method.
    pub method: AuthMethod,
    /// Subject label for auditing.
    pub subject: String,
}

impl AuthContext {
    /// Returns a stable label for the authentication method.
    const fn method_label(&self) -> &'static str {
        match self.method {
            AuthMethod::Local => "local",
            AuthMethod::BearerToken => "bearer_token",
        }
    }
}

/// Authentication method used for the request.
#[derive(Debug, Clone, Copy)]
pub enum AuthMethod {
    /// Local-only loopback or stdio access.
    Local,
    /// Bearer token authentication.
    BearerToken,
}

/// Authz action for inbound requests.
#[derive(Debug, Clone, Copy)]
pub enum AuthAction<'a> {
    /// List tools action.
    ListTools,
    /// Tool call action against a domain tool.
    CallTool(&'a str),
}

impl AuthAction<'_> {
    /// Returns the action label used in audit events.
    fn label(self) -> String {
        match self {
            Self::ListTools => "tools/list".to_string(),
            Self::CallTool(domain) => domain.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authentication or authorization errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or invalid authentication.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Authn/authz interface for inbound tool calls.
pub trait ToolAuthz: Send + Sync {
    /// Authorize a tool request. Returns an authenticated context on success.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the request is not authenticated.
    fn authorize(
        &self,
        ctx: &RequestContext,
        action: AuthAction<'_>,
    ) -> Result<AuthContext, AuthError>;
}

/// Audit sink for auth decisions.
pub trait AuthAuditSink: Send + Sync {
    /// Record an auth audit event.
    fn record(&self, event: &AuthAuditEvent);
}

// ============================================================================
// SECTION: Default Policies
// ============================================================================

/// Default authz implementation derived from server config.
pub struct DefaultToolAuthz {
    /// Configured auth mode.
    mode: ServerAuthMode,
    /// Accepted bearer tokens.
    bearer_tokens: BTreeSet<String>,
}

impl DefaultToolAuthz {
    /// Builds a default authz policy from server auth configuration.
    #[must_use]
    pub fn from_config(config: Option<&ServerAuthConfig>) -> Self {
        let mode = config.map_or(ServerAuthMode::LocalOnly, |cfg| cfg.mode);
        let bearer_tokens =
            config.map(|cfg| cfg.bearer_tokens.iter().cloned().collect()).unwrap_or_default();
        Self {
            mode,
            bearer_tokens,
        }
    }

    /// Returns the configured auth mode.
    #[must_use]
    pub const fn mode(&self) -> ServerAuthMode {
        self.mode
    }
}

impl ToolAuthz for DefaultToolAuthz {
    fn authorize(
        &self,
        ctx: &RequestContext,
        _action: AuthAction<'_>,
    ) -> Result<AuthContext, AuthError> {
        match self.mode {
            ServerAuthMode::LocalOnly => authorize_local_only(ctx),
            ServerAuthMode::BearerToken => authorize_bearer(ctx, &self.bearer_tokens),
        }
    }
}

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Auth audit event payload.
#[derive(Debug, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    event: &'static str,
    /// Decision outcome.
    decision: &'static str,
    /// Action name.
    action: String,
    /// Transport label.
    transport: &'static str,
    /// Caller IP address (if available).
    peer_ip: Option<String>,
    /// Auth method label.
    auth_method: Option<&'static str>,
    /// Caller subject or identity label.
    subject: Option<String>,
    /// Failure reason (for deny events).
    reason: Option<String>,
}

impl AuthAuditEvent {
    /// Builds an allow event.
    #[must_use]
    pub fn allowed(ctx: &RequestContext, action: AuthAction<'_>, auth: &AuthContext) -> Self {
        Self {
            event: "tool_authz",
            decision: "allow",
            action: action.label(),
            transport: transport_label(ctx.transport),
            peer_ip: ctx.peer_ip.map(|ip| ip.to_string()),
            auth_method: Some(auth.method_label()),
            subject: Some(auth.subject.clone()),
            reason: None,
        }
    }

    /// Builds a deny event.
    #[must_use]
    pub fn denied(ctx: &RequestContext, action: AuthAction<'_>, error: &AuthError) -> Self {
        Self {
            event: "tool_authz",
            decision: "deny",
            action: action.label(),
            transport: transport_label(ctx.transport),
            peer_ip: ctx.peer_ip.map(|ip| ip.to_string()),
            auth_method: None,
            subject: None,
            reason: Some(error.to_string()),
        }
    }
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuthAuditSink;

impl AuthAuditSink for StderrAuthAuditSink {
    fn record(&self, event: &AuthAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuthAuditSink;

impl AuthAuditSink for NoopAuthAuditSink {
    fn record(&self, _event: &AuthAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a stable label for the transport.
const fn transport_label(transport: ServerTransport) -> &'static str {
    match transport {
        ServerTransport::Stdio => "stdio",
        ServerTransport::Http => "http",
    }
}

/// Allows stdio and loopback HTTP callers only.
fn authorize_local_only(ctx: &RequestContext) -> Result<AuthContext, AuthError> {
    match ctx.transport {
        ServerTransport::Stdio => Ok(AuthContext {
            method: AuthMethod::Local,
            subject: "stdio".to_string(),
        }),
        ServerTransport::Http => {
            if ctx.peer_is_loopback() {
                Ok(AuthContext {
                    method: AuthMethod::Local,
                    subject: "loopback".to_string(),
                })
            } else {
                Err(AuthError::Unauthenticated(
                    "local-only mode requires loopback access".to_string(),
                ))
            }
        }
    }
}

/// Validates a bearer token against the configured set.
fn authorize_bearer(
    ctx: &RequestContext,
    tokens: &BTreeSet<String>,
) -> Result<AuthContext, AuthError> {
    let token = parse_bearer_token(ctx.auth_header.as_deref())?;
    if !tokens.contains(&token) {
        return Err(AuthError::Unauthenticated("invalid bearer token".to_string()));
    }
    Ok(AuthContext {
        method: AuthMethod::BearerToken,
        subject: "bearer".to_string(),
    })
}

/// Extracts the token from an `Authorization: Bearer` header.
fn parse_bearer_token(auth_header: Option<&str>) -> Result<String, AuthError> {
    let header = auth_header
        .ok_or_else(|| AuthError::Unauthenticated("missing authorization".to_string()))?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(AuthError::Unauthenticated("authorization header too large".to_string()));
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::Unauthenticated("invalid authorization header".to_string()));
    }
    Ok(token.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
