// crates/content-gate-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: JSON-RPC 2.0 server over stdio framing and HTTP POST.
// Purpose: Expose the tool router to MCP clients on both transports.
// Dependencies: axum, content-gate-client, serde, serde_json, tokio
// ============================================================================

//! ## Overview
//! The server speaks JSON-RPC 2.0 on two transports: newline-headered
//! Content-Length framing over stdio, and a single `POST /rpc` endpoint over
//! HTTP. Request handling itself is synchronous; the platform client blocks
//! on I/O, so calls bridge out of the async runtime with
//! [`tokio::task::block_in_place`] when running on a multi-thread runtime.
//!
//! ## Invariants
//! - Notifications (requests without an `id`) never produce a response,
//!   even on error.
//! - Tool failures are rendered inside the result envelope; JSON-RPC errors
//!   are reserved for protocol and auth failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use content_gate_client::ClientCache;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::audit::ToolAuditSink;
use crate::auth::AuthAuditSink;
use crate::auth::DefaultToolAuthz;
use crate::auth::NoopAuthAuditSink;
use crate::auth::RequestContext;
use crate::auth::StderrAuthAuditSink;
use crate::config::AuditSinkKind;
use crate::config::ContentGateConfig;
use crate::config::ServerAuthMode;
use crate::config::ServerTransport;
use crate::tools::ToolError;
use crate::tools::ToolRouter;
use crate::tools::ToolRouterConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// MCP protocol revision answered during initialize.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC parse error code.
const PARSE_ERROR: i64 = -32700;

/// JSON-RPC invalid request code.
const INVALID_REQUEST: i64 = -32600;

/// JSON-RPC method-not-found code.
const METHOD_NOT_FOUND: i64 = -32601;

/// JSON-RPC invalid params code.
const INVALID_PARAMS: i64 = -32602;

/// JSON-RPC internal error code.
const INTERNAL_ERROR: i64 = -32603;

/// Server-defined unauthenticated code.
const UNAUTHENTICATED: i64 = -32001;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Inbound JSON-RPC 2.0 request.
#[derive(Debug, Clone, Deserialize)]
struct JsonRpcRequest {
    /// Protocol version marker, must be "2.0".
    jsonrpc: String,
    /// Request identifier; absent for notifications.
    #[serde(default)]
    id: Option<Value>,
    /// Method name.
    method: String,
    /// Method parameters.
    #[serde(default)]
    params: Option<Value>,
}

/// Outbound JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
struct JsonRpcResponse {
    /// Protocol version marker.
    jsonrpc: &'static str,
    /// Mirrored request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Builds a success response.
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response.
    fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error payload.
#[derive(Debug, Clone, Serialize)]
struct JsonRpcError {
    /// Numeric error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

impl JsonRpcError {
    /// Builds an error payload.
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ToolError> for JsonRpcError {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::UnknownTool => Self::new(INVALID_PARAMS, "unknown tool"),
            ToolError::Unauthenticated(message) => Self::new(UNAUTHENTICATED, message),
            ToolError::Serialization => {
                Self::new(INTERNAL_ERROR, "response serialization failed")
            }
        }
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// MCP server wiring the tool router to a transport.
pub struct McpServer {
    /// Full server configuration.
    config: ContentGateConfig,
    /// Action router shared across requests.
    router: ToolRouter,
}

/// Server construction and transport errors.
#[derive(Debug, Error)]
pub enum McpServerError {
    /// Configuration was rejected.
    #[error("configuration error: {0}")]
    Config(String),
    /// Router or sink construction failed.
    #[error("initialization error: {0}")]
    Init(String),
    /// Transport I/O failed.
    #[error("transport error: {0}")]
    Transport(String),
}

impl McpServer {
    /// Builds a server from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the audit sink or router cannot be
    /// constructed.
    pub fn from_config(config: ContentGateConfig) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let audit = build_audit_sink(&config)?;
        let auth_audit = build_auth_audit_sink(&config);
        let authz = Arc::new(DefaultToolAuthz::from_config(config.server.auth.as_ref()));
        let cache = Arc::new(ClientCache::new(config.platform.clone()));
        let router = ToolRouter::new(ToolRouterConfig {
            cache,
            authz,
            auth_audit,
            audit,
        })
        .map_err(|err| McpServerError::Init(err.to_string()))?;
        Ok(Self {
            config,
            router,
        })
    }

    /// Runs the server on the configured transport until shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the transport fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        match self.config.server.transport {
            ServerTransport::Stdio => self.serve_stdio().await,
            ServerTransport::Http => self.serve_http().await,
        }
    }

    /// Serves Content-Length framed JSON-RPC over stdio.
    async fn serve_stdio(self) -> Result<(), McpServerError> {
        let mut reader = BufReader::new(tokio::io::stdin());
        let mut writer = tokio::io::stdout();
        let context = RequestContext::stdio();
        let max_body = self.config.server.max_body_bytes;
        while let Some(bytes) = read_framed(&mut reader, max_body).await? {
            let Some(response) = self.dispatch_bytes(&context, &bytes) else {
                continue;
            };
            write_framed(&mut writer, &response).await?;
        }
        Ok(())
    }

    /// Serves JSON-RPC over a single HTTP POST endpoint.
    async fn serve_http(self) -> Result<(), McpServerError> {
        let bind = self
            .config
            .server
            .bind
            .clone()
            .ok_or_else(|| McpServerError::Config("http transport requires bind".to_string()))?;
        emit_local_only_warning(&self);
        let app = Router::new()
            .route("/rpc", post(rpc_endpoint))
            .with_state(Arc::new(self));
        let listener = tokio::net::TcpListener::bind(&bind)
            .await
            .map_err(|err| McpServerError::Transport(format!("bind {bind}: {err}")))?;
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|err| McpServerError::Transport(err.to_string()))
    }

    /// Parses raw bytes and dispatches one request.
    fn dispatch_bytes(&self, context: &RequestContext, bytes: &[u8]) -> Option<Vec<u8>> {
        let response = match parse_request(bytes) {
            Ok(request) => self.dispatch_blocking(context, request)?,
            Err(error) => JsonRpcResponse::failure(Value::Null, error),
        };
        serde_json::to_vec(&response).ok()
    }

    /// Bridges the synchronous handler out of the async runtime.
    fn dispatch_blocking(
        &self,
        context: &RequestContext,
        request: JsonRpcRequest,
    ) -> Option<JsonRpcResponse> {
        let flavor =
            tokio::runtime::Handle::try_current().map(|handle| handle.runtime_flavor());
        if matches!(flavor, Ok(tokio::runtime::RuntimeFlavor::MultiThread)) {
            tokio::task::block_in_place(|| self.handle_request(context, request))
        } else {
            self.handle_request(context, request)
        }
    }

    /// Handles one JSON-RPC request synchronously.
    ///
    /// Returns `None` for notifications, which never get a response.
    fn handle_request(
        &self,
        context: &RequestContext,
        request: JsonRpcRequest,
    ) -> Option<JsonRpcResponse> {
        let result = match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {
                    "name": "content-gate",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            })),
            "tools/list" => self
                .router
                .list_tools(context)
                .map(|tools| json!({"tools": tools}))
                .map_err(JsonRpcError::from),
            "tools/call" => self.handle_tool_call(context, request.params.as_ref()),
            method if method.starts_with("notifications/") => return None,
            "ping" => Ok(json!({})),
            method => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("method not found: {method}"),
            )),
        };
        let id = request.id?;
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    /// Handles the tools/call method.
    fn handle_tool_call(
        &self,
        context: &RequestContext,
        params: Option<&Value>,
    ) -> Result<Value, JsonRpcError> {
        let Some(params) = params else {
            return Err(JsonRpcError::new(INVALID_PARAMS, "tools/call requires params"));
        };
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Err(JsonRpcError::new(INVALID_PARAMS, "tools/call requires a tool name"));
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        self.router
            .handle_tool_call(context, name, arguments)
            .map_err(JsonRpcError::from)
    }
}

// ============================================================================
// SECTION: HTTP Endpoint
// ============================================================================

/// Handles one JSON-RPC request over HTTP.
async fn rpc_endpoint(
    State(server): State<Arc<McpServer>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if body.len() > server.config.server.max_body_bytes {
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    }
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let context = RequestContext::http(Some(peer.ip()), auth_header);
    match server.dispatch_bytes(&context, &body) {
        Some(response) => (
            StatusCode::OK,
            [("content-type", "application/json")],
            response,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Warns on stderr when HTTP runs with local-only authentication.
fn emit_local_only_warning(server: &McpServer) {
    let local_only = server
        .config
        .server
        .auth
        .as_ref()
        .is_none_or(|auth| matches!(auth.mode, ServerAuthMode::LocalOnly));
    if local_only {
        let _ = writeln!(
            std::io::stderr(),
            "content-gate: http transport with local-only auth; only loopback peers are served"
        );
    }
}

// ============================================================================
// SECTION: Framing
// ============================================================================

/// Parses raw bytes into a JSON-RPC request.
fn parse_request(bytes: &[u8]) -> Result<JsonRpcRequest, JsonRpcError> {
    let request: JsonRpcRequest = serde_json::from_slice(bytes)
        .map_err(|err| JsonRpcError::new(PARSE_ERROR, format!("invalid JSON-RPC: {err}")))?;
    if request.jsonrpc != "2.0" {
        return Err(JsonRpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""));
    }
    Ok(request)
}

/// Reads one Content-Length framed message, or `None` at end of input.
async fn read_framed<R>(reader: &mut R, max_body: usize) -> Result<Option<Vec<u8>>, McpServerError>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|err| McpServerError::Transport(err.to_string()))?;
        if read == 0 {
            return Ok(None);
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                let length = value.trim().parse::<usize>().map_err(|_| {
                    McpServerError::Transport("invalid Content-Length header".to_string())
                })?;
                content_length = Some(length);
            }
        }
    }
    let Some(length) = content_length else {
        return Err(McpServerError::Transport("missing Content-Length header".to_string()));
    };
    if length > max_body {
        return Err(McpServerError::Transport(format!(
            "message of {length} bytes exceeds the {max_body} byte limit"
        )));
    }
    let mut bytes = vec![0_u8; length];
    reader
        .read_exact(&mut bytes)
        .await
        .map_err(|err| McpServerError::Transport(err.to_string()))?;
    Ok(Some(bytes))
}

/// Writes one Content-Length framed message.
async fn write_framed<W>(writer: &mut W, payload: &[u8]) -> Result<(), McpServerError>
where
    W: AsyncWriteExt + Unpin,
{
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    writer
        .write_all(header.as_bytes())
        .await
        .map_err(|err| McpServerError::Transport(err.to_string()))?;
    writer
        .write_all(payload)
        .await
        .map_err(|err| McpServerError::Transport(err.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|err| McpServerError::Transport(err.to_string()))
}

// ============================================================================
// SECTION: Sink Construction
// ============================================================================

/// Builds the tool audit sink selected by configuration.
fn build_audit_sink(config: &ContentGateConfig) -> Result<Arc<dyn ToolAuditSink>, McpServerError> {
    match config.server.audit.sink {
        AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditSinkKind::File => {
            let path = config.server.audit.path.as_deref().ok_or_else(|| {
                McpServerError::Config("file audit sink requires a path".to_string())
            })?;
            let sink = FileAuditSink::new(path)
                .map_err(|err| McpServerError::Init(format!("audit file: {err}")))?;
            Ok(Arc::new(sink))
        }
        AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
    }
}

/// Builds the auth audit sink, silenced only when auditing is off entirely.
fn build_auth_audit_sink(config: &ContentGateConfig) -> Arc<dyn AuthAuditSink> {
    match config.server.audit.sink {
        AuditSinkKind::None => Arc::new(NoopAuthAuditSink),
        AuditSinkKind::Stderr | AuditSinkKind::File => Arc::new(StderrAuthAuditSink),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        reason = "tests assert on known-good fixtures"
    )]

    use super::*;

    fn request(raw: &str) -> JsonRpcRequest {
        parse_request(raw.as_bytes()).expect("request parses")
    }

    #[test]
    fn parse_request_accepts_jsonrpc_two() {
        let parsed = request(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#);
        assert_eq!(parsed.method, "initialize");
        assert_eq!(parsed.id, Some(json!(1)));
    }

    #[test]
    fn parse_request_rejects_other_versions() {
        let error = parse_request(br#"{"jsonrpc":"1.0","id":1,"method":"x"}"#)
            .expect_err("version is rejected");
        assert_eq!(error.code, INVALID_REQUEST);
    }

    #[test]
    fn parse_request_rejects_malformed_json() {
        let error = parse_request(b"{not json").expect_err("parse fails");
        assert_eq!(error.code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn framed_messages_round_trip() {
        let payload = br#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#;
        let mut buffer: Vec<u8> = Vec::new();
        write_framed(&mut buffer, payload).await.expect("write succeeds");

        let mut reader = BufReader::new(buffer.as_slice());
        let read = read_framed(&mut reader, 1024)
            .await
            .expect("read succeeds")
            .expect("one message present");
        assert_eq!(read, payload);
        let eof = read_framed(&mut reader, 1024).await.expect("read succeeds");
        assert!(eof.is_none());
    }

    #[tokio::test]
    async fn oversized_frames_are_rejected() {
        let mut buffer: Vec<u8> = Vec::new();
        write_framed(&mut buffer, &[b'x'; 64]).await.expect("write succeeds");
        let mut reader = BufReader::new(buffer.as_slice());
        let error = read_framed(&mut reader, 16).await.expect_err("limit enforced");
        assert!(matches!(error, McpServerError::Transport(_)));
    }

    #[tokio::test]
    async fn missing_content_length_is_rejected() {
        let mut reader = BufReader::new(&b"X-Other: 1\r\n\r\n"[..]);
        let error = read_framed(&mut reader, 1024).await.expect_err("header required");
        assert!(matches!(error, McpServerError::Transport(_)));
    }
}
