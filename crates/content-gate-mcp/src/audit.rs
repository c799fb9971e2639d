// crates/content-gate-mcp/src/audit.rs
// ============================================================================
// Module: Tool Audit Logging
// Description: Structured audit events for tool request handling.
// Purpose: Emit redacted audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit event payloads and sinks for tool call logging. Events never carry
//! argument payloads: arguments include API tokens, so only routing metadata
//! (domain, action, outcome) is recorded. Deployments route events to their
//! preferred pipeline by swapping the sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Routing outcome classification for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    /// Action dispatched and the platform call succeeded.
    Success,
    /// Arguments failed structural validation.
    Validation,
    /// Attributes failed a business rule check.
    BusinessRule,
    /// The content platform rejected the call.
    Upstream,
    /// The action name was not recognized.
    UnsupportedAction,
    /// Required parameters were absent entirely.
    MissingParameters,
    /// Something failed inside the router itself.
    Internal,
}

/// Tool call audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ToolAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Domain tool that was called.
    pub domain: String,
    /// Requested action, when one was named.
    pub action: Option<String>,
    /// Routing outcome.
    pub outcome: ToolOutcome,
    /// Whether a sandbox environment was targeted.
    pub environment_scoped: bool,
}

/// Inputs required to construct a tool audit event.
pub struct ToolAuditEventParams {
    /// Domain tool that was called.
    pub domain: String,
    /// Requested action, when one was named.
    pub action: Option<String>,
    /// Routing outcome.
    pub outcome: ToolOutcome,
    /// Whether a sandbox environment was targeted.
    pub environment_scoped: bool,
}

impl ToolAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ToolAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "tool_call",
            timestamp_ms,
            domain: params.domain,
            action: params.action,
            outcome: params.outcome,
            environment_scoped: params.environment_scoped,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for tool call events.
pub trait ToolAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ToolAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ToolAuditSink for StderrAuditSink {
    fn record(&self, event: &ToolAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ToolAuditSink for FileAuditSink {
    fn record(&self, event: &ToolAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ToolAuditSink for NoopAuditSink {
    fn record(&self, _event: &ToolAuditEvent) {}
}
