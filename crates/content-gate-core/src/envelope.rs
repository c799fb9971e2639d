// crates/content-gate-core/src/envelope.rs
// ============================================================================
// Module: Response Envelope and Normalizer
// Description: Uniform wire response for every routed action.
// Purpose: Collapse heterogeneous handler results into one envelope shape.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every routed action terminates in a [`ResponseEnvelope`]: a list of text
//! content items, never a raw exception. The normalizer applies three rules in
//! order: a value that already is an envelope passes through unchanged; a
//! success-flagged handler result renders as pretty data plus an optional
//! message (or error plus bulleted validation details); any other value is
//! serialized as pretty-printed JSON text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Handler Results
// ============================================================================

/// Result produced by an action handler, consumed exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerResult {
    /// The action succeeded.
    Success {
        /// Resource payload, possibly `Value::Null` for message-only results.
        data: Value,
        /// Optional human-readable note appended after the payload.
        message: Option<String>,
    },
    /// The action failed before or during the upstream call.
    Failure {
        /// Error text shown to the caller.
        error: String,
        /// Optional field-level details rendered as a bulleted list.
        validation_errors: Vec<String>,
    },
}

impl HandlerResult {
    /// Builds a success result from a payload.
    #[must_use]
    pub const fn success(data: Value) -> Self {
        Self::Success {
            data,
            message: None,
        }
    }

    /// Builds a success result with an accompanying message.
    #[must_use]
    pub fn success_with_message(data: Value, message: impl Into<String>) -> Self {
        Self::Success {
            data,
            message: Some(message.into()),
        }
    }

    /// Builds a message-only success result.
    #[must_use]
    pub fn confirmation(message: impl Into<String>) -> Self {
        Self::Success {
            data: Value::Null,
            message: Some(message.into()),
        }
    }

    /// Builds a failure result.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            validation_errors: Vec::new(),
        }
    }

    /// Builds a failure result with field-level details.
    #[must_use]
    pub fn failure_with_details(error: impl Into<String>, validation_errors: Vec<String>) -> Self {
        Self::Failure {
            error: error.into(),
            validation_errors,
        }
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// One content item inside a response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvelopeContent {
    /// Plain text payload.
    Text {
        /// Rendered response text.
        text: String,
    },
}

/// Uniform response wrapper returned for every routed call.
///
/// # Invariants
/// - Always carries at least one text content item.
/// - Never exposes internal panics or raw upstream exceptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Ordered content items.
    pub content: Vec<EnvelopeContent>,
}

impl ResponseEnvelope {
    /// Builds an envelope from one text payload.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![EnvelopeContent::Text {
                text: text.into(),
            }],
        }
    }
}

// ============================================================================
// SECTION: Normalizer
// ============================================================================

/// Normalizes a handler result into the wire envelope.
#[must_use]
pub fn normalize(result: HandlerResult) -> ResponseEnvelope {
    match result {
        HandlerResult::Success {
            data,
            message,
        } => ResponseEnvelope::text(render_success(&data, message.as_deref())),
        HandlerResult::Failure {
            error,
            validation_errors,
        } => ResponseEnvelope::text(render_failure(&error, &validation_errors)),
    }
}

/// Normalizes an arbitrary value into the wire envelope.
///
/// Applies the pass-through, success-flag, and raw-serialization rules in
/// that order, so every handler return convention ends in one wire shape.
#[must_use]
pub fn normalize_value(value: Value) -> ResponseEnvelope {
    if let Ok(envelope) = serde_json::from_value::<ResponseEnvelope>(value.clone()) {
        if !envelope.content.is_empty() {
            return envelope;
        }
    }
    if let Some(flag) = value.get("success").and_then(Value::as_bool) {
        if flag {
            let data = value.get("data").cloned().unwrap_or(Value::Null);
            let message =
                value.get("message").and_then(Value::as_str).map(str::to_string);
            return ResponseEnvelope::text(render_success(&data, message.as_deref()));
        }
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        let details: Vec<String> = value
            .get("validation_errors")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| {
                        entry.as_str().map_or_else(|| entry.to_string(), str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default();
        return ResponseEnvelope::text(render_failure(&error, &details));
    }
    ResponseEnvelope::text(pretty(&value))
}

/// Renders a success payload with an optional trailing message.
fn render_success(data: &Value, message: Option<&str>) -> String {
    match (data, message) {
        (Value::Null, Some(message)) => message.to_string(),
        (Value::Null, None) => "Done.".to_string(),
        (data, Some(message)) => format!("{}\n\n{message}", pretty(data)),
        (data, None) => pretty(data),
    }
}

/// Renders a failure with optional bulleted validation details.
fn render_failure(error: &str, validation_errors: &[String]) -> String {
    if validation_errors.is_empty() {
        return format!("Error: {error}");
    }
    let mut lines = vec![format!("Error: {error}")];
    for detail in validation_errors {
        lines.push(format!("- {detail}"));
    }
    lines.join("\n")
}

/// Pretty-prints a JSON value, falling back to compact display.
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
