// crates/content-gate-mcp/src/handlers/mod.rs
// ============================================================================
// Module: Domain Handlers
// Description: One handler module per content platform domain.
// Purpose: Map validated action arguments onto platform client calls.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Each domain module owns a closed `Action` enum, contributes its action
//! schemas to the shared registry, and dispatches validated arguments to the
//! platform client. Handlers never see credentials: the router strips
//! `api_token` and `environment` before dispatch by resolving the client.
//!
//! ## Invariants
//! - Every `Action` variant is registered with a schema; the router verifies
//!   this at startup in both directions.
//! - Handlers report platform rejections through the error-signature
//!   rewriter, never as raw upstream text.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod collaborators;
pub mod environments;
pub mod locales;
pub mod project;
pub mod records;
pub mod schema;
pub mod uploads;
pub mod webhooks;

// ============================================================================
// SECTION: Imports
// ============================================================================

use content_gate_client::ApiError;
use content_gate_core::rewrite_upstream_error;
use content_gate_core::validation::ValidatedArgs;
use serde_json::Map;
use serde_json::Value;

use crate::tools::RouteError;

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Maps a platform call result into the routing taxonomy.
///
/// Upstream rejections go through the signature rewriter so the caller sees
/// the actionable diagnostic instead of the raw platform text.
pub(crate) fn platform(result: Result<Value, ApiError>) -> Result<Value, RouteError> {
    result.map_err(|err| RouteError::Upstream(rewrite_upstream_error(&err.message())))
}

/// Collects named known arguments plus all pass-through extras into one
/// attribute object. Credentials never appear here: they are declared
/// parameters, so validation routes them into the known map and no handler
/// lists them as attribute keys.
pub(crate) fn collect_attrs(args: &ValidatedArgs, keys: &[&str]) -> Map<String, Value> {
    let mut attrs = Map::new();
    for key in keys {
        if let Some(value) = args.value(key) {
            attrs.insert((*key).to_string(), value.clone());
        }
    }
    for (key, value) in args.extra() {
        attrs.insert(key.clone(), value.clone());
    }
    attrs
}

/// Looks up a required identifier argument, mapping absence to the routing
/// taxonomy.
///
/// Validation guarantees required strings are present, so this only fires if
/// a schema and its handler disagree.
pub(crate) fn required_str<'a>(
    args: &'a ValidatedArgs,
    name: &str,
) -> Result<&'a str, RouteError> {
    args.required_str(name).map_err(|err| RouteError::Internal(err.to_string()))
}
