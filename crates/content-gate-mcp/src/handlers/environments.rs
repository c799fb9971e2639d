// crates/content-gate-mcp/src/handlers/environments.rs
// ============================================================================
// Module: Environments Domain Handlers
// Description: Sandbox environment lifecycle actions.
// Purpose: Map environment actions onto the environments sub-client.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The `environments` tool manages sandbox environments: forking from a
//! source environment, promoting a sandbox to primary, and deletion. The
//! per-call `environment` credential selects where the other domains
//! operate; this domain manages the environments themselves.

// ============================================================================
// SECTION: Imports
// ============================================================================

use content_gate_client::PlatformClient;
use content_gate_core::envelope::HandlerResult;
use content_gate_core::schema::Domain;
use content_gate_core::schema::ParamKind;
use content_gate_core::schema::ParamSchema;
use content_gate_core::schema::SchemaRegistryBuilder;
use content_gate_core::validation::ValidatedArgs;
use serde_json::json;

use crate::handlers::platform;
use crate::handlers::required_str;
use crate::tools::RouteError;
use crate::tools::describe_schema;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Environments domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List all environments.
    List,
    /// Fork an environment into a new sandbox.
    Fork,
    /// Promote a sandbox to primary.
    Promote,
    /// Delete a sandbox environment.
    Delete,
}

impl Action {
    /// Every dispatchable action, in registry display order.
    pub const ALL: [Self; 4] = [Self::List, Self::Fork, Self::Promote, Self::Delete];

    /// Parses an action name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }

    /// Returns the registered action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Fork => "fork",
            Self::Promote => "promote",
            Self::Delete => "delete",
        }
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the environments action schemas.
pub fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .register(Domain::Environments, "describe", describe_schema())
        .register(
            Domain::Environments,
            Action::List.as_str(),
            ParamSchema::new().with_credentials(),
        )
        .register(
            Domain::Environments,
            Action::Fork.as_str(),
            ParamSchema::new()
                .required("source_id", ParamKind::String, "Environment to fork from")
                .required("new_id", ParamKind::String, "Identifier for the new sandbox")
                .optional("fast", ParamKind::Boolean, "Fast fork without record copies")
                .with_credentials(),
        )
        .register(Domain::Environments, Action::Promote.as_str(), environment_id_schema())
        .register(Domain::Environments, Action::Delete.as_str(), environment_id_schema())
}

/// Schema shared by the single-environment actions.
fn environment_id_schema() -> ParamSchema {
    ParamSchema::new()
        .required("environment_id", ParamKind::String, "Environment identifier")
        .with_credentials()
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches an environments action against the platform client.
///
/// # Errors
///
/// Returns [`RouteError`] when the platform rejects the call.
pub fn dispatch(
    action: Action,
    args: &ValidatedArgs,
    client: &PlatformClient,
) -> Result<HandlerResult, RouteError> {
    match action {
        Action::List => {
            let environments = platform(client.environments.list())?;
            Ok(HandlerResult::success(environments))
        }
        Action::Fork => {
            let source_id = required_str(args, "source_id")?;
            let new_id = required_str(args, "new_id")?;
            let attrs = json!({
                "id": new_id,
                "fast": args.bool("fast").unwrap_or(false),
            });
            let environment = platform(client.environments.fork(source_id, &attrs))?;
            Ok(HandlerResult::success_with_message(
                environment,
                format!("Environment {source_id} forked as {new_id}."),
            ))
        }
        Action::Promote => {
            let environment_id = required_str(args, "environment_id")?;
            let environment = platform(client.environments.promote(environment_id))?;
            Ok(HandlerResult::success_with_message(
                environment,
                format!("Environment {environment_id} promoted to primary."),
            ))
        }
        Action::Delete => {
            let environment_id = required_str(args, "environment_id")?;
            platform(client.environments.destroy(environment_id))?;
            Ok(HandlerResult::confirmation(format!("Environment {environment_id} deleted.")))
        }
    }
}
