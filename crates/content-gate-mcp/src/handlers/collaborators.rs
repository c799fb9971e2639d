// crates/content-gate-mcp/src/handlers/collaborators.rs
// ============================================================================
// Module: Collaborators Domain Handlers
// Description: Collaborator, invitation, and role actions.
// Purpose: Map collaborator actions onto the collaborators sub-client.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The `collaborators` tool lists project members and roles, invites new
//! collaborators by email, and removes existing ones.

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

/// Collaborators domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List project collaborators.
    List,
    /// Invite a collaborator by email.
    Invite,
    /// Remove a collaborator.
    Remove,
    /// List the available roles.
    ListRoles,
}

impl Action {
    /// Every dispatchable action, in registry display order.
    pub const ALL: [Self; 4] = [Self::List, Self::Invite, Self::Remove, Self::ListRoles];

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
            Self::Invite => "invite",
            Self::Remove => "remove",
            Self::ListRoles => "list_roles",
        }
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the collaborators action schemas.
pub fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .register(Domain::Collaborators, "describe", describe_schema())
        .register(
            Domain::Collaborators,
            Action::List.as_str(),
            ParamSchema::new().with_credentials(),
        )
        .register(
            Domain::Collaborators,
            Action::Invite.as_str(),
            ParamSchema::new()
                .required("email", ParamKind::String, "Invitee email address")
                .required("role_id", ParamKind::String, "Role to grant the invitee")
                .with_credentials(),
        )
        .register(
            Domain::Collaborators,
            Action::Remove.as_str(),
            ParamSchema::new()
                .required("collaborator_id", ParamKind::String, "Collaborator identifier")
                .with_credentials(),
        )
        .register(
            Domain::Collaborators,
            Action::ListRoles.as_str(),
            ParamSchema::new().with_credentials(),
        )
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches a collaborators action against the platform client.
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
            let collaborators = platform(client.collaborators.list())?;
            Ok(HandlerResult::success(collaborators))
        }
        Action::Invite => {
            let email = required_str(args, "email")?;
            let role_id = required_str(args, "role_id")?;
            let invitation = platform(client.collaborators.invite(&json!({
                "email": email,
                "role": role_id,
            })))?;
            Ok(HandlerResult::success_with_message(
                invitation,
                format!("Invitation sent to {email}."),
            ))
        }
        Action::Remove => {
            let collaborator_id = required_str(args, "collaborator_id")?;
            platform(client.collaborators.destroy(collaborator_id))?;
            Ok(HandlerResult::confirmation(format!(
                "Collaborator {collaborator_id} removed."
            )))
        }
        Action::ListRoles => {
            let roles = platform(client.collaborators.roles())?;
            Ok(HandlerResult::success(roles))
        }
    }
}
