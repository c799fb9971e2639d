// crates/content-gate-mcp/src/handlers/project.rs
// ============================================================================
// Module: Project Domain Handlers
// Description: Actions over project-wide site settings.
// Purpose: Read and update the project settings resource.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The `project` tool exposes the site settings resource: one read action
//! and one settings update over named fields plus pass-through extras.

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
use serde_json::Value;

use crate::handlers::collect_attrs;
use crate::handlers::platform;
use crate::tools::RouteError;
use crate::tools::describe_schema;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Project domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fetch project settings.
    GetInfo,
    /// Update project settings.
    UpdateSettings,
}

impl Action {
    /// Every dispatchable action, in registry display order.
    pub const ALL: [Self; 2] = [Self::GetInfo, Self::UpdateSettings];

    /// Parses an action name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }

    /// Returns the registered action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetInfo => "get_info",
            Self::UpdateSettings => "update_settings",
        }
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the project action schemas.
pub fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .register(Domain::Project, "describe", describe_schema())
        .register(
            Domain::Project,
            Action::GetInfo.as_str(),
            ParamSchema::new().with_credentials(),
        )
        .register(
            Domain::Project,
            Action::UpdateSettings.as_str(),
            ParamSchema::new()
                .optional("name", ParamKind::String, "Project display name")
                .optional("timezone", ParamKind::String, "Project timezone identifier")
                .optional(
                    "locales",
                    ParamKind::Array,
                    "Full ordered list of locale codes for the project",
                )
                .with_credentials(),
        )
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches a project action against the platform client.
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
        Action::GetInfo => {
            let site = platform(client.site.find())?;
            Ok(HandlerResult::success(site))
        }
        Action::UpdateSettings => {
            let attrs = collect_attrs(args, &["name", "timezone", "locales"]);
            if attrs.is_empty() {
                return Ok(HandlerResult::failure(
                    "update_settings needs at least one setting to change",
                ));
            }
            let updated = platform(client.site.update(&Value::Object(attrs)))?;
            Ok(HandlerResult::success_with_message(updated, "Project settings updated."))
        }
    }
}
