// crates/content-gate-mcp/src/handlers/webhooks.rs
// ============================================================================
// Module: Webhooks Domain Handlers
// Description: Delivery webhook CRUD actions.
// Purpose: Map webhook actions onto the webhooks sub-client.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The `webhooks` tool manages delivery webhooks: name, target URL, the
//! subscribed event list, and optional custom headers.

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
use crate::handlers::required_str;
use crate::tools::RouteError;
use crate::tools::describe_schema;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Webhooks domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List all webhooks.
    List,
    /// Fetch one webhook.
    Get,
    /// Create a webhook.
    Create,
    /// Update a webhook.
    Update,
    /// Delete a webhook.
    Delete,
}

impl Action {
    /// Every dispatchable action, in registry display order.
    pub const ALL: [Self; 5] =
        [Self::List, Self::Get, Self::Create, Self::Update, Self::Delete];

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
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the webhooks action schemas.
pub fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .register(Domain::Webhooks, "describe", describe_schema())
        .register(
            Domain::Webhooks,
            Action::List.as_str(),
            ParamSchema::new().with_credentials(),
        )
        .register(Domain::Webhooks, Action::Get.as_str(), webhook_id_schema())
        .register(
            Domain::Webhooks,
            Action::Create.as_str(),
            ParamSchema::new()
                .required("name", ParamKind::String, "Webhook display name")
                .required("url", ParamKind::String, "Delivery target URL")
                .optional("events", ParamKind::Array, "Subscribed event identifiers")
                .optional("headers", ParamKind::Object, "Custom delivery headers")
                .with_credentials(),
        )
        .register(
            Domain::Webhooks,
            Action::Update.as_str(),
            ParamSchema::new()
                .required("webhook_id", ParamKind::String, "Webhook identifier")
                .optional("name", ParamKind::String, "Webhook display name")
                .optional("url", ParamKind::String, "Delivery target URL")
                .optional("events", ParamKind::Array, "Subscribed event identifiers")
                .optional("headers", ParamKind::Object, "Custom delivery headers")
                .with_credentials(),
        )
        .register(Domain::Webhooks, Action::Delete.as_str(), webhook_id_schema())
}

/// Schema shared by the single-webhook actions.
fn webhook_id_schema() -> ParamSchema {
    ParamSchema::new()
        .required("webhook_id", ParamKind::String, "Webhook identifier")
        .with_credentials()
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches a webhooks action against the platform client.
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
            let webhooks = platform(client.webhooks.list())?;
            Ok(HandlerResult::success(webhooks))
        }
        Action::Get => {
            let webhook_id = required_str(args, "webhook_id")?;
            let webhook = platform(client.webhooks.find(webhook_id))?;
            Ok(HandlerResult::success(webhook))
        }
        Action::Create => {
            let attrs = collect_attrs(args, &["name", "url", "events", "headers"]);
            let webhook = platform(client.webhooks.create(&Value::Object(attrs)))?;
            Ok(HandlerResult::success_with_message(webhook, "Webhook created."))
        }
        Action::Update => {
            let webhook_id = required_str(args, "webhook_id")?;
            let attrs = collect_attrs(args, &["name", "url", "events", "headers"]);
            let webhook = platform(client.webhooks.update(webhook_id, &Value::Object(attrs)))?;
            Ok(HandlerResult::success_with_message(webhook, "Webhook updated."))
        }
        Action::Delete => {
            let webhook_id = required_str(args, "webhook_id")?;
            platform(client.webhooks.destroy(webhook_id))?;
            Ok(HandlerResult::confirmation(format!("Webhook {webhook_id} deleted.")))
        }
    }
}
