// crates/content-gate-mcp/src/handlers/records.rs
// ============================================================================
// Module: Records Domain Handlers
// Description: CRUD and publication actions over content records.
// Purpose: Map record actions onto the items sub-client.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The `records` tool covers the content record lifecycle: listing with
//! pass-through query filters, create/update with plain attribute objects,
//! duplication with an optional confirmation-only response, and the
//! publish/unpublish pair.

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
use serde_json::json;

use crate::handlers::collect_attrs;
use crate::handlers::platform;
use crate::handlers::required_str;
use crate::tools::RouteError;
use crate::tools::describe_schema;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Records domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List records matching a query.
    List,
    /// Fetch one record.
    Get,
    /// Create a record.
    Create,
    /// Update a record.
    Update,
    /// Duplicate a record.
    Duplicate,
    /// Delete a record.
    Delete,
    /// Publish a record.
    Publish,
    /// Unpublish a record.
    Unpublish,
}

impl Action {
    /// Every dispatchable action, in registry display order.
    pub const ALL: [Self; 8] = [
        Self::List,
        Self::Get,
        Self::Create,
        Self::Update,
        Self::Duplicate,
        Self::Delete,
        Self::Publish,
        Self::Unpublish,
    ];

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
            Self::Duplicate => "duplicate",
            Self::Delete => "delete",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
        }
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the records action schemas.
pub fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .register(Domain::Records, "describe", describe_schema())
        .register(
            Domain::Records,
            Action::List.as_str(),
            ParamSchema::new()
                .optional("model_id", ParamKind::String, "Restrict to one model")
                .optional("filter", ParamKind::Object, "Platform filter expression")
                .optional("page", ParamKind::Object, "Pagination settings (offset, limit)")
                .with_credentials(),
        )
        .register(Domain::Records, Action::Get.as_str(), record_id_schema())
        .register(
            Domain::Records,
            Action::Create.as_str(),
            ParamSchema::new()
                .required("model_id", ParamKind::String, "Model the record belongs to")
                .required("data", ParamKind::Object, "Field values for the new record")
                .with_credentials(),
        )
        .register(
            Domain::Records,
            Action::Update.as_str(),
            ParamSchema::new()
                .required("record_id", ParamKind::String, "Record identifier")
                .required("data", ParamKind::Object, "Field values to change")
                .with_credentials(),
        )
        .register(
            Domain::Records,
            Action::Duplicate.as_str(),
            ParamSchema::new()
                .required("record_id", ParamKind::String, "Record identifier")
                .optional(
                    "return_only_confirmation",
                    ParamKind::Boolean,
                    "Return a short confirmation instead of the duplicated payload",
                )
                .with_credentials(),
        )
        .register(Domain::Records, Action::Delete.as_str(), record_id_schema())
        .register(Domain::Records, Action::Publish.as_str(), record_id_schema())
        .register(Domain::Records, Action::Unpublish.as_str(), record_id_schema())
}

/// Schema shared by the single-record actions.
fn record_id_schema() -> ParamSchema {
    ParamSchema::new()
        .required("record_id", ParamKind::String, "Record identifier")
        .with_credentials()
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches a records action against the platform client.
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
            let mut query = collect_attrs(args, &["filter", "page"]);
            if let Some(model_id) = args.str("model_id") {
                query.insert("item_type".to_string(), Value::String(model_id.to_string()));
            }
            let records = platform(client.items.list(&query))?;
            Ok(HandlerResult::success(records))
        }
        Action::Get => {
            let record_id = required_str(args, "record_id")?;
            let record = platform(client.items.find(record_id))?;
            Ok(HandlerResult::success(record))
        }
        Action::Create => {
            let model_id = required_str(args, "model_id")?;
            let data = args.object("data").cloned().unwrap_or_default();
            let attrs = json!({
                "item_type": model_id,
                "data": data,
            });
            let record = platform(client.items.create(&attrs))?;
            Ok(HandlerResult::success_with_message(record, "Record created."))
        }
        Action::Update => {
            let record_id = required_str(args, "record_id")?;
            let data = args.object("data").cloned().unwrap_or_default();
            let record = platform(client.items.update(record_id, &json!({ "data": data })))?;
            Ok(HandlerResult::success_with_message(record, "Record updated."))
        }
        Action::Duplicate => duplicate(args, client),
        Action::Delete => {
            let record_id = required_str(args, "record_id")?;
            platform(client.items.destroy(record_id))?;
            Ok(HandlerResult::confirmation(format!("Record {record_id} deleted.")))
        }
        Action::Publish => {
            let record_id = required_str(args, "record_id")?;
            let record = platform(client.items.publish(record_id))?;
            Ok(HandlerResult::success_with_message(record, "Record published."))
        }
        Action::Unpublish => {
            let record_id = required_str(args, "record_id")?;
            let record = platform(client.items.unpublish(record_id))?;
            Ok(HandlerResult::success_with_message(record, "Record unpublished."))
        }
    }
}

/// Duplicates a record, optionally collapsing the response to a
/// confirmation naming both record identifiers.
fn duplicate(args: &ValidatedArgs, client: &PlatformClient) -> Result<HandlerResult, RouteError> {
    let record_id = required_str(args, "record_id")?;
    let duplicated = platform(client.items.duplicate(record_id))?;
    if args.bool("return_only_confirmation").unwrap_or(false) {
        let new_id = duplicated
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        return Ok(HandlerResult::confirmation(format!(
            "Record {record_id} duplicated as {new_id}."
        )));
    }
    Ok(HandlerResult::success(duplicated))
}
