// crates/content-gate-mcp/src/handlers/uploads.rs
// ============================================================================
// Module: Uploads Domain Handlers
// Description: Metadata actions over media uploads.
// Purpose: Map upload actions onto the uploads sub-client.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The `uploads` tool manages upload metadata. Binary ingestion is not part
//! of this surface; uploads are created through the platform directly and
//! listed, inspected, retitled, or removed here.

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

/// Uploads domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List uploads matching a query.
    List,
    /// Fetch one upload.
    Get,
    /// Update upload metadata.
    Update,
    /// Delete an upload.
    Delete,
}

impl Action {
    /// Every dispatchable action, in registry display order.
    pub const ALL: [Self; 4] = [Self::List, Self::Get, Self::Update, Self::Delete];

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
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the uploads action schemas.
pub fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .register(Domain::Uploads, "describe", describe_schema())
        .register(
            Domain::Uploads,
            Action::List.as_str(),
            ParamSchema::new()
                .optional("filter", ParamKind::Object, "Platform filter expression")
                .optional("page", ParamKind::Object, "Pagination settings (offset, limit)")
                .with_credentials(),
        )
        .register(Domain::Uploads, Action::Get.as_str(), upload_id_schema())
        .register(
            Domain::Uploads,
            Action::Update.as_str(),
            ParamSchema::new()
                .required("upload_id", ParamKind::String, "Upload identifier")
                .optional("default_field_metadata", ParamKind::Object, "Per-locale alt/title")
                .optional("tags", ParamKind::Array, "Upload tags")
                .with_credentials(),
        )
        .register(Domain::Uploads, Action::Delete.as_str(), upload_id_schema())
}

/// Schema shared by the single-upload actions.
fn upload_id_schema() -> ParamSchema {
    ParamSchema::new()
        .required("upload_id", ParamKind::String, "Upload identifier")
        .with_credentials()
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches an uploads action against the platform client.
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
            let query = collect_attrs(args, &["filter", "page"]);
            let uploads = platform(client.uploads.list(&query))?;
            Ok(HandlerResult::success(uploads))
        }
        Action::Get => {
            let upload_id = required_str(args, "upload_id")?;
            let upload = platform(client.uploads.find(upload_id))?;
            Ok(HandlerResult::success(upload))
        }
        Action::Update => {
            let upload_id = required_str(args, "upload_id")?;
            let attrs = collect_attrs(args, &["default_field_metadata", "tags"]);
            let upload = platform(client.uploads.update(upload_id, &Value::Object(attrs)))?;
            Ok(HandlerResult::success_with_message(upload, "Upload updated."))
        }
        Action::Delete => {
            let upload_id = required_str(args, "upload_id")?;
            platform(client.uploads.destroy(upload_id))?;
            Ok(HandlerResult::confirmation(format!("Upload {upload_id} deleted.")))
        }
    }
}
