// crates/content-gate-mcp/src/handlers/schema.rs
// ============================================================================
// Module: Schema Domain Handlers
// Description: Model and field actions over the content schema.
// Purpose: Map schema actions onto the item-types and fields sub-clients.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The `schema` tool manages models and their fields. Field creation and
//! update run the business-rule pipeline from `content_gate_core::rules`
//! after structural validation: attributes are normalized in place (legacy
//! editors, default appearance, color defaults, addons) and then checked
//! (companion validators, enum/option pairing, required-flag legality)
//! before any platform call happens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use content_gate_client::PlatformClient;
use content_gate_core::envelope::HandlerResult;
use content_gate_core::rules::DEFAULT_EDITORS;
use content_gate_core::rules::check_field_rules;
use content_gate_core::rules::normalize_field;
use content_gate_core::schema::Domain;
use content_gate_core::schema::ParamKind;
use content_gate_core::schema::ParamSchema;
use content_gate_core::schema::SchemaRegistryBuilder;
use content_gate_core::validation::ValidatedArgs;
use serde_json::Map;
use serde_json::Value;

use crate::handlers::collect_attrs;
use crate::handlers::platform;
use crate::handlers::required_str;
use crate::tools::RouteError;
use crate::tools::describe_schema;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Schema domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List all models.
    ListModels,
    /// Fetch one model.
    GetModel,
    /// Create a model.
    CreateModel,
    /// Update a model.
    UpdateModel,
    /// Delete a model.
    DeleteModel,
    /// List the fields of a model.
    ListFields,
    /// Fetch one field.
    GetField,
    /// Create a field on a model.
    CreateField,
    /// Update a field.
    UpdateField,
    /// Delete a field.
    DeleteField,
}

impl Action {
    /// Every dispatchable action, in registry display order.
    pub const ALL: [Self; 10] = [
        Self::ListModels,
        Self::GetModel,
        Self::CreateModel,
        Self::UpdateModel,
        Self::DeleteModel,
        Self::ListFields,
        Self::GetField,
        Self::CreateField,
        Self::UpdateField,
        Self::DeleteField,
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
            Self::ListModels => "list_models",
            Self::GetModel => "get_model",
            Self::CreateModel => "create_model",
            Self::UpdateModel => "update_model",
            Self::DeleteModel => "delete_model",
            Self::ListFields => "list_fields",
            Self::GetField => "get_field",
            Self::CreateField => "create_field",
            Self::UpdateField => "update_field",
            Self::DeleteField => "delete_field",
        }
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the schema action schemas.
pub fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .register(Domain::Schema, "describe", describe_schema())
        .register(
            Domain::Schema,
            Action::ListModels.as_str(),
            ParamSchema::new().with_credentials(),
        )
        .register(Domain::Schema, Action::GetModel.as_str(), model_id_schema())
        .register(
            Domain::Schema,
            Action::CreateModel.as_str(),
            ParamSchema::new()
                .required("name", ParamKind::String, "Model display name")
                .required("api_key", ParamKind::String, "Machine-readable model key")
                .with_credentials(),
        )
        .register(
            Domain::Schema,
            Action::UpdateModel.as_str(),
            ParamSchema::new()
                .required("model_id", ParamKind::String, "Model identifier")
                .optional("name", ParamKind::String, "Model display name")
                .optional("api_key", ParamKind::String, "Machine-readable model key")
                .with_credentials(),
        )
        .register(Domain::Schema, Action::DeleteModel.as_str(), model_id_schema())
        .register(Domain::Schema, Action::ListFields.as_str(), model_id_schema())
        .register(Domain::Schema, Action::GetField.as_str(), field_id_schema())
        .register(
            Domain::Schema,
            Action::CreateField.as_str(),
            ParamSchema::new()
                .required("model_id", ParamKind::String, "Model to attach the field to")
                .required("label", ParamKind::String, "Field display label")
                .required("api_key", ParamKind::String, "Machine-readable field key")
                .required(
                    "field_type",
                    ParamKind::Enum(field_type_names()),
                    "Field kind",
                )
                .optional("validators", ParamKind::Object, "Validator declarations")
                .optional("appearance", ParamKind::Object, "Editor appearance settings")
                .with_credentials(),
        )
        .register(
            Domain::Schema,
            Action::UpdateField.as_str(),
            ParamSchema::new()
                .required("field_id", ParamKind::String, "Field identifier")
                .optional("label", ParamKind::String, "Field display label")
                .optional("api_key", ParamKind::String, "Machine-readable field key")
                .optional(
                    "field_type",
                    ParamKind::Enum(field_type_names()),
                    "Field kind",
                )
                .optional("validators", ParamKind::Object, "Validator declarations")
                .optional("appearance", ParamKind::Object, "Editor appearance settings")
                .with_credentials(),
        )
        .register(Domain::Schema, Action::DeleteField.as_str(), field_id_schema())
}

/// Schema shared by the single-model actions.
fn model_id_schema() -> ParamSchema {
    ParamSchema::new()
        .required("model_id", ParamKind::String, "Model identifier")
        .with_credentials()
}

/// Schema shared by the single-field actions.
fn field_id_schema() -> ParamSchema {
    ParamSchema::new()
        .required("field_id", ParamKind::String, "Field identifier")
        .with_credentials()
}

/// Enumerates the accepted field kinds from the default-editor table.
fn field_type_names() -> Vec<String> {
    DEFAULT_EDITORS.iter().map(|(field_type, _)| (*field_type).to_string()).collect()
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches a schema action against the platform client.
///
/// # Errors
///
/// Returns [`RouteError`] when a business rule is violated or the platform
/// rejects the call.
pub fn dispatch(
    action: Action,
    args: &ValidatedArgs,
    client: &PlatformClient,
) -> Result<HandlerResult, RouteError> {
    match action {
        Action::ListModels => {
            let models = platform(client.item_types.list())?;
            Ok(HandlerResult::success(models))
        }
        Action::GetModel => {
            let model_id = required_str(args, "model_id")?;
            let model = platform(client.item_types.find(model_id))?;
            Ok(HandlerResult::success(model))
        }
        Action::CreateModel => {
            let attrs = collect_attrs(args, &["name", "api_key"]);
            let model = platform(client.item_types.create(&Value::Object(attrs)))?;
            Ok(HandlerResult::success_with_message(model, "Model created."))
        }
        Action::UpdateModel => {
            let model_id = required_str(args, "model_id")?;
            let attrs = collect_attrs(args, &["name", "api_key"]);
            let model = platform(client.item_types.update(model_id, &Value::Object(attrs)))?;
            Ok(HandlerResult::success_with_message(model, "Model updated."))
        }
        Action::DeleteModel => {
            let model_id = required_str(args, "model_id")?;
            platform(client.item_types.destroy(model_id))?;
            Ok(HandlerResult::confirmation(format!("Model {model_id} deleted.")))
        }
        Action::ListFields => {
            let model_id = required_str(args, "model_id")?;
            let fields = platform(client.fields.list(model_id))?;
            Ok(HandlerResult::success(fields))
        }
        Action::GetField => {
            let field_id = required_str(args, "field_id")?;
            let field = platform(client.fields.find(field_id))?;
            Ok(HandlerResult::success(field))
        }
        Action::CreateField => {
            let model_id = required_str(args, "model_id")?;
            let attrs = prepare_field_attrs(args)?;
            let field = platform(client.fields.create(model_id, &Value::Object(attrs)))?;
            Ok(HandlerResult::success_with_message(field, "Field created."))
        }
        Action::UpdateField => {
            let field_id = required_str(args, "field_id")?;
            let attrs = prepare_field_attrs(args)?;
            let field = platform(client.fields.update(field_id, &Value::Object(attrs)))?;
            Ok(HandlerResult::success_with_message(field, "Field updated."))
        }
        Action::DeleteField => {
            let field_id = required_str(args, "field_id")?;
            platform(client.fields.destroy(field_id))?;
            Ok(HandlerResult::confirmation(format!("Field {field_id} deleted.")))
        }
    }
}

/// Builds field attributes and runs the business-rule pipeline.
///
/// Normalization happens before the checks so rule decisions observe the
/// canonical editor names and synthesized appearance.
fn prepare_field_attrs(args: &ValidatedArgs) -> Result<Map<String, Value>, RouteError> {
    let mut attrs =
        collect_attrs(args, &["label", "api_key", "field_type", "validators", "appearance"]);
    normalize_field(&mut attrs);
    check_field_rules(&attrs).map_err(|violation| RouteError::BusinessRule(violation.to_string()))?;
    Ok(attrs)
}
