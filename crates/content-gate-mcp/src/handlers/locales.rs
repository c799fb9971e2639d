// crates/content-gate-mcp/src/handlers/locales.rs
// ============================================================================
// Module: Locales Domain Handlers
// Description: Locale list actions over the project settings resource.
// Purpose: Read-modify-write the site locales array.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The platform stores locales as an ordered array on the site settings
//! resource, so `add` and `remove` are read-modify-write cycles over that
//! array rather than dedicated endpoints. Removal keeps the project usable:
//! the last remaining locale can never be removed.

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

use crate::handlers::platform;
use crate::handlers::required_str;
use crate::tools::RouteError;
use crate::tools::describe_schema;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Locales domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List the configured locales.
    List,
    /// Add a locale to the project.
    Add,
    /// Remove a locale from the project.
    Remove,
}

impl Action {
    /// Every dispatchable action, in registry display order.
    pub const ALL: [Self; 3] = [Self::List, Self::Add, Self::Remove];

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
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the locales action schemas.
pub fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .register(Domain::Locales, "describe", describe_schema())
        .register(Domain::Locales, Action::List.as_str(), ParamSchema::new().with_credentials())
        .register(Domain::Locales, Action::Add.as_str(), locale_schema())
        .register(Domain::Locales, Action::Remove.as_str(), locale_schema())
}

/// Schema shared by the locale mutation actions.
fn locale_schema() -> ParamSchema {
    ParamSchema::new()
        .required("locale", ParamKind::String, "Locale code, e.g. \"en\" or \"pt-BR\"")
        .with_credentials()
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches a locales action against the platform client.
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
            let locales = current_locales(client)?;
            Ok(HandlerResult::success(Value::Array(
                locales.into_iter().map(Value::String).collect(),
            )))
        }
        Action::Add => {
            let locale = required_str(args, "locale")?;
            let mut locales = current_locales(client)?;
            if locales.iter().any(|existing| existing == locale) {
                return Ok(HandlerResult::failure(format!(
                    "locale \"{locale}\" is already configured"
                )));
            }
            locales.push(locale.to_string());
            write_locales(client, &locales)?;
            Ok(HandlerResult::confirmation(format!("Locale {locale} added.")))
        }
        Action::Remove => {
            let locale = required_str(args, "locale")?;
            let mut locales = current_locales(client)?;
            let Some(position) = locales.iter().position(|existing| existing == locale) else {
                return Ok(HandlerResult::failure(format!(
                    "locale \"{locale}\" is not configured"
                )));
            };
            if locales.len() == 1 {
                return Ok(HandlerResult::failure(
                    "cannot remove the last remaining locale",
                ));
            }
            locales.remove(position);
            write_locales(client, &locales)?;
            Ok(HandlerResult::confirmation(format!("Locale {locale} removed.")))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the locale array from the site settings resource.
fn current_locales(client: &PlatformClient) -> Result<Vec<String>, RouteError> {
    let site = platform(client.site.find())?;
    let locales = site
        .get("locales")
        .and_then(Value::as_array)
        .map(|values| {
            values.iter().filter_map(Value::as_str).map(str::to_string).collect::<Vec<_>>()
        })
        .unwrap_or_default();
    Ok(locales)
}

/// Writes the locale array back to the site settings resource.
fn write_locales(client: &PlatformClient, locales: &[String]) -> Result<(), RouteError> {
    platform(client.site.update(&json!({ "locales": locales })))?;
    Ok(())
}
