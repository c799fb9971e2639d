// crates/content-gate-core/src/rules.rs
// ============================================================================
// Module: Field Business Rules
// Description: Cross-field rules and self-healing normalization for fields.
// Purpose: Enforce field constraints a structural schema cannot express.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Schema-field creation and update carry cross-field constraints: companion
//! validators for reference-like kinds, validator/editor value pairing, and
//! flags that are illegal on multi-item kinds. Normalization runs first and is
//! self-healing (legacy editor rename, default editor synthesis, empty addon
//! lists); the checks then run in a fixed order and the first violation aborts
//! with its specific remediation message.
//!
//! ## Invariants
//! - Rule order is fixed; evaluation is deterministic for identical input.
//! - Normalization never fails; checks never mutate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Default editor per field type, used when no appearance is supplied.
pub const DEFAULT_EDITORS: &[(&str, &str)] = &[
    ("boolean", "boolean"),
    ("color", "color_picker"),
    ("date", "date_picker"),
    ("date_time", "date_time_picker"),
    ("file", "file"),
    ("float", "float"),
    ("gallery", "gallery"),
    ("integer", "integer"),
    ("json", "json"),
    ("lat_lon", "map"),
    ("link", "link_select"),
    ("links", "links_select"),
    ("rich_text", "rich_text"),
    ("seo", "seo"),
    ("slug", "slug"),
    ("string", "single_line"),
    ("structured_text", "structured_text"),
    ("text", "textarea"),
    ("video", "video"),
];

/// Deprecated editor identifiers rewritten to their canonical names.
const LEGACY_EDITOR_ALIASES: &[(&str, &str)] = &[
    ("lat_lon_editor", "map"),
    ("link_editor", "link_select"),
    ("links_editor", "links_select"),
];

/// Field types on which the `required` validator is illegal.
const REQUIRED_FORBIDDEN_TYPES: &[&str] = &["links", "gallery", "rich_text", "structured_text"];

/// Companion validator requirements for reference-like field types.
struct CompanionValidator {
    /// Field type the requirement applies to.
    field_type: &'static str,
    /// Required validator key.
    validator: &'static str,
    /// JSON example of the validator shape for the error message.
    example: &'static str,
}

/// Companion validator table, checked in order.
const COMPANION_VALIDATORS: &[CompanionValidator] = &[
    CompanionValidator {
        field_type: "link",
        validator: "item_item_type",
        example: r#"{"validators":{"item_item_type":{"item_types":["<item type id>"]}}}"#,
    },
    CompanionValidator {
        field_type: "links",
        validator: "items_item_type",
        example: r#"{"validators":{"items_item_type":{"item_types":["<item type id>"]}}}"#,
    },
    CompanionValidator {
        field_type: "rich_text",
        validator: "rich_text_blocks",
        example: r#"{"validators":{"rich_text_blocks":{"item_types":["<block item type id>"]}}}"#,
    },
    CompanionValidator {
        field_type: "structured_text",
        validator: "structured_text_blocks",
        example: r#"{"validators":{"structured_text_blocks":{"item_types":["<block item type id>"]}}}"#,
    },
    CompanionValidator {
        field_type: "structured_text",
        validator: "structured_text_links",
        example: r#"{"validators":{"structured_text_links":{"item_types":["<item type id>"]}}}"#,
    },
];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A cross-field rule was violated.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleViolation {
    /// Specific remediation message for the caller.
    pub message: String,
}

impl RuleViolation {
    /// Builds a violation from a message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes field attributes in place before rule checks and dispatch.
///
/// Self-healing steps, in order: an absent appearance object or editor
/// declaration synthesizes the default editor for the field type; legacy
/// editor identifiers are rewritten to their canonical names; `color`
/// editors default to `enable_alpha: false`; an absent `addons` list is
/// synthesized as empty.
pub fn normalize_field(attrs: &mut Map<String, Value>) {
    let Some(field_type) =
        attrs.get("field_type").and_then(Value::as_str).map(str::to_string)
    else {
        return;
    };

    if !attrs.get("appearance").is_some_and(Value::is_object) {
        attrs.insert("appearance".to_string(), json!({}));
    }
    let Some(appearance) = attrs.get_mut("appearance").and_then(Value::as_object_mut) else {
        return;
    };

    if !appearance.get("editor").is_some_and(Value::is_string) {
        appearance.insert(
            "editor".to_string(),
            Value::String(default_editor(&field_type).to_string()),
        );
    }
    if let Some(editor) = appearance.get("editor").and_then(Value::as_str) {
        if let Some(canonical) = canonical_editor(editor) {
            appearance.insert("editor".to_string(), Value::String(canonical.to_string()));
        }
    }

    if !appearance.get("parameters").is_some_and(Value::is_object) {
        appearance.insert("parameters".to_string(), json!({}));
    }
    let is_color_picker =
        appearance.get("editor").and_then(Value::as_str) == Some("color_picker");
    if is_color_picker {
        if let Some(parameters) = appearance.get_mut("parameters").and_then(Value::as_object_mut)
        {
            parameters
                .entry("enable_alpha".to_string())
                .or_insert(Value::Bool(false));
        }
    }

    if !appearance.get("addons").is_some_and(Value::is_array) {
        appearance.insert("addons".to_string(), json!([]));
    }
}

/// Returns the default editor for a field type.
fn default_editor(field_type: &str) -> &'static str {
    DEFAULT_EDITORS
        .iter()
        .find(|(candidate, _)| *candidate == field_type)
        .map_or("single_line", |(_, editor)| *editor)
}

/// Returns the canonical name for a deprecated editor identifier.
fn canonical_editor(editor: &str) -> Option<&'static str> {
    LEGACY_EDITOR_ALIASES
        .iter()
        .find(|(alias, _)| *alias == editor)
        .map(|(_, canonical)| *canonical)
}

// ============================================================================
// SECTION: Rule Checks
// ============================================================================

/// Checks the cross-field rules on normalized field attributes.
///
/// Rules run in a fixed order and the first violation aborts:
/// 1. reference-like kinds require their companion validator;
/// 2. `enum` validator values must equal the `string_select` option values;
/// 3. the `required` validator is illegal on multi-item kinds.
///
/// # Errors
///
/// Returns [`RuleViolation`] with the specific remediation for the first
/// violated rule.
pub fn check_field_rules(attrs: &Map<String, Value>) -> Result<(), RuleViolation> {
    let field_type = attrs.get("field_type").and_then(Value::as_str).unwrap_or_default();
    let validators = attrs.get("validators").and_then(Value::as_object);

    check_companion_validators(field_type, validators)?;
    check_enum_pairing(attrs, validators)?;
    check_required_flag(field_type, validators)?;
    Ok(())
}

/// Rule 1: companion validators for reference-like kinds.
fn check_companion_validators(
    field_type: &str,
    validators: Option<&Map<String, Value>>,
) -> Result<(), RuleViolation> {
    for companion in COMPANION_VALIDATORS {
        if companion.field_type != field_type {
            continue;
        }
        let present = validators.is_some_and(|map| {
            map.get(companion.validator).is_some_and(Value::is_object)
        });
        if !present {
            return Err(RuleViolation::new(format!(
                "field type \"{field_type}\" requires the \"{validator}\" validator declaring \
                 the allowed item types. Add, for example: {example}",
                validator = companion.validator,
                example = companion.example,
            )));
        }
    }
    Ok(())
}

/// Rule 2: enum validator values must match string_select options in order.
fn check_enum_pairing(
    attrs: &Map<String, Value>,
    validators: Option<&Map<String, Value>>,
) -> Result<(), RuleViolation> {
    let Some(enum_values) = validators
        .and_then(|map| map.get("enum"))
        .and_then(|decl| decl.get("values"))
        .and_then(Value::as_array)
    else {
        return Ok(());
    };
    let editor = attrs
        .get("appearance")
        .and_then(|appearance| appearance.get("editor"))
        .and_then(Value::as_str);
    if editor != Some("string_select") {
        return Ok(());
    }
    let options: Vec<Value> = attrs
        .get("appearance")
        .and_then(|appearance| appearance.get("parameters"))
        .and_then(|parameters| parameters.get("options"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries.iter().filter_map(|entry| entry.get("value")).cloned().collect()
        })
        .unwrap_or_default();
    if options != *enum_values {
        return Err(RuleViolation::new(format!(
            "enum validator values {} must equal, in order, the string_select option values {}",
            Value::Array(enum_values.clone()),
            Value::Array(options),
        )));
    }
    Ok(())
}

/// Rule 3: the required validator is illegal on multi-item kinds.
fn check_required_flag(
    field_type: &str,
    validators: Option<&Map<String, Value>>,
) -> Result<(), RuleViolation> {
    let has_required = validators.is_some_and(|map| map.contains_key("required"));
    if has_required && REQUIRED_FORBIDDEN_TYPES.contains(&field_type) {
        return Err(RuleViolation::new(format!(
            "the \"required\" validator cannot be used on field type \"{field_type}\"; remove \
             validators.required"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
