// crates/content-gate-core/src/validation.rs
// ============================================================================
// Module: Argument Validation Engine
// Description: Structural validation of untyped argument bags against schemas.
// Purpose: Produce typed validated arguments or per-field violation lists.
// Dependencies: content-gate-core::schema, serde_json
// ============================================================================

//! ## Overview
//! The validation engine checks an untyped JSON argument bag against a
//! [`ParamSchema`]: presence for required fields, kind conformance for every
//! declared field, and recursion into nested object shapes. Undeclared fields
//! pass through into an explicit side map unless the schema forbids them.
//!
//! On failure the engine reports every violating field as a `(path, message)`
//! pair; the rendered payload additionally dumps the full expected shape so an
//! autonomous caller can self-correct in a single round trip.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::schema::ParamKind;
use crate::schema::ParamSchema;

// ============================================================================
// SECTION: Validated Arguments
// ============================================================================

/// Arguments that passed structural validation.
///
/// Declared fields land in the known map; undeclared fields land in the
/// explicit `extra` side map so pass-through stays visible in the type.
///
/// # Invariants
/// - Created fresh per routed call and dropped when the call completes.
#[derive(Debug, Clone, Default)]
pub struct ValidatedArgs {
    /// Declared fields that were present in the input.
    known: BTreeMap<String, Value>,
    /// Undeclared pass-through fields.
    extra: Map<String, Value>,
}

impl ValidatedArgs {
    /// Returns a declared field value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.known.get(name)
    }

    /// Returns a declared string field.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.known.get(name).and_then(Value::as_str)
    }

    /// Returns a declared boolean field.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.known.get(name).and_then(Value::as_bool)
    }

    /// Returns a declared numeric field as f64.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.known.get(name).and_then(Value::as_f64)
    }

    /// Returns a declared object field.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.known.get(name).and_then(Value::as_object)
    }

    /// Returns a declared array field.
    #[must_use]
    pub fn array(&self, name: &str) -> Option<&Vec<Value>> {
        self.known.get(name).and_then(Value::as_array)
    }

    /// Returns a required string field.
    ///
    /// # Errors
    ///
    /// Returns [`MissingArgument`] when the field is absent. Schemas mark the
    /// field required, so this only fires on a registry/schema mismatch.
    pub fn required_str(&self, name: &str) -> Result<&str, MissingArgument> {
        self.str(name).ok_or_else(|| MissingArgument {
            name: name.to_string(),
        })
    }

    /// Returns the undeclared pass-through fields.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A required argument was absent after validation.
#[derive(Debug, Error)]
#[error("required argument {name} missing after validation")]
pub struct MissingArgument {
    /// Missing argument name.
    pub name: String,
}

// ============================================================================
// SECTION: Validation Failures
// ============================================================================

/// One violating field reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path to the violating field.
    pub path: String,
    /// Human-readable message for the violation.
    pub message: String,
}

/// Structural validation failure carrying every violating field.
#[derive(Debug, Clone, Error)]
#[error("invalid arguments: {} violation(s)", .violations.len())]
pub struct ValidationFailure {
    /// All violations in declaration order.
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    /// Renders violations plus the full expected shape for the caller.
    #[must_use]
    pub fn render(&self, schema: &ParamSchema) -> String {
        let mut lines = vec!["Invalid arguments:".to_string()];
        for violation in &self.violations {
            lines.push(format!("- {}: {}", violation.path, violation.message));
        }
        let shape = serde_json::to_string_pretty(&schema.render_shape())
            .unwrap_or_else(|_| "{}".to_string());
        lines.push(String::new());
        lines.push("Expected argument shape:".to_string());
        lines.push(shape);
        lines.join("\n")
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Validates an argument bag against a schema.
///
/// # Errors
///
/// Returns [`ValidationFailure`] listing every violating field path.
pub fn validate(schema: &ParamSchema, raw: &Value) -> Result<ValidatedArgs, ValidationFailure> {
    let Some(object) = raw.as_object() else {
        return Err(ValidationFailure {
            violations: vec![FieldViolation {
                path: "args".to_string(),
                message: "arguments must be a JSON object".to_string(),
            }],
        });
    };

    let mut violations = Vec::new();
    let mut known = BTreeMap::new();
    collect_declared(schema, object, "", &mut known, &mut violations);
    let extra = collect_extra(schema, object, &mut violations);

    if violations.is_empty() {
        Ok(ValidatedArgs {
            known,
            extra,
        })
    } else {
        Err(ValidationFailure {
            violations,
        })
    }
}

/// Checks declared fields for presence and kind conformance.
fn collect_declared(
    schema: &ParamSchema,
    object: &Map<String, Value>,
    prefix: &str,
    known: &mut BTreeMap<String, Value>,
    violations: &mut Vec<FieldViolation>,
) {
    for spec in schema.params() {
        let path = join_path(prefix, &spec.name);
        match object.get(&spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    violations.push(FieldViolation {
                        path,
                        message: "required field is missing".to_string(),
                    });
                }
            }
            Some(value) => {
                check_kind(&spec.kind, value, &path, violations);
                if prefix.is_empty() {
                    known.insert(spec.name.clone(), value.clone());
                }
            }
        }
    }
}

/// Checks one value against its declared kind, recursing into nested shapes.
fn check_kind(kind: &ParamKind, value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    match kind {
        ParamKind::String => {
            if !value.is_string() {
                violations.push(mismatch(path, "a string", value));
            }
        }
        ParamKind::Number => {
            if !value.is_number() {
                violations.push(mismatch(path, "a number", value));
            }
        }
        ParamKind::Boolean => {
            if !value.is_boolean() {
                violations.push(mismatch(path, "a boolean", value));
            }
        }
        ParamKind::Object => {
            if !value.is_object() {
                violations.push(mismatch(path, "an object", value));
            }
        }
        ParamKind::Array => {
            if !value.is_array() {
                violations.push(mismatch(path, "an array", value));
            }
        }
        ParamKind::Enum(allowed) => match value.as_str() {
            Some(text) if allowed.iter().any(|candidate| candidate == text) => {}
            _ => violations.push(FieldViolation {
                path: path.to_string(),
                message: format!("expected one of [{}]", allowed.join(", ")),
            }),
        },
        ParamKind::Nested(nested) => {
            if let Some(inner) = value.as_object() {
                let mut unused = BTreeMap::new();
                collect_declared(nested, inner, path, &mut unused, violations);
                if !nested.allows_extra() {
                    for name in inner.keys() {
                        if !nested.params().iter().any(|spec| spec.name == *name) {
                            violations.push(FieldViolation {
                                path: join_path(path, name),
                                message: "unknown field".to_string(),
                            });
                        }
                    }
                }
            } else {
                violations.push(mismatch(path, "an object", value));
            }
        }
    }
}

/// Splits undeclared top-level fields into the pass-through map.
fn collect_extra(
    schema: &ParamSchema,
    object: &Map<String, Value>,
    violations: &mut Vec<FieldViolation>,
) -> Map<String, Value> {
    let mut extra = Map::new();
    for (name, value) in object {
        if schema.params().iter().any(|spec| spec.name == *name) {
            continue;
        }
        if schema.allows_extra() {
            extra.insert(name.clone(), value.clone());
        } else {
            violations.push(FieldViolation {
                path: name.clone(),
                message: "unknown field".to_string(),
            });
        }
    }
    extra
}

/// Builds a kind-mismatch violation naming the observed JSON type.
fn mismatch(path: &str, expected: &str, value: &Value) -> FieldViolation {
    FieldViolation {
        path: path.to_string(),
        message: format!("expected {expected}, got {}", json_type_name(value)),
    }
}

/// Stable JSON type label for violation messages.
const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Joins a dotted field path.
fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
