// crates/content-gate-core/src/schema.rs
// ============================================================================
// Module: Action Schema Registry
// Description: Per-domain mapping from action names to parameter schemas.
// Purpose: Describe every action's expected arguments as startup-built data.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The schema registry maps `(domain, action)` pairs to declarative parameter
//! schemas and keeps an ordered action list per domain for discovery output.
//! Schemas are pure data: they are registered once when the router is built
//! and never mutated afterwards. Lookup is exact string match only.
//!
//! ## Invariants
//! - Every registered action has exactly one schema.
//! - Action order is registration order and carries no semantics beyond
//!   discovery/display.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Domains
// ============================================================================

/// Action domains exposed as MCP tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Project-wide settings and metadata.
    Project,
    /// Content records.
    Records,
    /// Models and schema fields.
    Schema,
    /// Media uploads.
    Uploads,
    /// Sandbox and primary environments.
    Environments,
    /// Project locales.
    Locales,
    /// Collaborators and roles.
    Collaborators,
    /// Delivery webhooks.
    Webhooks,
}

impl Domain {
    /// All domains in display order.
    pub const ALL: [Self; 8] = [
        Self::Project,
        Self::Records,
        Self::Schema,
        Self::Uploads,
        Self::Environments,
        Self::Locales,
        Self::Collaborators,
        Self::Webhooks,
    ];

    /// Parses a domain from its tool name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.as_str() == name)
    }

    /// Returns the stable tool name for the domain.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Records => "records",
            Self::Schema => "schema",
            Self::Uploads => "uploads",
            Self::Environments => "environments",
            Self::Locales => "locales",
            Self::Collaborators => "collaborators",
            Self::Webhooks => "webhooks",
        }
    }
}

// ============================================================================
// SECTION: Parameter Schemas
// ============================================================================

/// Primitive or structured kind accepted for a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    /// UTF-8 string.
    String,
    /// Integer or float.
    Number,
    /// Boolean flag.
    Boolean,
    /// Arbitrary JSON object.
    Object,
    /// Arbitrary JSON array.
    Array,
    /// String restricted to a closed literal set.
    Enum(Vec<String>),
    /// Object with its own declared shape.
    Nested(ParamSchema),
}

/// One declared parameter of an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name as it appears in the argument bag.
    pub name: String,
    /// Accepted kind.
    pub kind: ParamKind,
    /// Whether the parameter must be present.
    pub required: bool,
    /// Short human description used in shape rendering.
    pub description: String,
}

/// Declarative parameter schema for one action.
///
/// # Invariants
/// - Built once at startup and read-only afterwards.
/// - Parameter names are unique within a schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSchema {
    /// Declared parameters in display order.
    params: Vec<ParamSpec>,
    /// Whether undeclared fields pass through untouched.
    allow_extra: bool,
}

impl ParamSchema {
    /// Creates an empty schema that passes undeclared fields through.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: Vec::new(),
            allow_extra: true,
        }
    }

    /// Adds a required parameter.
    #[must_use]
    pub fn required(mut self, name: &str, kind: ParamKind, description: &str) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            required: true,
            description: description.to_string(),
        });
        self
    }

    /// Adds an optional parameter.
    #[must_use]
    pub fn optional(mut self, name: &str, kind: ParamKind, description: &str) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            required: false,
            description: description.to_string(),
        });
        self
    }

    /// Rejects undeclared fields instead of passing them through.
    #[must_use]
    pub const fn deny_extra(mut self) -> Self {
        self.allow_extra = false;
        self
    }

    /// Appends the uniform call credentials consumed by the router.
    ///
    /// Every handler-backed action carries `api_token` and the optional
    /// `environment` selector; handlers themselves never read them.
    #[must_use]
    pub fn with_credentials(self) -> Self {
        self.required("api_token", ParamKind::String, "content platform API token")
            .optional("environment", ParamKind::String, "target environment (primary when absent)")
    }

    /// Returns the declared parameters in display order.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Returns true when undeclared fields pass through.
    #[must_use]
    pub const fn allows_extra(&self) -> bool {
        self.allow_extra
    }

    /// Renders the full expected argument shape as a JSON value.
    ///
    /// The rendering is part of every validation-failure payload so an
    /// autonomous caller can self-correct without a second discovery call.
    #[must_use]
    pub fn render_shape(&self) -> Value {
        let mut shape = Map::new();
        for spec in &self.params {
            shape.insert(spec.name.clone(), render_param(spec));
        }
        if self.allow_extra {
            shape.insert(
                "...".to_string(),
                Value::String("additional fields are passed through unchanged".to_string()),
            );
        }
        Value::Object(shape)
    }
}

/// Renders one parameter descriptor for shape output.
fn render_param(spec: &ParamSpec) -> Value {
    let requirement = if spec.required { "required" } else { "optional" };
    match &spec.kind {
        ParamKind::String => {
            Value::String(format!("string, {requirement}: {}", spec.description))
        }
        ParamKind::Number => {
            Value::String(format!("number, {requirement}: {}", spec.description))
        }
        ParamKind::Boolean => {
            Value::String(format!("boolean, {requirement}: {}", spec.description))
        }
        ParamKind::Object => {
            Value::String(format!("object, {requirement}: {}", spec.description))
        }
        ParamKind::Array => Value::String(format!("array, {requirement}: {}", spec.description)),
        ParamKind::Enum(values) => Value::String(format!(
            "one of [{}], {requirement}: {}",
            values.join(", "),
            spec.description
        )),
        ParamKind::Nested(schema) => schema.render_shape(),
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered action schemas for one domain.
#[derive(Debug, Clone, Default)]
struct DomainActions {
    /// Action names in registration order.
    order: Vec<String>,
    /// Schemas keyed by action name.
    schemas: BTreeMap<String, ParamSchema>,
}

/// Read-only registry of action schemas per domain.
///
/// # Invariants
/// - Built once via [`SchemaRegistryBuilder`] and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Per-domain action tables.
    domains: BTreeMap<Domain, DomainActions>,
}

impl SchemaRegistry {
    /// Starts a registry builder.
    #[must_use]
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Looks up the schema for an action by exact name match.
    #[must_use]
    pub fn get(&self, domain: Domain, action: &str) -> Option<&ParamSchema> {
        self.domains.get(&domain).and_then(|actions| actions.schemas.get(action))
    }

    /// Returns the ordered action names for a domain.
    #[must_use]
    pub fn actions(&self, domain: Domain) -> &[String] {
        self.domains.get(&domain).map_or(&[], |actions| actions.order.as_slice())
    }
}

/// Registry construction errors.
#[derive(Debug, Error)]
pub enum SchemaRegistryError {
    /// The same action was registered twice for one domain.
    #[error("duplicate action {action} in domain {domain}")]
    DuplicateAction {
        /// Domain tool name.
        domain: &'static str,
        /// Conflicting action name.
        action: String,
    },
}

/// Builder accumulating action schemas before the registry is frozen.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    /// Per-domain action tables under construction.
    domains: BTreeMap<Domain, DomainActions>,
    /// First duplicate seen during registration, if any.
    duplicate: Option<SchemaRegistryError>,
}

impl SchemaRegistryBuilder {
    /// Registers one action schema, preserving registration order.
    #[must_use]
    pub fn register(mut self, domain: Domain, action: &str, schema: ParamSchema) -> Self {
        let actions = self.domains.entry(domain).or_default();
        if actions.schemas.contains_key(action) {
            if self.duplicate.is_none() {
                self.duplicate = Some(SchemaRegistryError::DuplicateAction {
                    domain: domain.as_str(),
                    action: action.to_string(),
                });
            }
            return self;
        }
        actions.order.push(action.to_string());
        actions.schemas.insert(action.to_string(), schema);
        self
    }

    /// Freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryError`] when an action was registered twice.
    pub fn build(self) -> Result<SchemaRegistry, SchemaRegistryError> {
        if let Some(duplicate) = self.duplicate {
            return Err(duplicate);
        }
        Ok(SchemaRegistry {
            domains: self.domains,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
