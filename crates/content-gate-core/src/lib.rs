// crates/content-gate-core/src/lib.rs
// ============================================================================
// Module: Content Gate Core
// Description: Schema registry, validation engine, and response envelope.
// Purpose: Provide the routing-independent building blocks for action tools.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Content Gate Core holds the pieces of the action surface that do not touch
//! a transport or the content platform: the per-domain schema registry, the
//! structural argument validator, the field business-rule pipeline, the
//! upstream error-signature table, and the uniform response envelope.
//!
//! ## Layer Responsibilities
//! - Describe every action's parameters as pure data built at startup.
//! - Validate untyped argument bags into [`validation::ValidatedArgs`].
//! - Normalize heterogeneous handler results into one envelope shape.
//! - Keep cross-field field rules and error rewrites auditable as tables.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod envelope;
pub mod rules;
pub mod schema;
pub mod signatures;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use envelope::EnvelopeContent;
pub use envelope::HandlerResult;
pub use envelope::ResponseEnvelope;
pub use rules::RuleViolation;
pub use rules::check_field_rules;
pub use rules::normalize_field;
pub use schema::Domain;
pub use schema::ParamKind;
pub use schema::ParamSchema;
pub use schema::ParamSpec;
pub use schema::SchemaRegistry;
pub use schema::SchemaRegistryBuilder;
pub use schema::SchemaRegistryError;
pub use signatures::rewrite_upstream_error;
pub use validation::FieldViolation;
pub use validation::ValidatedArgs;
pub use validation::ValidationFailure;
pub use validation::validate;
