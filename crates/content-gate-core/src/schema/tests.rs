// crates/content-gate-core/src/schema/tests.rs
// ============================================================================
// Module: Schema Registry Unit Tests
// Description: Unit tests for domain parsing and registry lookups.
// Purpose: Validate exact-match lookup, ordering, and duplicate rejection.
// Dependencies: content-gate-core
// ============================================================================

//! ## Overview
//! Exercises registry construction, ordered action listing, and shape
//! rendering for parameter schemas.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use super::*;

fn sample_schema() -> ParamSchema {
    ParamSchema::new()
        .required("item_id", ParamKind::String, "record identifier")
        .optional("force", ParamKind::Boolean, "skip confirmation")
}

#[test]
fn parse_round_trips_every_domain() {
    for domain in Domain::ALL {
        assert_eq!(Domain::parse(domain.as_str()), Some(domain));
    }
    assert_eq!(Domain::parse("recordz"), None);
}

#[test]
fn registry_lookup_is_exact_match() {
    let registry = SchemaRegistry::builder()
        .register(Domain::Records, "get", sample_schema())
        .build()
        .expect("registry");
    assert!(registry.get(Domain::Records, "get").is_some());
    assert!(registry.get(Domain::Records, "ge").is_none());
    assert!(registry.get(Domain::Records, "get ").is_none());
    assert!(registry.get(Domain::Uploads, "get").is_none());
}

#[test]
fn actions_preserve_registration_order() {
    let registry = SchemaRegistry::builder()
        .register(Domain::Records, "list", sample_schema())
        .register(Domain::Records, "get", sample_schema())
        .register(Domain::Records, "create", sample_schema())
        .build()
        .expect("registry");
    assert_eq!(registry.actions(Domain::Records), ["list", "get", "create"]);
    assert!(registry.actions(Domain::Webhooks).is_empty());
}

#[test]
fn duplicate_registration_is_a_build_error() {
    let result = SchemaRegistry::builder()
        .register(Domain::Records, "get", sample_schema())
        .register(Domain::Records, "get", sample_schema())
        .build();
    assert!(matches!(
        result,
        Err(SchemaRegistryError::DuplicateAction {
            domain: "records",
            ..
        })
    ));
}

#[test]
fn render_shape_names_requirement_and_kind() {
    let shape = sample_schema().render_shape();
    let item_id = shape.get("item_id").and_then(Value::as_str).expect("item_id");
    assert!(item_id.contains("string"));
    assert!(item_id.contains("required"));
    let force = shape.get("force").and_then(Value::as_str).expect("force");
    assert!(force.contains("boolean"));
    assert!(force.contains("optional"));
}

#[test]
fn credentials_are_appended_to_every_schema() {
    let schema = ParamSchema::new().with_credentials();
    let names: Vec<&str> = schema.params().iter().map(|spec| spec.name.as_str()).collect();
    assert_eq!(names, ["api_token", "environment"]);
    assert!(schema.params()[0].required);
    assert!(!schema.params()[1].required);
}

#[test]
fn enum_kind_renders_allowed_values() {
    let schema = ParamSchema::new().required(
        "mode",
        ParamKind::Enum(vec!["fast".to_string(), "safe".to_string()]),
        "fork mode",
    );
    let shape = schema.render_shape();
    let mode = shape.get("mode").and_then(Value::as_str).expect("mode");
    assert!(mode.contains("fast"));
    assert!(mode.contains("safe"));
}
