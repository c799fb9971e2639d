// crates/content-gate-core/src/validation/tests.rs
// ============================================================================
// Module: Validation Engine Unit Tests
// Description: Unit tests for structural argument validation.
// Purpose: Validate violation paths, pass-through, and nested recursion.
// Dependencies: content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Exercises presence checks, kind conformance, nested shapes, pass-through
//! of undeclared fields, and the dual violations-plus-shape rendering.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use serde_json::json;

use super::*;

fn two_field_schema() -> ParamSchema {
    ParamSchema::new()
        .required("a", ParamKind::String, "first")
        .required("b", ParamKind::String, "second")
}

#[test]
fn missing_required_field_lists_exactly_that_path() {
    let failure = validate(&two_field_schema(), &json!({"a": "present"}))
        .expect_err("missing b must fail");
    let paths: Vec<&str> =
        failure.violations.iter().map(|violation| violation.path.as_str()).collect();
    assert_eq!(paths, ["b"]);
}

#[test]
fn valid_input_exposes_known_fields() {
    let args = validate(&two_field_schema(), &json!({"a": "x", "b": "y"})).expect("valid");
    assert_eq!(args.str("a"), Some("x"));
    assert_eq!(args.str("b"), Some("y"));
    assert_eq!(args.required_str("a").expect("a"), "x");
    assert!(args.extra().is_empty());
}

#[test]
fn kind_mismatch_names_expected_and_observed_types() {
    let schema = ParamSchema::new().required("count", ParamKind::Number, "how many");
    let failure = validate(&schema, &json!({"count": "three"})).expect_err("mismatch");
    assert_eq!(failure.violations.len(), 1);
    assert_eq!(failure.violations[0].path, "count");
    assert!(failure.violations[0].message.contains("expected a number"));
    assert!(failure.violations[0].message.contains("string"));
}

#[test]
fn null_counts_as_absent() {
    let schema = ParamSchema::new()
        .required("a", ParamKind::String, "first")
        .optional("note", ParamKind::String, "free text");
    let args = validate(&schema, &json!({"a": "x", "note": null})).expect("null optional ok");
    assert!(args.str("note").is_none());

    let failure = validate(&schema, &json!({"a": null})).expect_err("null required fails");
    assert_eq!(failure.violations[0].path, "a");
}

#[test]
fn undeclared_fields_pass_through_by_default() {
    let schema = ParamSchema::new().required("a", ParamKind::String, "first");
    let args =
        validate(&schema, &json!({"a": "x", "custom": {"nested": true}})).expect("valid");
    assert_eq!(args.extra().len(), 1);
    assert_eq!(args.extra()["custom"], json!({"nested": true}));
}

#[test]
fn undeclared_fields_rejected_when_schema_denies_extra() {
    let schema =
        ParamSchema::new().required("a", ParamKind::String, "first").deny_extra();
    let failure = validate(&schema, &json!({"a": "x", "stray": 1})).expect_err("stray");
    assert_eq!(failure.violations[0].path, "stray");
    assert_eq!(failure.violations[0].message, "unknown field");
}

#[test]
fn enum_kind_rejects_values_outside_the_set() {
    let schema = ParamSchema::new().required(
        "mode",
        ParamKind::Enum(vec!["fast".to_string(), "safe".to_string()]),
        "fork mode",
    );
    assert!(validate(&schema, &json!({"mode": "fast"})).is_ok());
    let failure = validate(&schema, &json!({"mode": "slow"})).expect_err("bad enum");
    assert!(failure.violations[0].message.contains("fast"));
    assert!(failure.violations[0].message.contains("safe"));
}

#[test]
fn nested_violations_use_dotted_paths() {
    let nested = ParamSchema::new().required("url", ParamKind::String, "target url");
    let schema =
        ParamSchema::new().required("webhook", ParamKind::Nested(nested), "webhook shape");
    let failure = validate(&schema, &json!({"webhook": {}})).expect_err("missing url");
    assert_eq!(failure.violations[0].path, "webhook.url");
}

#[test]
fn non_object_arguments_fail_with_single_violation() {
    let failure = validate(&two_field_schema(), &json!([1, 2])).expect_err("array args");
    assert_eq!(failure.violations.len(), 1);
    assert_eq!(failure.violations[0].path, "args");
}

#[test]
fn render_includes_all_violations_and_full_shape() {
    let failure = validate(&two_field_schema(), &json!({})).expect_err("both missing");
    let rendered = failure.render(&two_field_schema());
    assert!(rendered.contains("- a:"));
    assert!(rendered.contains("- b:"));
    assert!(rendered.contains("Expected argument shape:"));
    assert!(rendered.contains("\"a\""));
    assert!(rendered.contains("\"b\""));
}
