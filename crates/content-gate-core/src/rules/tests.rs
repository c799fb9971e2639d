// crates/content-gate-core/src/rules/tests.rs
// ============================================================================
// Module: Field Rule Unit Tests
// Description: Unit tests for field normalization and cross-field rules.
// Purpose: Validate rule order, self-healing rewrites, and remediations.
// Dependencies: content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Exercises the self-healing normalization steps and the fixed-order rule
//! checks for schema-field attributes.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use serde_json::json;

use super::*;

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().expect("object").clone()
}

#[test]
fn legacy_lat_lon_editor_is_rewritten_to_map() {
    let mut field = attrs(json!({
        "field_type": "lat_lon",
        "appearance": {"editor": "lat_lon_editor"},
    }));
    normalize_field(&mut field);
    let editor = field["appearance"]["editor"].as_str().expect("editor");
    assert_eq!(editor, "map");
}

#[test]
fn absent_appearance_synthesizes_default_editor() {
    let mut field = attrs(json!({"field_type": "lat_lon"}));
    normalize_field(&mut field);
    assert_eq!(field["appearance"]["editor"], "map");
    assert_eq!(field["appearance"]["addons"], json!([]));
}

#[test]
fn color_fields_default_to_color_picker_without_alpha() {
    let mut field = attrs(json!({"field_type": "color"}));
    normalize_field(&mut field);
    assert_eq!(field["appearance"]["editor"], "color_picker");
    assert_eq!(field["appearance"]["parameters"]["enable_alpha"], json!(false));
    assert_eq!(field["appearance"]["addons"], json!([]));
}

#[test]
fn appearance_without_editor_still_gets_the_default_editor() {
    let mut field = attrs(json!({
        "field_type": "color",
        "appearance": {"parameters": {}},
    }));
    normalize_field(&mut field);
    assert_eq!(field["appearance"]["editor"], "color_picker");
    assert_eq!(field["appearance"]["parameters"]["enable_alpha"], json!(false));
    assert_eq!(field["appearance"]["addons"], json!([]));
}

#[test]
fn explicit_alpha_override_is_preserved() {
    let mut field = attrs(json!({
        "field_type": "color",
        "appearance": {"editor": "color_picker", "parameters": {"enable_alpha": true}},
    }));
    normalize_field(&mut field);
    assert_eq!(field["appearance"]["parameters"]["enable_alpha"], json!(true));
}

#[test]
fn absent_addons_list_is_synthesized_never_fatal() {
    let mut field = attrs(json!({
        "field_type": "string",
        "appearance": {"editor": "single_line", "parameters": {}},
    }));
    normalize_field(&mut field);
    assert_eq!(field["appearance"]["addons"], json!([]));
    assert!(check_field_rules(&field).is_ok());
}

#[test]
fn rich_text_without_blocks_validator_names_the_declaration() {
    let mut field = attrs(json!({"field_type": "rich_text"}));
    normalize_field(&mut field);
    let violation = check_field_rules(&field).expect_err("missing rich_text_blocks");
    assert!(violation.message.contains("rich_text_blocks"));
    assert!(violation.message.contains("{\"validators\":"));
}

#[test]
fn rich_text_with_blocks_validator_passes() {
    let mut field = attrs(json!({
        "field_type": "rich_text",
        "validators": {"rich_text_blocks": {"item_types": ["block_1"]}},
    }));
    normalize_field(&mut field);
    assert!(check_field_rules(&field).is_ok());
}

#[test]
fn link_field_requires_item_item_type() {
    let mut field = attrs(json!({"field_type": "link"}));
    normalize_field(&mut field);
    let violation = check_field_rules(&field).expect_err("missing item_item_type");
    assert!(violation.message.contains("item_item_type"));
}

#[test]
fn structured_text_requires_both_companion_validators() {
    let mut field = attrs(json!({
        "field_type": "structured_text",
        "validators": {"structured_text_blocks": {"item_types": []}},
    }));
    normalize_field(&mut field);
    let violation = check_field_rules(&field).expect_err("missing links validator");
    assert!(violation.message.contains("structured_text_links"));
}

#[test]
fn enum_values_must_match_select_options_in_order() {
    let mut field = attrs(json!({
        "field_type": "string",
        "validators": {"enum": {"values": ["a", "b"]}},
        "appearance": {
            "editor": "string_select",
            "parameters": {"options": [
                {"label": "B", "value": "b"},
                {"label": "A", "value": "a"},
            ]},
        },
    }));
    normalize_field(&mut field);
    let violation = check_field_rules(&field).expect_err("order mismatch");
    assert!(violation.message.contains("must equal, in order"));

    let mut field = attrs(json!({
        "field_type": "string",
        "validators": {"enum": {"values": ["a", "b"]}},
        "appearance": {
            "editor": "string_select",
            "parameters": {"options": [
                {"label": "A", "value": "a"},
                {"label": "B", "value": "b"},
            ]},
        },
    }));
    normalize_field(&mut field);
    assert!(check_field_rules(&field).is_ok());
}

#[test]
fn required_flag_is_rejected_on_multi_item_kinds() {
    let mut field = attrs(json!({
        "field_type": "links",
        "validators": {
            "items_item_type": {"item_types": ["model_1"]},
            "required": {},
        },
    }));
    normalize_field(&mut field);
    let violation = check_field_rules(&field).expect_err("required on links");
    assert!(violation.message.contains("remove"));
    assert!(violation.message.contains("validators.required"));
}

#[test]
fn companion_rule_fires_before_required_rule() {
    let mut field = attrs(json!({
        "field_type": "links",
        "validators": {"required": {}},
    }));
    normalize_field(&mut field);
    let violation = check_field_rules(&field).expect_err("first rule wins");
    assert!(violation.message.contains("items_item_type"));
}
