// crates/content-gate-core/src/signatures/tests.rs
// ============================================================================
// Module: Error Signature Unit Tests
// Description: Unit tests for upstream error message rewriting.
// Purpose: Validate ordered substring matching and generic wrapping.
// Dependencies: content-gate-core
// ============================================================================

//! ## Overview
//! Exercises the signature table ordering and the pass-through wrapping for
//! unmatched upstream errors.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use super::*;

#[test]
fn item_item_type_rewrites_regardless_of_surrounding_text() {
    let rewritten = rewrite_upstream_error(
        "VALIDATION FAILED: field validators.item_item_type references unknown entity",
    );
    assert!(rewritten.contains("invalid or inaccessible item type IDs"));

    let rewritten = rewrite_upstream_error("item_item_type");
    assert!(rewritten.contains("invalid or inaccessible item type IDs"));
}

#[test]
fn items_variant_points_at_the_plural_validator() {
    let rewritten = rewrite_upstream_error("field validators.items_item_type invalid");
    assert!(rewritten.contains("validators.items_item_type"));
}

#[test]
fn rich_text_blocks_signature_names_the_declaration() {
    let rewritten = rewrite_upstream_error("INVALID_FIELD rich_text_blocks missing");
    assert!(rewritten.contains("validators.rich_text_blocks"));
    assert!(rewritten.contains("item_types"));
}

#[test]
fn editor_signature_mentions_the_rename() {
    let rewritten = rewrite_upstream_error("unknown editor for appearance");
    assert!(rewritten.contains("lat_lon_editor"));
    assert!(rewritten.contains("map"));
}

#[test]
fn unmatched_errors_are_wrapped_and_preserved() {
    let rewritten = rewrite_upstream_error("quota exceeded for plan");
    assert!(rewritten.starts_with("content platform rejected the request:"));
    assert!(rewritten.contains("quota exceeded for plan"));
}

#[test]
fn table_is_ordered_most_specific_first() {
    let plural = UPSTREAM_SIGNATURES
        .iter()
        .position(|signature| signature.needle == "items_item_type")
        .expect("plural entry");
    let singular = UPSTREAM_SIGNATURES
        .iter()
        .position(|signature| signature.needle == "item_item_type")
        .expect("singular entry");
    assert!(plural < singular);
}
