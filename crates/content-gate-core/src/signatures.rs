// crates/content-gate-core/src/signatures.rs
// ============================================================================
// Module: Upstream Error Signatures
// Description: Ordered substring rewrites for content platform error text.
// Purpose: Turn raw upstream failures into actionable corrective messages.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The content platform reports failures as free-form message strings, not a
//! structured code contract. Known failure signatures are matched by substring
//! against the raw text and rewritten into specific corrective instructions;
//! unmatched errors pass through with minimal wrapping.
//!
//! ## Invariants
//! - The table is ordered most specific first and matched top to bottom.
//! - Matching is plain substring containment; no regex, no normalization.

// ============================================================================
// SECTION: Signature Table
// ============================================================================

/// One known upstream failure signature.
pub struct ErrorSignature {
    /// Substring that identifies the failure in the raw message.
    pub needle: &'static str,
    /// Corrective diagnostic presented to the caller.
    pub diagnostic: &'static str,
}

/// Known upstream failure signatures, most specific first.
pub const UPSTREAM_SIGNATURES: &[ErrorSignature] = &[
    ErrorSignature {
        needle: "items_item_type",
        diagnostic: "invalid or inaccessible item type IDs: every ID listed in \
                     validators.items_item_type.item_types must identify an item type that \
                     exists in the target environment",
    },
    ErrorSignature {
        needle: "item_item_type",
        diagnostic: "invalid or inaccessible item type IDs: every ID listed in \
                     validators.item_item_type.item_types must identify an item type that \
                     exists in the target environment",
    },
    ErrorSignature {
        needle: "rich_text_blocks",
        diagnostic: "rich_text fields require validators.rich_text_blocks listing the allowed \
                     block item types, for example \
                     {\"rich_text_blocks\":{\"item_types\":[\"<block item type id>\"]}}",
    },
    ErrorSignature {
        needle: "structured_text_blocks",
        diagnostic: "structured_text fields require validators.structured_text_blocks listing \
                     the allowed block item types, for example \
                     {\"structured_text_blocks\":{\"item_types\":[\"<block item type id>\"]}}",
    },
    ErrorSignature {
        needle: "enum",
        diagnostic: "enum validator values must equal, in order, the option values configured \
                     on the string_select editor; update validators.enum.values or \
                     appearance.parameters.options so both lists match",
    },
    ErrorSignature {
        needle: "editor",
        diagnostic: "unknown editor identifier: use the canonical editor for the field type \
                     (legacy identifiers were renamed; for example \"lat_lon_editor\" is now \
                     \"map\")",
    },
];

// ============================================================================
// SECTION: Rewriting
// ============================================================================

/// Rewrites a raw upstream error into the closest known diagnostic.
///
/// The first matching signature wins; unmatched errors are wrapped with a
/// generic prefix and passed through otherwise untouched.
#[must_use]
pub fn rewrite_upstream_error(raw: &str) -> String {
    for signature in UPSTREAM_SIGNATURES {
        if raw.contains(signature.needle) {
            return signature.diagnostic.to_string();
        }
    }
    format!("content platform rejected the request: {raw}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
