// crates/content-gate-client/src/http/tests.rs
// ============================================================================
// Module: HTTP Transport Tests
// Description: Unit tests for transport construction and error decoding.
// Purpose: Pin URL hygiene, error-body extraction, and query flattening.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Covers the pure parts of the transport: configuration validation,
//! upstream-message extraction, and query flattening. Network round trips
//! are exercised through the router's fake clients instead.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "tests assert on controlled inputs"
)]

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::error::ApiError;
use crate::http::HttpTransport;
use crate::http::PlatformHttpConfig;
use crate::http::extract_upstream_message;
use crate::http::query_pairs;

/// Config fixture pointing at a local plain-http endpoint.
fn insecure_config() -> PlatformHttpConfig {
    PlatformHttpConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout_ms: 100,
        request_timeout_ms: 100,
        allow_insecure_http: false,
    }
}

#[test]
fn plain_http_base_url_is_rejected_by_default() {
    let result = HttpTransport::new(&insecure_config(), "token".to_string(), None);
    match result {
        Err(ApiError::Transport(message)) => {
            assert!(message.contains("https"), "unexpected message: {message}");
        }
        Err(other) => panic!("expected transport error, got {other:?}"),
        Ok(_) => panic!("expected plain-http rejection"),
    }
}

#[test]
fn plain_http_base_url_is_allowed_when_opted_in() {
    let mut config = insecure_config();
    config.allow_insecure_http = true;
    let transport = HttpTransport::new(&config, "token".to_string(), None);
    assert!(transport.is_ok());
}

#[test]
fn trailing_slash_is_trimmed_from_base_url() {
    let config = PlatformHttpConfig {
        base_url: "https://platform.example/api/".to_string(),
        connect_timeout_ms: 100,
        request_timeout_ms: 100,
        allow_insecure_http: false,
    };
    let transport =
        HttpTransport::new(&config, "token".to_string(), None).expect("transport builds");
    assert_eq!(transport.url("/site"), "https://platform.example/api/site");
}

#[test]
fn upstream_message_prefers_nested_error_object() {
    let body = json!({"error": {"message": "INVALID_FIELD"}}).to_string();
    assert_eq!(extract_upstream_message(&body), "INVALID_FIELD");
}

#[test]
fn upstream_message_accepts_flat_message_key() {
    let body = json!({"message": "not found"}).to_string();
    assert_eq!(extract_upstream_message(&body), "not found");
}

#[test]
fn upstream_message_falls_back_to_raw_body() {
    assert_eq!(extract_upstream_message("gateway timeout"), "gateway timeout");
}

#[test]
fn upstream_message_handles_empty_body() {
    assert_eq!(
        extract_upstream_message("  "),
        "upstream returned an error with no body"
    );
}

#[test]
fn query_pairs_render_scalars_without_json_quoting() {
    let mut query = Map::new();
    query.insert("filter".to_string(), Value::String("draft".to_string()));
    query.insert("page".to_string(), json!(3));
    let pairs = query_pairs(&query);
    assert!(pairs.contains(&("filter".to_string(), "draft".to_string())));
    assert!(pairs.contains(&("page".to_string(), "3".to_string())));
}
