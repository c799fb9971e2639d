// crates/content-gate-client/src/cache/tests.rs
// ============================================================================
// Module: Client Cache Tests
// Description: Unit tests for credential-keyed client memoization.
// Purpose: Pin the one-client-per-credential-pair guarantee.
// Dependencies: none beyond the crate
// ============================================================================

//! ## Overview
//! Verifies that identical credential pairs share one client while distinct
//! pairs get distinct clients. No network traffic: building a transport
//! never dials out.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "tests assert on controlled inputs"
)]

use std::sync::Arc;

use crate::cache::ClientCache;
use crate::http::PlatformHttpConfig;

/// Cache fixture over a placeholder https endpoint.
fn cache() -> ClientCache {
    ClientCache::new(PlatformHttpConfig {
        base_url: "https://platform.example/api".to_string(),
        connect_timeout_ms: 100,
        request_timeout_ms: 100,
        allow_insecure_http: false,
    })
}

#[test]
fn same_credential_pair_shares_one_client() {
    let cache = cache();
    let first = cache
        .get_or_create("token-a", Some("sandbox"))
        .expect("client builds");
    let second = cache
        .get_or_create("token-a", Some("sandbox"))
        .expect("client builds");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn different_tokens_get_different_clients() {
    let cache = cache();
    let first = cache.get_or_create("token-a", None).expect("client builds");
    let second = cache.get_or_create("token-b", None).expect("client builds");
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn environment_is_part_of_the_key() {
    let cache = cache();
    let primary = cache.get_or_create("token-a", None).expect("client builds");
    let sandbox = cache
        .get_or_create("token-a", Some("sandbox"))
        .expect("client builds");
    assert!(!Arc::ptr_eq(&primary, &sandbox));
}
