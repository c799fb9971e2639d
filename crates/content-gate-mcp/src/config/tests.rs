// crates/content-gate-mcp/src/config/tests.rs
// ============================================================================
// Module: Server Configuration Tests
// Description: Unit tests for config loading and validation.
// Purpose: Pin fail-closed behavior for transport/auth/platform settings.
// Dependencies: tempfile, toml
// ============================================================================

//! ## Overview
//! Exercises the fail-closed validation paths: loopback enforcement,
//! stdio/auth pairing, platform URL hygiene, and on-disk loading.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "tests assert on controlled inputs"
)]

use std::io::Write;

use crate::config::ConfigError;
use crate::config::ContentGateConfig;
use crate::config::ServerAuthMode;
use crate::config::ServerTransport;

/// Parses a TOML fixture without touching disk.
fn parse(content: &str) -> Result<ContentGateConfig, ConfigError> {
    let config: ContentGateConfig =
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Minimal valid stdio configuration.
const STDIO_CONFIG: &str = r#"
[platform]
base_url = "https://platform.example/api"
"#;

#[test]
fn stdio_defaults_load_and_validate() {
    let config = parse(STDIO_CONFIG).expect("config valid");
    assert_eq!(config.server.transport, ServerTransport::Stdio);
    assert!(config.server.auth.is_none());
}

#[test]
fn http_transport_requires_bind_address() {
    let content = r#"
[server]
transport = "http"

[platform]
base_url = "https://platform.example/api"
"#;
    let err = parse(content).expect_err("bind required");
    assert!(err.to_string().contains("bind"), "unexpected error: {err}");
}

#[test]
fn non_loopback_bind_requires_auth_policy() {
    let content = r#"
[server]
transport = "http"
bind = "0.0.0.0:8750"

[platform]
base_url = "https://platform.example/api"
"#;
    let err = parse(content).expect_err("auth policy required");
    assert!(err.to_string().contains("non-loopback"), "unexpected error: {err}");
}

#[test]
fn non_loopback_bind_with_bearer_tokens_is_accepted() {
    let content = r#"
[server]
transport = "http"
bind = "0.0.0.0:8750"

[server.auth]
mode = "bearer_token"
bearer_tokens = ["secret-token"]

[platform]
base_url = "https://platform.example/api"
"#;
    let config = parse(content).expect("config valid");
    let auth = config.server.auth.expect("auth present");
    assert_eq!(auth.mode, ServerAuthMode::BearerToken);
}

#[test]
fn stdio_transport_rejects_bearer_auth() {
    let content = r#"
[server]
transport = "stdio"

[server.auth]
mode = "bearer_token"
bearer_tokens = ["secret-token"]

[platform]
base_url = "https://platform.example/api"
"#;
    let err = parse(content).expect_err("stdio must be local_only");
    assert!(err.to_string().contains("local_only"), "unexpected error: {err}");
}

#[test]
fn bearer_mode_requires_at_least_one_token() {
    let content = r#"
[server]
transport = "http"
bind = "127.0.0.1:8750"

[server.auth]
mode = "bearer_token"

[platform]
base_url = "https://platform.example/api"
"#;
    let err = parse(content).expect_err("tokens required");
    assert!(err.to_string().contains("at least one token"), "unexpected error: {err}");
}

#[test]
fn plain_http_platform_url_requires_opt_in() {
    let content = r#"
[platform]
base_url = "http://127.0.0.1:9999"
"#;
    let err = parse(content).expect_err("https required");
    assert!(err.to_string().contains("allow_insecure_http"), "unexpected error: {err}");
}

#[test]
fn file_audit_sink_requires_path() {
    let content = r#"
[server.audit]
sink = "file"

[platform]
base_url = "https://platform.example/api"
"#;
    let err = parse(content).expect_err("path required");
    assert!(err.to_string().contains("path"), "unexpected error: {err}");
}

#[test]
fn load_reads_config_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(STDIO_CONFIG.as_bytes()).expect("write config");
    let config = ContentGateConfig::load(Some(file.path())).expect("config loads");
    assert_eq!(config.platform.base_url, "https://platform.example/api");
}

#[test]
fn load_reports_missing_file_as_io_error() {
    let missing = std::path::Path::new("/nonexistent/content-gate.toml");
    match ContentGateConfig::load(Some(missing)) {
        Err(ConfigError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}
