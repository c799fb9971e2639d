// crates/content-gate-client/src/http.rs
// ============================================================================
// Module: Platform HTTP Transport
// Description: Blocking HTTP client for the content platform REST API.
// Purpose: Implement every sub-client trait over one shared transport.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HttpTransport`] owns one blocking reqwest client plus the credentials
//! for a single token/environment pair. [`HttpPlatformApi`] wraps the
//! transport and implements all eight sub-client traits so the same handle
//! can be cloned into every slot of a
//! [`PlatformClient`](crate::api::PlatformClient).
//!
//! ## Invariants
//! - Response bodies are read through a hard byte cap; an oversized body is
//!   a transport error, never a truncated success.
//! - Non-2xx statuses surface as [`ApiError::Upstream`] carrying the
//!   upstream message text, never as a panic or silent empty value.
//! - The sandbox environment, when set, rides on every request as the
//!   `X-Environment` header.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::api::CollaboratorsApi;
use crate::api::EnvironmentsApi;
use crate::api::FieldsApi;
use crate::api::ItemTypesApi;
use crate::api::ItemsApi;
use crate::api::PlatformClient;
use crate::api::SiteApi;
use crate::api::UploadsApi;
use crate::api::WebhooksApi;
use crate::error::ApiError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Hard cap on platform response bodies (bytes).
const MAX_RESPONSE_BYTES: u64 = 4 * 1024 * 1024;

/// Environment selection header name.
const ENVIRONMENT_HEADER: &str = "X-Environment";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Connection settings shared by every transport built from one deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformHttpConfig {
    /// Base URL of the content platform management API.
    pub base_url: String,
    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// End-to-end request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Permits plain-http base URLs. Intended for local test fixtures only.
    #[serde(default)]
    pub allow_insecure_http: bool,
}

/// Default connect timeout (5 seconds).
const fn default_connect_timeout_ms() -> u64 {
    5_000
}

/// Default request timeout (30 seconds).
const fn default_request_timeout_ms() -> u64 {
    30_000
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Blocking transport bound to one token/environment pair.
pub struct HttpTransport {
    /// Shared blocking HTTP client.
    client: reqwest::blocking::Client,
    /// Base URL without trailing slash.
    base_url: String,
    /// Management API token sent as a bearer credential.
    token: String,
    /// Sandbox environment routed via header, when selected.
    environment: Option<String>,
}

impl HttpTransport {
    /// Builds a transport for one credential pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the base URL scheme is rejected
    /// or the underlying client cannot be constructed.
    pub fn new(
        config: &PlatformHttpConfig,
        token: String,
        environment: Option<String>,
    ) -> Result<Self, ApiError> {
        if !config.allow_insecure_http && !config.base_url.starts_with("https://") {
            return Err(ApiError::Transport(format!(
                "platform base URL must use https: {}",
                config.base_url
            )));
        }
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|err| ApiError::Transport(format!("http client build failed: {err}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            environment,
        })
    }

    /// Issues a GET request against `path`.
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let request = self
            .client
            .get(self.url(path))
            .query(query);
        self.execute(request)
    }

    /// Issues a POST request with a JSON body.
    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request)
    }

    /// Issues a POST request without a body.
    fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(path));
        self.execute(request)
    }

    /// Issues a PUT request with a JSON body.
    fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let request = self.client.put(self.url(path)).json(body);
        self.execute(request)
    }

    /// Issues a DELETE request against `path`.
    fn delete(&self, path: &str) -> Result<Value, ApiError> {
        let request = self.client.delete(self.url(path));
        self.execute(request)
    }

    /// Joins the base URL with a request path.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attaches credentials, sends, and decodes one request.
    fn execute(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<Value, ApiError> {
        let mut request = request.bearer_auth(&self.token);
        if let Some(environment) = &self.environment {
            request = request.header(ENVIRONMENT_HEADER, environment);
        }
        let response = request.send().map_err(map_send_error)?;
        let status = response.status();
        let body = read_response_body(response)?;
        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&body).map_err(|err| {
                ApiError::Transport(format!("platform response is not valid JSON: {err}"))
            })
        } else {
            Err(ApiError::Upstream {
                status: status.as_u16(),
                message: extract_upstream_message(&body),
            })
        }
    }
}

/// Reads a response body with a hard byte cap.
fn read_response_body(response: reqwest::blocking::Response) -> Result<String, ApiError> {
    let mut body = String::new();
    let mut limited = response.take(MAX_RESPONSE_BYTES.saturating_add(1));
    limited
        .read_to_string(&mut body)
        .map_err(|err| ApiError::Transport(format!("failed reading response body: {err}")))?;
    if body.len() as u64 > MAX_RESPONSE_BYTES {
        return Err(ApiError::Transport(format!(
            "response body exceeds {MAX_RESPONSE_BYTES} bytes"
        )));
    }
    Ok(body)
}

/// Maps a reqwest send failure into a stable transport message.
fn map_send_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Transport("platform request timed out".to_string())
    } else if err.is_connect() {
        ApiError::Transport("failed to connect to the content platform".to_string())
    } else {
        ApiError::Transport(format!("platform request failed: {err}"))
    }
}

/// Pulls a human-readable message out of an error body.
///
/// The platform wraps errors as `{"error": {"message": "..."}}` or a plain
/// `{"message": "..."}`; anything else falls back to the raw body text.
fn extract_upstream_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "upstream returned an error with no body".to_string()
    } else {
        body.trim().to_string()
    }
}

/// Flattens a JSON query object into string pairs.
fn query_pairs(query: &Map<String, Value>) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

// ============================================================================
// SECTION: Trait Implementations
// ============================================================================

/// One transport handle implementing every sub-client trait.
#[derive(Clone)]
pub struct HttpPlatformApi {
    /// Shared transport for this credential pair.
    transport: Arc<HttpTransport>,
}

impl HttpPlatformApi {
    /// Wraps a transport handle.
    #[must_use]
    pub const fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Assembles a full client bundle over this handle.
    #[must_use]
    pub fn into_client(self) -> PlatformClient {
        let shared = Arc::new(self);
        PlatformClient {
            site: Arc::clone(&shared) as Arc<dyn SiteApi>,
            items: Arc::clone(&shared) as Arc<dyn ItemsApi>,
            item_types: Arc::clone(&shared) as Arc<dyn ItemTypesApi>,
            fields: Arc::clone(&shared) as Arc<dyn FieldsApi>,
            uploads: Arc::clone(&shared) as Arc<dyn UploadsApi>,
            environments: Arc::clone(&shared) as Arc<dyn EnvironmentsApi>,
            collaborators: Arc::clone(&shared) as Arc<dyn CollaboratorsApi>,
            webhooks: shared as Arc<dyn WebhooksApi>,
        }
    }
}

impl SiteApi for HttpPlatformApi {
    fn find(&self) -> Result<Value, ApiError> {
        self.transport.get("/site", &[])
    }

    fn update(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.put("/site", attrs)
    }
}

impl ItemsApi for HttpPlatformApi {
    fn list(&self, query: &Map<String, Value>) -> Result<Value, ApiError> {
        self.transport.get("/items", &query_pairs(query))
    }

    fn find(&self, item_id: &str) -> Result<Value, ApiError> {
        self.transport.get(&format!("/items/{item_id}"), &[])
    }

    fn create(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.post("/items", attrs)
    }

    fn update(&self, item_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.put(&format!("/items/{item_id}"), attrs)
    }

    fn duplicate(&self, item_id: &str) -> Result<Value, ApiError> {
        self.transport.post_empty(&format!("/items/{item_id}/duplicate"))
    }

    fn destroy(&self, item_id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&format!("/items/{item_id}"))
    }

    fn publish(&self, item_id: &str) -> Result<Value, ApiError> {
        self.transport.post_empty(&format!("/items/{item_id}/publish"))
    }

    fn unpublish(&self, item_id: &str) -> Result<Value, ApiError> {
        self.transport.post_empty(&format!("/items/{item_id}/unpublish"))
    }
}

impl ItemTypesApi for HttpPlatformApi {
    fn list(&self) -> Result<Value, ApiError> {
        self.transport.get("/item-types", &[])
    }

    fn find(&self, item_type_id: &str) -> Result<Value, ApiError> {
        self.transport.get(&format!("/item-types/{item_type_id}"), &[])
    }

    fn create(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.post("/item-types", attrs)
    }

    fn update(&self, item_type_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.transport
            .put(&format!("/item-types/{item_type_id}"), attrs)
    }

    fn destroy(&self, item_type_id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&format!("/item-types/{item_type_id}"))
    }
}

impl FieldsApi for HttpPlatformApi {
    fn list(&self, item_type_id: &str) -> Result<Value, ApiError> {
        self.transport
            .get(&format!("/item-types/{item_type_id}/fields"), &[])
    }

    fn find(&self, field_id: &str) -> Result<Value, ApiError> {
        self.transport.get(&format!("/fields/{field_id}"), &[])
    }

    fn create(&self, item_type_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.transport
            .post(&format!("/item-types/{item_type_id}/fields"), attrs)
    }

    fn update(&self, field_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.put(&format!("/fields/{field_id}"), attrs)
    }

    fn destroy(&self, field_id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&format!("/fields/{field_id}"))
    }
}

impl UploadsApi for HttpPlatformApi {
    fn list(&self, query: &Map<String, Value>) -> Result<Value, ApiError> {
        self.transport.get("/uploads", &query_pairs(query))
    }

    fn find(&self, upload_id: &str) -> Result<Value, ApiError> {
        self.transport.get(&format!("/uploads/{upload_id}"), &[])
    }

    fn update(&self, upload_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.put(&format!("/uploads/{upload_id}"), attrs)
    }

    fn destroy(&self, upload_id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&format!("/uploads/{upload_id}"))
    }
}

impl EnvironmentsApi for HttpPlatformApi {
    fn list(&self) -> Result<Value, ApiError> {
        self.transport.get("/environments", &[])
    }

    fn fork(&self, source_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.transport
            .post(&format!("/environments/{source_id}/fork"), attrs)
    }

    fn promote(&self, environment_id: &str) -> Result<Value, ApiError> {
        self.transport
            .post_empty(&format!("/environments/{environment_id}/promote"))
    }

    fn destroy(&self, environment_id: &str) -> Result<Value, ApiError> {
        self.transport
            .delete(&format!("/environments/{environment_id}"))
    }
}

impl CollaboratorsApi for HttpPlatformApi {
    fn list(&self) -> Result<Value, ApiError> {
        self.transport.get("/users", &[])
    }

    fn invite(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.post("/invitations", attrs)
    }

    fn destroy(&self, collaborator_id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&format!("/users/{collaborator_id}"))
    }

    fn roles(&self) -> Result<Value, ApiError> {
        self.transport.get("/roles", &[])
    }
}

impl WebhooksApi for HttpPlatformApi {
    fn list(&self) -> Result<Value, ApiError> {
        self.transport.get("/webhooks", &[])
    }

    fn find(&self, webhook_id: &str) -> Result<Value, ApiError> {
        self.transport.get(&format!("/webhooks/{webhook_id}"), &[])
    }

    fn create(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.post("/webhooks", attrs)
    }

    fn update(&self, webhook_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.transport.put(&format!("/webhooks/{webhook_id}"), attrs)
    }

    fn destroy(&self, webhook_id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&format!("/webhooks/{webhook_id}"))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
