// crates/content-gate-mcp/src/tools/tests.rs
// ============================================================================
// Module: Tool Router Tests
// Description: Routing-gate and dispatch tests over an in-memory platform.
// Purpose: Verify gate ordering, registry completeness, and field rules.
// Dependencies: content-gate-client, content-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Tests for the routing gates (guidance, action lookup, validation) run
//! through a real [`ToolRouter`]; dispatch behavior runs against the handler
//! modules directly with a recording in-memory platform client, so no test
//! touches the network.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "tests assert on known-good fixtures"
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use content_gate_client::ApiError;
use content_gate_client::ClientCache;
use content_gate_client::CollaboratorsApi;
use content_gate_client::EnvironmentsApi;
use content_gate_client::FieldsApi;
use content_gate_client::ItemTypesApi;
use content_gate_client::ItemsApi;
use content_gate_client::PlatformClient;
use content_gate_client::PlatformHttpConfig;
use content_gate_client::SiteApi;
use content_gate_client::UploadsApi;
use content_gate_client::WebhooksApi;
use content_gate_core::envelope::EnvelopeContent;
use content_gate_core::envelope::HandlerResult;
use content_gate_core::envelope::ResponseEnvelope;
use content_gate_core::schema::Domain;
use content_gate_core::validation::ValidatedArgs;
use content_gate_core::validation::validate;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use super::RouteError;
use super::ToolError;
use super::ToolRouter;
use super::ToolRouterConfig;
use super::build_registry;
use crate::audit::NoopAuditSink;
use crate::audit::ToolOutcome;
use crate::auth::DefaultToolAuthz;
use crate::auth::NoopAuthAuditSink;
use crate::auth::RequestContext;
use crate::handlers;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Recording in-memory platform backing every sub-client trait.
#[derive(Default)]
struct FakePlatform {
    /// Recorded calls as (method, payload) pairs.
    calls: Mutex<Vec<(String, Value)>>,
    /// Canned responses by method name.
    responses: Mutex<BTreeMap<String, Result<Value, ApiError>>>,
}

impl FakePlatform {
    fn record(&self, method: &str, payload: Value) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push((method.to_string(), payload));
        self.responses
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_else(|| Ok(json!({"id": "fixture-1"})))
    }

    fn respond(&self, method: &str, response: Result<Value, ApiError>) {
        self.responses.lock().unwrap().insert(method.to_string(), response);
    }

    fn last_call(&self, method: &str) -> Value {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(name, _)| name == method)
            .map(|(_, payload)| payload.clone())
            .expect("expected a recorded call")
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl SiteApi for FakePlatform {
    fn find(&self) -> Result<Value, ApiError> {
        self.record("site.find", Value::Null)
    }

    fn update(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.record("site.update", attrs.clone())
    }
}

impl ItemsApi for FakePlatform {
    fn list(&self, query: &Map<String, Value>) -> Result<Value, ApiError> {
        self.record("items.list", Value::Object(query.clone()))
    }

    fn find(&self, item_id: &str) -> Result<Value, ApiError> {
        self.record("items.find", json!(item_id))
    }

    fn create(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.record("items.create", attrs.clone())
    }

    fn update(&self, item_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.record("items.update", json!({"id": item_id, "attrs": attrs}))
    }

    fn duplicate(&self, item_id: &str) -> Result<Value, ApiError> {
        self.record("items.duplicate", json!(item_id))
    }

    fn destroy(&self, item_id: &str) -> Result<Value, ApiError> {
        self.record("items.destroy", json!(item_id))
    }

    fn publish(&self, item_id: &str) -> Result<Value, ApiError> {
        self.record("items.publish", json!(item_id))
    }

    fn unpublish(&self, item_id: &str) -> Result<Value, ApiError> {
        self.record("items.unpublish", json!(item_id))
    }
}

impl ItemTypesApi for FakePlatform {
    fn list(&self) -> Result<Value, ApiError> {
        self.record("item_types.list", Value::Null)
    }

    fn find(&self, item_type_id: &str) -> Result<Value, ApiError> {
        self.record("item_types.find", json!(item_type_id))
    }

    fn create(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.record("item_types.create", attrs.clone())
    }

    fn update(&self, item_type_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.record("item_types.update", json!({"id": item_type_id, "attrs": attrs}))
    }

    fn destroy(&self, item_type_id: &str) -> Result<Value, ApiError> {
        self.record("item_types.destroy", json!(item_type_id))
    }
}

impl FieldsApi for FakePlatform {
    fn list(&self, item_type_id: &str) -> Result<Value, ApiError> {
        self.record("fields.list", json!(item_type_id))
    }

    fn find(&self, field_id: &str) -> Result<Value, ApiError> {
        self.record("fields.find", json!(field_id))
    }

    fn create(&self, item_type_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.record("fields.create", json!({"item_type_id": item_type_id, "attrs": attrs}))
    }

    fn update(&self, field_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.record("fields.update", json!({"id": field_id, "attrs": attrs}))
    }

    fn destroy(&self, field_id: &str) -> Result<Value, ApiError> {
        self.record("fields.destroy", json!(field_id))
    }
}

impl UploadsApi for FakePlatform {
    fn list(&self, query: &Map<String, Value>) -> Result<Value, ApiError> {
        self.record("uploads.list", Value::Object(query.clone()))
    }

    fn find(&self, upload_id: &str) -> Result<Value, ApiError> {
        self.record("uploads.find", json!(upload_id))
    }

    fn update(&self, upload_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.record("uploads.update", json!({"id": upload_id, "attrs": attrs}))
    }

    fn destroy(&self, upload_id: &str) -> Result<Value, ApiError> {
        self.record("uploads.destroy", json!(upload_id))
    }
}

impl EnvironmentsApi for FakePlatform {
    fn list(&self) -> Result<Value, ApiError> {
        self.record("environments.list", Value::Null)
    }

    fn fork(&self, source_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.record("environments.fork", json!({"source": source_id, "attrs": attrs}))
    }

    fn promote(&self, environment_id: &str) -> Result<Value, ApiError> {
        self.record("environments.promote", json!(environment_id))
    }

    fn destroy(&self, environment_id: &str) -> Result<Value, ApiError> {
        self.record("environments.destroy", json!(environment_id))
    }
}

impl CollaboratorsApi for FakePlatform {
    fn list(&self) -> Result<Value, ApiError> {
        self.record("collaborators.list", Value::Null)
    }

    fn invite(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.record("collaborators.invite", attrs.clone())
    }

    fn destroy(&self, collaborator_id: &str) -> Result<Value, ApiError> {
        self.record("collaborators.destroy", json!(collaborator_id))
    }

    fn roles(&self) -> Result<Value, ApiError> {
        self.record("collaborators.roles", Value::Null)
    }
}

impl WebhooksApi for FakePlatform {
    fn list(&self) -> Result<Value, ApiError> {
        self.record("webhooks.list", Value::Null)
    }

    fn find(&self, webhook_id: &str) -> Result<Value, ApiError> {
        self.record("webhooks.find", json!(webhook_id))
    }

    fn create(&self, attrs: &Value) -> Result<Value, ApiError> {
        self.record("webhooks.create", attrs.clone())
    }

    fn update(&self, webhook_id: &str, attrs: &Value) -> Result<Value, ApiError> {
        self.record("webhooks.update", json!({"id": webhook_id, "attrs": attrs}))
    }

    fn destroy(&self, webhook_id: &str) -> Result<Value, ApiError> {
        self.record("webhooks.destroy", json!(webhook_id))
    }
}

fn fake_client() -> (Arc<FakePlatform>, PlatformClient) {
    let fake = Arc::new(FakePlatform::default());
    let client = PlatformClient {
        site: fake.clone(),
        items: fake.clone(),
        item_types: fake.clone(),
        fields: fake.clone(),
        uploads: fake.clone(),
        environments: fake.clone(),
        collaborators: fake.clone(),
        webhooks: fake.clone(),
    };
    (fake, client)
}

fn router() -> ToolRouter {
    let cache = ClientCache::new(PlatformHttpConfig {
        base_url: "https://platform.test".to_string(),
        connect_timeout_ms: 5_000,
        request_timeout_ms: 30_000,
        allow_insecure_http: false,
    });
    ToolRouter::new(ToolRouterConfig {
        cache: Arc::new(cache),
        authz: Arc::new(DefaultToolAuthz::from_config(None)),
        auth_audit: Arc::new(NoopAuthAuditSink),
        audit: Arc::new(NoopAuditSink),
    })
    .expect("router builds")
}

fn envelope_text(envelope: &ResponseEnvelope) -> &str {
    match envelope.content.first().expect("envelope carries content") {
        EnvelopeContent::Text {
            text,
        } => text,
    }
}

fn validated(domain: Domain, action: &str, args: Value) -> ValidatedArgs {
    let registry = build_registry().expect("registry builds");
    let schema = registry.get(domain, action).expect("action registered");
    validate(schema, &args).expect("arguments validate")
}

// ============================================================================
// SECTION: Routing Gate Tests
// ============================================================================

#[test]
fn router_builds_and_lists_one_tool_per_domain() {
    let router = router();
    let tools = router.list_tools(&RequestContext::stdio()).expect("list_tools succeeds");
    let names: Vec<&str> = tools.iter().map(|tool| tool.name.as_str()).collect();
    let expected: Vec<&str> = Domain::ALL.iter().map(|domain| domain.as_str()).collect();
    assert_eq!(names, expected);
}

#[test]
fn every_registered_action_routes_somewhere() {
    let router = router();
    for domain in Domain::ALL {
        for action in router.registry.actions(domain).to_vec() {
            let (_, outcome) =
                router.route(domain, Some(action.as_str()), &json!({"probe": true}));
            assert!(
                outcome != ToolOutcome::UnsupportedAction,
                "{}.{action} should route",
                domain.as_str(),
            );
        }
    }
}

#[test]
fn missing_action_yields_discovery_guidance() {
    let router = router();
    let (envelope, outcome) = router.route(Domain::Records, None, &json!({"api_token": "t"}));
    assert_eq!(outcome, ToolOutcome::MissingParameters);
    let text = envelope_text(&envelope);
    assert!(text.contains("describe"));
    assert!(text.contains("duplicate"));
    assert!(!text.contains("Invalid arguments"));
}

#[test]
fn empty_args_yield_guidance_not_validation_errors() {
    let router = router();
    let (envelope, outcome) = router.route(Domain::Records, Some("create"), &Value::Null);
    assert_eq!(outcome, ToolOutcome::MissingParameters);
    let text = envelope_text(&envelope);
    assert!(text.contains("describe"));
    assert!(!text.contains("Invalid arguments"));
}

#[test]
fn unknown_action_enumerates_valid_actions() {
    let router = router();
    let (envelope, outcome) =
        router.route(Domain::Records, Some("explode"), &json!({"api_token": "t"}));
    assert_eq!(outcome, ToolOutcome::UnsupportedAction);
    let text = envelope_text(&envelope);
    assert!(text.contains("unsupported action \"explode\""));
    assert!(text.contains("publish"));
    assert!(text.contains("unpublish"));
}

#[test]
fn missing_required_field_is_reported_by_name() {
    let router = router();
    let (envelope, outcome) =
        router.route(Domain::Records, Some("get"), &json!({"api_token": "secret"}));
    assert_eq!(outcome, ToolOutcome::Validation);
    let text = envelope_text(&envelope);
    assert!(text.contains("- record_id: required field is missing"));
    assert!(!text.contains("- api_token:"));
    assert!(text.contains("Expected argument shape:"));
}

#[test]
fn describe_renders_every_action_shape() {
    let router = router();
    let (envelope, outcome) = router.route(Domain::Schema, Some("describe"), &Value::Null);
    assert_eq!(outcome, ToolOutcome::Success);
    let text = envelope_text(&envelope);
    assert!(text.contains("create_field"));
    assert!(text.contains("delete_model"));
}

#[test]
fn describe_renders_a_single_named_action() {
    let router = router();
    let (envelope, outcome) =
        router.route(Domain::Records, Some("describe"), &json!({"action": "duplicate"}));
    assert_eq!(outcome, ToolOutcome::Success);
    let text = envelope_text(&envelope);
    assert!(text.contains("records.duplicate"));
    assert!(text.contains("return_only_confirmation"));
}

#[test]
fn handle_tool_call_rejects_unknown_tools() {
    let router = router();
    let result =
        router.handle_tool_call(&RequestContext::stdio(), "nonsense", json!({"action": "list"}));
    assert!(matches!(result, Err(ToolError::UnknownTool)));
}

#[test]
fn handle_tool_call_returns_an_envelope_value() {
    let router = router();
    let value = router
        .handle_tool_call(&RequestContext::stdio(), "records", json!({"action": "describe"}))
        .expect("call succeeds");
    assert_eq!(value["content"][0]["type"], json!("text"));
    assert!(value["content"][0]["text"].as_str().is_some());
}

// ============================================================================
// SECTION: Dispatch Tests
// ============================================================================

#[test]
fn rich_text_field_without_blocks_is_rejected_before_any_platform_call() {
    let (fake, client) = fake_client();
    let args = validated(
        Domain::Schema,
        "create_field",
        json!({
            "api_token": "t",
            "model_id": "model-1",
            "label": "Body",
            "api_key": "body",
            "field_type": "rich_text",
        }),
    );
    let result = handlers::schema::dispatch(handlers::schema::Action::CreateField, &args, &client);
    let Err(RouteError::BusinessRule(message)) = result else {
        panic!("expected a business-rule rejection");
    };
    assert!(message.contains("rich_text_blocks"));
    assert!(message.contains("item_types"));
    assert_eq!(fake.call_count(), 0);
}

#[test]
fn legacy_editor_identifier_is_rewritten_before_dispatch() {
    let (fake, client) = fake_client();
    let args = validated(
        Domain::Schema,
        "create_field",
        json!({
            "api_token": "t",
            "model_id": "model-1",
            "label": "Location",
            "api_key": "location",
            "field_type": "lat_lon",
            "appearance": {"editor": "lat_lon_editor", "parameters": {}},
        }),
    );
    handlers::schema::dispatch(handlers::schema::Action::CreateField, &args, &client)
        .expect("field creation succeeds");
    let payload = fake.last_call("fields.create");
    assert_eq!(payload["item_type_id"], json!("model-1"));
    assert_eq!(payload["attrs"]["appearance"]["editor"], json!("map"));
}

#[test]
fn color_field_synthesizes_its_default_appearance() {
    let (fake, client) = fake_client();
    let args = validated(
        Domain::Schema,
        "create_field",
        json!({
            "api_token": "t",
            "model_id": "model-1",
            "label": "Accent",
            "api_key": "accent",
            "field_type": "color",
        }),
    );
    handlers::schema::dispatch(handlers::schema::Action::CreateField, &args, &client)
        .expect("field creation succeeds");
    let attrs = fake.last_call("fields.create")["attrs"].clone();
    assert_eq!(attrs["appearance"]["editor"], json!("color_picker"));
    assert_eq!(attrs["appearance"]["parameters"]["enable_alpha"], json!(false));
    assert_eq!(attrs["appearance"]["addons"], json!([]));
}

#[test]
fn duplicate_with_confirmation_names_both_record_ids() {
    let (fake, client) = fake_client();
    fake.respond("items.duplicate", Ok(json!({"id": "rec-copy"})));
    let args = validated(
        Domain::Records,
        "duplicate",
        json!({
            "api_token": "t",
            "record_id": "rec-1",
            "return_only_confirmation": true,
        }),
    );
    let result = handlers::records::dispatch(handlers::records::Action::Duplicate, &args, &client)
        .expect("duplication succeeds");
    let HandlerResult::Success {
        data,
        message,
    } = result
    else {
        panic!("expected a success result");
    };
    assert_eq!(data, Value::Null);
    let message = message.expect("confirmation message present");
    assert!(message.contains("rec-1"));
    assert!(message.contains("rec-copy"));
}

#[test]
fn duplicate_without_confirmation_returns_the_full_payload() {
    let (fake, client) = fake_client();
    fake.respond("items.duplicate", Ok(json!({"id": "rec-copy", "data": {"title": "x"}})));
    let args = validated(
        Domain::Records,
        "duplicate",
        json!({"api_token": "t", "record_id": "rec-1"}),
    );
    let result = handlers::records::dispatch(handlers::records::Action::Duplicate, &args, &client)
        .expect("duplication succeeds");
    assert_eq!(
        result,
        HandlerResult::success(json!({"id": "rec-copy", "data": {"title": "x"}})),
    );
}

#[test]
fn upstream_item_type_errors_are_rewritten() {
    let (fake, client) = fake_client();
    fake.respond(
        "fields.create",
        Err(ApiError::Upstream {
            status: 422,
            message: "INVALID_FIELD: item_item_type references an unknown entity".to_string(),
        }),
    );
    let args = validated(
        Domain::Schema,
        "create_field",
        json!({
            "api_token": "t",
            "model_id": "model-1",
            "label": "Author",
            "api_key": "author",
            "field_type": "link",
            "validators": {"item_item_type": {"item_types": ["model-2"]}},
        }),
    );
    let result = handlers::schema::dispatch(handlers::schema::Action::CreateField, &args, &client);
    let Err(RouteError::Upstream(message)) = result else {
        panic!("expected an upstream rejection");
    };
    assert!(message.contains("invalid or inaccessible item type IDs"));
}

#[test]
fn record_list_folds_model_id_into_the_query() {
    let (fake, client) = fake_client();
    let args = validated(
        Domain::Records,
        "list",
        json!({
            "api_token": "t",
            "model_id": "model-1",
            "page": {"limit": 10},
        }),
    );
    handlers::records::dispatch(handlers::records::Action::List, &args, &client)
        .expect("listing succeeds");
    let query = fake.last_call("items.list");
    assert_eq!(query["item_type"], json!("model-1"));
    assert_eq!(query["page"], json!({"limit": 10}));
}

#[test]
fn removing_the_last_locale_is_rejected() {
    let (fake, client) = fake_client();
    fake.respond("site.find", Ok(json!({"id": "site-1", "locales": ["en"]})));
    let args = validated(
        Domain::Locales,
        "remove",
        json!({"api_token": "t", "locale": "en"}),
    );
    let result = handlers::locales::dispatch(handlers::locales::Action::Remove, &args, &client)
        .expect("dispatch itself succeeds");
    let HandlerResult::Failure {
        error, ..
    } = result
    else {
        panic!("expected a failure result");
    };
    assert!(error.contains("last remaining locale"));
    assert_eq!(fake.call_count(), 1);
}

#[test]
fn route_error_outcomes_match_their_variants() {
    assert_eq!(
        RouteError::BusinessRule(String::new()).outcome(),
        ToolOutcome::BusinessRule,
    );
    assert_eq!(RouteError::Upstream(String::new()).outcome(), ToolOutcome::Upstream);
    assert_eq!(RouteError::Internal(String::new()).outcome(), ToolOutcome::Internal);
}
