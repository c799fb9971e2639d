// crates/content-gate-mcp/src/tools.rs
// ============================================================================
// Module: Tool Router
// Description: Action routing for the Content Gate server.
// Purpose: Validate, authorize, and dispatch domain tool calls.
// Dependencies: content-gate-client, content-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The tool router is the single entry point for `tools/list` and
//! `tools/call`. Each domain tool takes an `{action, args}` bag; the router
//! runs the hard gates in order (discovery guidance for empty args, action
//! lookup, structural validation, client resolution) and dispatches through
//! the closed per-domain action enums. Every failure past authentication is
//! rendered inside the response envelope; nothing escapes to the transport.
//!
//! ## Invariants
//! - The registry and the dispatch enums are verified against each other at
//!   construction; a mismatch is a startup error, never a runtime fallback.
//! - Handlers never observe credentials; the router consumes `api_token`
//!   and `environment` to resolve the platform client.
//! - Identical credential pairs reuse one client via the client cache.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use content_gate_client::ClientCache;
use content_gate_core::envelope::HandlerResult;
use content_gate_core::envelope::ResponseEnvelope;
use content_gate_core::envelope::normalize;
use content_gate_core::schema::Domain;
use content_gate_core::schema::ParamKind;
use content_gate_core::schema::ParamSchema;
use content_gate_core::schema::SchemaRegistry;
use content_gate_core::validation::validate;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::audit::ToolAuditEvent;
use crate::audit::ToolAuditEventParams;
use crate::audit::ToolAuditSink;
use crate::audit::ToolOutcome;
use crate::auth::AuthAction;
use crate::auth::AuthAuditEvent;
use crate::auth::AuthAuditSink;
use crate::auth::AuthError;
use crate::auth::RequestContext;
use crate::auth::ToolAuthz;
use crate::handlers;

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Action router for domain tool calls.
#[derive(Clone)]
pub struct ToolRouter {
    /// Per-action parameter schemas, verified complete at construction.
    registry: Arc<SchemaRegistry>,
    /// Memoized platform clients keyed by credential pair.
    cache: Arc<ClientCache>,
    /// Authn/authz policy for inbound calls.
    authz: Arc<dyn ToolAuthz>,
    /// Audit sink for auth decisions.
    auth_audit: Arc<dyn AuthAuditSink>,
    /// Audit sink for routed tool calls.
    audit: Arc<dyn ToolAuditSink>,
}

/// Configuration inputs for building a tool router.
pub struct ToolRouterConfig {
    /// Memoized platform clients keyed by credential pair.
    pub cache: Arc<ClientCache>,
    /// Authn/authz policy for inbound calls.
    pub authz: Arc<dyn ToolAuthz>,
    /// Audit sink for auth decisions.
    pub auth_audit: Arc<dyn AuthAuditSink>,
    /// Audit sink for routed tool calls.
    pub audit: Arc<dyn ToolAuditSink>,
}

impl ToolRouter {
    /// Creates a new tool router, verifying registry completeness.
    ///
    /// # Errors
    ///
    /// Returns [`RouterBuildError`] when a schema is registered twice or the
    /// registry and the dispatch enums disagree.
    pub fn new(config: ToolRouterConfig) -> Result<Self, RouterBuildError> {
        let registry = build_registry()?;
        verify_registry(&registry)?;
        Ok(Self {
            registry: Arc::new(registry),
            cache: config.cache,
            authz: config.authz,
            auth_audit: config.auth_audit,
            audit: config.audit,
        })
    }

    /// Lists the domain tools exposed by this server.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when authorization fails.
    pub fn list_tools(&self, context: &RequestContext) -> Result<Vec<ToolDefinition>, ToolError> {
        self.authorize(context, AuthAction::ListTools)?;
        Ok(Domain::ALL.iter().map(|domain| self.tool_definition(*domain)).collect())
    }

    /// Handles a tool call by domain name with an `{action, args}` payload.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] for unknown tools, auth failures, and
    /// serialization failures; every other failure is rendered inside the
    /// returned envelope.
    pub fn handle_tool_call(
        &self,
        context: &RequestContext,
        name: &str,
        arguments: Value,
    ) -> Result<Value, ToolError> {
        let Some(domain) = Domain::parse(name) else {
            return Err(ToolError::UnknownTool);
        };
        self.authorize(context, AuthAction::CallTool(name))?;
        let action = arguments
            .get("action")
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|action| !action.is_empty());
        let args = arguments.get("args").cloned().unwrap_or(Value::Null);
        let (envelope, outcome) = self.route(domain, action.as_deref(), &args);
        self.audit.record(&ToolAuditEvent::new(ToolAuditEventParams {
            domain: domain.as_str().to_string(),
            action,
            outcome,
            environment_scoped: args.get("environment").is_some_and(Value::is_string),
        }));
        serde_json::to_value(envelope).map_err(|_| ToolError::Serialization)
    }

    /// Routes one call, classifying the outcome for auditing.
    fn route(
        &self,
        domain: Domain,
        action: Option<&str>,
        args: &Value,
    ) -> (ResponseEnvelope, ToolOutcome) {
        match self.route_inner(domain, action, args) {
            Ok(envelope) => (envelope, ToolOutcome::Success),
            Err(error) => {
                let outcome = error.outcome();
                (error.into_envelope(), outcome)
            }
        }
    }

    /// Runs the routing gates in order.
    fn route_inner(
        &self,
        domain: Domain,
        action: Option<&str>,
        args: &Value,
    ) -> Result<ResponseEnvelope, RouteError> {
        let Some(action) = action else {
            return Err(RouteError::MissingParameters(self.guidance(domain)));
        };
        if action == "describe" {
            return Ok(self.describe(domain, args));
        }
        if args_are_empty(args) {
            return Err(RouteError::MissingParameters(self.guidance(domain)));
        }
        let Some(schema) = self.registry.get(domain, action) else {
            return Err(RouteError::UnsupportedAction {
                domain: domain.as_str(),
                action: action.to_string(),
                valid: self.registry.actions(domain).to_vec(),
            });
        };
        let validated =
            validate(schema, args).map_err(|failure| RouteError::Validation(failure.render(schema)))?;
        let token = validated
            .required_str("api_token")
            .map_err(|err| RouteError::Internal(err.to_string()))?;
        let environment = validated.str("environment");
        let client = self
            .cache
            .get_or_create(token, environment)
            .map_err(|err| RouteError::Internal(err.to_string()))?;
        let result = dispatch(domain, action, &validated, &client)?;
        Ok(normalize(result))
    }

    /// Renders the parameter-discovery guidance for a domain.
    fn guidance(&self, domain: Domain) -> String {
        let actions = self.registry.actions(domain).join(", ");
        format!(
            "The \"{name}\" tool takes {{\"action\": ..., \"args\": {{...}}}}. Available \
             actions: {actions}. Call {{\"action\": \"describe\"}} for the argument shape of \
             every action, or {{\"action\": \"describe\", \"args\": {{\"action\": \"NAME\"}}}} \
             for one action.",
            name = domain.as_str(),
        )
    }

    /// Renders the describe action for a domain.
    fn describe(&self, domain: Domain, args: &Value) -> ResponseEnvelope {
        let requested = args.get("action").and_then(Value::as_str);
        if let Some(action) = requested {
            return self.registry.get(domain, action).map_or_else(
                || {
                    normalize(HandlerResult::failure(format!(
                        "unknown action \"{action}\" for tool \"{name}\". Valid actions: \
                         {valid}",
                        name = domain.as_str(),
                        valid = self.registry.actions(domain).join(", "),
                    )))
                },
                |schema| {
                    ResponseEnvelope::text(format!(
                        "Argument shape for {name}.{action}:\n{shape}",
                        name = domain.as_str(),
                        shape = pretty(&schema.render_shape()),
                    ))
                },
            );
        }
        let mut shapes = serde_json::Map::new();
        for action in self.registry.actions(domain) {
            if action.as_str() == "describe" {
                continue;
            }
            if let Some(schema) = self.registry.get(domain, action) {
                shapes.insert(action.clone(), schema.render_shape());
            }
        }
        ResponseEnvelope::text(format!(
            "Argument shapes for tool \"{name}\":\n{shapes}",
            name = domain.as_str(),
            shapes = pretty(&Value::Object(shapes)),
        ))
    }

    /// Builds the tool definition for one domain.
    fn tool_definition(&self, domain: Domain) -> ToolDefinition {
        let actions = self.registry.actions(domain);
        ToolDefinition {
            name: domain.as_str().to_string(),
            description: domain_description(domain).to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": actions,
                    },
                    "args": {
                        "type": "object",
                        "description":
                            "Action arguments; the describe action returns per-action shapes",
                    },
                },
                "required": ["action"],
            }),
        }
    }

    /// Authorizes one request, recording the decision.
    fn authorize(
        &self,
        context: &RequestContext,
        action: AuthAction<'_>,
    ) -> Result<(), ToolError> {
        match self.authz.authorize(context, action) {
            Ok(auth) => {
                self.auth_audit.record(&AuthAuditEvent::allowed(context, action, &auth));
                Ok(())
            }
            Err(error) => {
                self.auth_audit.record(&AuthAuditEvent::denied(context, action, &error));
                Err(error.into())
            }
        }
    }
}

// ============================================================================
// SECTION: Registry Construction
// ============================================================================

/// Schema used by every domain's built-in describe action.
pub(crate) fn describe_schema() -> ParamSchema {
    ParamSchema::new().optional(
        "action",
        ParamKind::String,
        "Describe a single action instead of all actions",
    )
}

/// Builds the full action registry across every domain.
fn build_registry() -> Result<SchemaRegistry, RouterBuildError> {
    let builder = SchemaRegistry::builder();
    let builder = handlers::project::register(builder);
    let builder = handlers::records::register(builder);
    let builder = handlers::schema::register(builder);
    let builder = handlers::uploads::register(builder);
    let builder = handlers::environments::register(builder);
    let builder = handlers::locales::register(builder);
    let builder = handlers::collaborators::register(builder);
    let builder = handlers::webhooks::register(builder);
    builder.build().map_err(|err| RouterBuildError::Registry(err.to_string()))
}

/// Verifies registry/enum completeness in both directions for every domain.
fn verify_registry(registry: &SchemaRegistry) -> Result<(), RouterBuildError> {
    for domain in Domain::ALL {
        let dispatchable = dispatchable_actions(domain);
        let registered = registry.actions(domain);
        if !registered.iter().any(|name| name.as_str() == "describe") {
            return Err(RouterBuildError::MissingSchema {
                domain: domain.as_str(),
                action: "describe".to_string(),
            });
        }
        for name in &dispatchable {
            if !registered.iter().any(|registered| registered.as_str() == *name) {
                return Err(RouterBuildError::MissingSchema {
                    domain: domain.as_str(),
                    action: (*name).to_string(),
                });
            }
        }
        for name in registered {
            if name.as_str() != "describe" && !dispatchable.contains(&name.as_str()) {
                return Err(RouterBuildError::MissingHandler {
                    domain: domain.as_str(),
                    action: name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Returns the dispatchable action names for a domain, in enum order.
fn dispatchable_actions(domain: Domain) -> Vec<&'static str> {
    match domain {
        Domain::Project => {
            handlers::project::Action::ALL.iter().map(|action| action.as_str()).collect()
        }
        Domain::Records => {
            handlers::records::Action::ALL.iter().map(|action| action.as_str()).collect()
        }
        Domain::Schema => {
            handlers::schema::Action::ALL.iter().map(|action| action.as_str()).collect()
        }
        Domain::Uploads => {
            handlers::uploads::Action::ALL.iter().map(|action| action.as_str()).collect()
        }
        Domain::Environments => {
            handlers::environments::Action::ALL.iter().map(|action| action.as_str()).collect()
        }
        Domain::Locales => {
            handlers::locales::Action::ALL.iter().map(|action| action.as_str()).collect()
        }
        Domain::Collaborators => {
            handlers::collaborators::Action::ALL.iter().map(|action| action.as_str()).collect()
        }
        Domain::Webhooks => {
            handlers::webhooks::Action::ALL.iter().map(|action| action.as_str()).collect()
        }
    }
}

/// Dispatches a validated call through the closed per-domain enums.
fn dispatch(
    domain: Domain,
    action: &str,
    args: &content_gate_core::validation::ValidatedArgs,
    client: &content_gate_client::PlatformClient,
) -> Result<HandlerResult, RouteError> {
    match domain {
        Domain::Project => {
            let action = parse_action(handlers::project::Action::parse(action), domain, action)?;
            handlers::project::dispatch(action, args, client)
        }
        Domain::Records => {
            let action = parse_action(handlers::records::Action::parse(action), domain, action)?;
            handlers::records::dispatch(action, args, client)
        }
        Domain::Schema => {
            let action = parse_action(handlers::schema::Action::parse(action), domain, action)?;
            handlers::schema::dispatch(action, args, client)
        }
        Domain::Uploads => {
            let action = parse_action(handlers::uploads::Action::parse(action), domain, action)?;
            handlers::uploads::dispatch(action, args, client)
        }
        Domain::Environments => {
            let action =
                parse_action(handlers::environments::Action::parse(action), domain, action)?;
            handlers::environments::dispatch(action, args, client)
        }
        Domain::Locales => {
            let action = parse_action(handlers::locales::Action::parse(action), domain, action)?;
            handlers::locales::dispatch(action, args, client)
        }
        Domain::Collaborators => {
            let action =
                parse_action(handlers::collaborators::Action::parse(action), domain, action)?;
            handlers::collaborators::dispatch(action, args, client)
        }
        Domain::Webhooks => {
            let action = parse_action(handlers::webhooks::Action::parse(action), domain, action)?;
            handlers::webhooks::dispatch(action, args, client)
        }
    }
}

/// Rejects the registered-but-undispatchable case, which construction-time
/// verification makes unreachable.
fn parse_action<A>(parsed: Option<A>, domain: Domain, action: &str) -> Result<A, RouteError> {
    parsed.ok_or_else(|| {
        RouteError::Internal(format!(
            "action \"{action}\" registered for \"{name}\" has no dispatch arm",
            name = domain.as_str(),
        ))
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the argument bag carries nothing to validate.
fn args_are_empty(args: &Value) -> bool {
    match args {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Pretty-prints a JSON value, falling back to compact rendering.
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Returns the tools/list description for a domain.
const fn domain_description(domain: Domain) -> &'static str {
    match domain {
        Domain::Project => "Read and update project-wide settings",
        Domain::Records => "Create, query, publish, and delete content records",
        Domain::Schema => "Manage content models and their fields",
        Domain::Uploads => "Inspect and manage media upload metadata",
        Domain::Environments => "Fork, promote, and delete sandbox environments",
        Domain::Locales => "Manage the project locale list",
        Domain::Collaborators => "Manage collaborators, invitations, and roles",
        Domain::Webhooks => "Manage delivery webhooks",
    }
}

// ============================================================================
// SECTION: Tool Definitions
// ============================================================================

/// Tool definition returned by tools/list.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Tool (domain) name.
    pub name: String,
    /// Human-readable tool description.
    pub description: String,
    /// JSON Schema for the tool arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Routing failures rendered inside the response envelope.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Action name not registered for the domain.
    #[error("unsupported action \"{action}\" for tool \"{domain}\"")]
    UnsupportedAction {
        /// Domain that was called.
        domain: &'static str,
        /// Requested action name.
        action: String,
        /// Registered action names, in display order.
        valid: Vec<String>,
    },
    /// Arguments were absent entirely; payload is the discovery guidance.
    #[error("missing parameters")]
    MissingParameters(String),
    /// Structural validation failed; payload is the rendered report.
    #[error("validation failed")]
    Validation(String),
    /// A business rule rejected the attributes before any platform call.
    #[error("business rule violation: {0}")]
    BusinessRule(String),
    /// The content platform rejected the call; payload is rewritten text.
    #[error("upstream rejection: {0}")]
    Upstream(String),
    /// Something failed inside the router itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RouteError {
    /// Classifies the failure for audit events.
    pub(crate) const fn outcome(&self) -> ToolOutcome {
        match self {
            Self::UnsupportedAction { .. } => ToolOutcome::UnsupportedAction,
            Self::MissingParameters(_) => ToolOutcome::MissingParameters,
            Self::Validation(_) => ToolOutcome::Validation,
            Self::BusinessRule(_) => ToolOutcome::BusinessRule,
            Self::Upstream(_) => ToolOutcome::Upstream,
            Self::Internal(_) => ToolOutcome::Internal,
        }
    }

    /// Renders the failure as a response envelope.
    pub(crate) fn into_envelope(self) -> ResponseEnvelope {
        match self {
            Self::UnsupportedAction {
                domain,
                action,
                valid,
            } => normalize(HandlerResult::failure(format!(
                "unsupported action \"{action}\" for tool \"{domain}\". Valid actions: {list}",
                list = valid.join(", "),
            ))),
            Self::MissingParameters(guidance) | Self::Validation(guidance) => {
                ResponseEnvelope::text(guidance)
            }
            Self::BusinessRule(message)
            | Self::Upstream(message)
            | Self::Internal(message) => normalize(HandlerResult::failure(message)),
        }
    }
}

/// Transport-boundary tool errors surfaced as JSON-RPC failures.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name not recognized.
    #[error("unknown tool")]
    UnknownTool,
    /// Missing or invalid authentication.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// Response serialization failed.
    #[error("serialization failure")]
    Serialization,
}

impl From<AuthError> for ToolError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Unauthenticated(message) => Self::Unauthenticated(message),
        }
    }
}

/// Router construction errors.
#[derive(Debug, Error)]
pub enum RouterBuildError {
    /// Registry construction failed.
    #[error("registry error: {0}")]
    Registry(String),
    /// A dispatchable action has no registered schema.
    #[error("no schema registered for {domain}.{action}")]
    MissingSchema {
        /// Domain name.
        domain: &'static str,
        /// Action name.
        action: String,
    },
    /// A registered action has no dispatch arm.
    #[error("no handler for registered action {domain}.{action}")]
    MissingHandler {
        /// Domain name.
        domain: &'static str,
        /// Action name.
        action: String,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
