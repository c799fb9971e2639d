// crates/content-gate-mcp/src/lib.rs
// ============================================================================
// Module: Content Gate MCP Crate Root
// Description: MCP server exposing content platform actions as tools.
// Purpose: Wire configuration, auth, routing, and transports together.
// Dependencies: axum, content-gate-client, content-gate-core, serde, tokio
// ============================================================================

//! ## Overview
//! This crate hosts the MCP-facing half of the gateway: one tool per content
//! domain, each taking an `{action, args}` bag routed through per-action
//! schemas and the closed dispatch enums, with configuration, auth, and
//! audit around it. The platform client and the shared core (schemas,
//! validation, envelope, business rules) live in their own crates.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod config;
pub mod handlers;
pub mod server;
pub mod tools;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use config::ContentGateConfig;
pub use server::McpServer;
pub use server::McpServerError;
pub use tools::RouteError;
pub use tools::ToolDefinition;
pub use tools::ToolError;
pub use tools::ToolRouter;
pub use tools::ToolRouterConfig;
