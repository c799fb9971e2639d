// crates/content-gate-client/src/lib.rs
// ============================================================================
// Module: Content Gate Client
// Description: Content platform client boundary and connection cache.
// Purpose: Isolate every outbound platform call behind sub-client traits.
// Dependencies: reqwest, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The client crate is the seam between action handlers and the remote
//! content platform. Handlers only see the sub-client traits in [`api`];
//! production wiring uses the blocking HTTP implementation in [`http`] and
//! the memoizing per-credential cache in [`cache`]. The platform itself is a
//! trusted black box: transport, retries, and data model are inherited from
//! its API unchanged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod cache;
pub mod error;
pub mod http;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::CollaboratorsApi;
pub use api::EnvironmentsApi;
pub use api::FieldsApi;
pub use api::ItemTypesApi;
pub use api::ItemsApi;
pub use api::PlatformClient;
pub use api::SiteApi;
pub use api::UploadsApi;
pub use api::WebhooksApi;
pub use cache::ClientCache;
pub use cache::ClientError;
pub use error::ApiError;
pub use http::PlatformHttpConfig;
