// crates/content-gate-client/src/api.rs
// ============================================================================
// Module: Platform Sub-Client Traits
// Description: Trait seams for every content platform resource family.
// Purpose: Let handlers call the platform without knowing the transport.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Each resource family gets one trait with create/update/delete-style
//! methods over plain JSON attribute objects. [`PlatformClient`] bundles one
//! handle per family; production wiring points every handle at the same HTTP
//! transport while tests substitute in-memory fakes per family.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use crate::error::ApiError;

// ============================================================================
// SECTION: Sub-Client Traits
// ============================================================================

/// Project-wide site settings.
pub trait SiteApi: Send + Sync {
    /// Fetches the site settings resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn find(&self) -> Result<Value, ApiError>;

    /// Updates the site settings resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn update(&self, attrs: &Value) -> Result<Value, ApiError>;
}

/// Content records.
pub trait ItemsApi: Send + Sync {
    /// Lists records matching a query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn list(&self, query: &Map<String, Value>) -> Result<Value, ApiError>;

    /// Fetches one record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn find(&self, item_id: &str) -> Result<Value, ApiError>;

    /// Creates a record from plain attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn create(&self, attrs: &Value) -> Result<Value, ApiError>;

    /// Updates a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn update(&self, item_id: &str, attrs: &Value) -> Result<Value, ApiError>;

    /// Duplicates a record, returning the new resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn duplicate(&self, item_id: &str) -> Result<Value, ApiError>;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn destroy(&self, item_id: &str) -> Result<Value, ApiError>;

    /// Publishes a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn publish(&self, item_id: &str) -> Result<Value, ApiError>;

    /// Unpublishes a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn unpublish(&self, item_id: &str) -> Result<Value, ApiError>;
}

/// Content models.
pub trait ItemTypesApi: Send + Sync {
    /// Lists all models.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn list(&self) -> Result<Value, ApiError>;

    /// Fetches one model.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn find(&self, item_type_id: &str) -> Result<Value, ApiError>;

    /// Creates a model.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn create(&self, attrs: &Value) -> Result<Value, ApiError>;

    /// Updates a model.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn update(&self, item_type_id: &str, attrs: &Value) -> Result<Value, ApiError>;

    /// Deletes a model.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn destroy(&self, item_type_id: &str) -> Result<Value, ApiError>;
}

/// Schema fields of a model.
pub trait FieldsApi: Send + Sync {
    /// Lists the fields of a model.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn list(&self, item_type_id: &str) -> Result<Value, ApiError>;

    /// Fetches one field.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn find(&self, field_id: &str) -> Result<Value, ApiError>;

    /// Creates a field on a model.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn create(&self, item_type_id: &str, attrs: &Value) -> Result<Value, ApiError>;

    /// Updates a field.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn update(&self, field_id: &str, attrs: &Value) -> Result<Value, ApiError>;

    /// Deletes a field.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn destroy(&self, field_id: &str) -> Result<Value, ApiError>;
}

/// Media uploads.
pub trait UploadsApi: Send + Sync {
    /// Lists uploads matching a query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn list(&self, query: &Map<String, Value>) -> Result<Value, ApiError>;

    /// Fetches one upload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn find(&self, upload_id: &str) -> Result<Value, ApiError>;

    /// Updates upload metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn update(&self, upload_id: &str, attrs: &Value) -> Result<Value, ApiError>;

    /// Deletes an upload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn destroy(&self, upload_id: &str) -> Result<Value, ApiError>;
}

/// Sandbox and primary environments.
pub trait EnvironmentsApi: Send + Sync {
    /// Lists all environments.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn list(&self) -> Result<Value, ApiError>;

    /// Forks an environment into a new sandbox.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn fork(&self, source_id: &str, attrs: &Value) -> Result<Value, ApiError>;

    /// Promotes a sandbox to primary.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn promote(&self, environment_id: &str) -> Result<Value, ApiError>;

    /// Deletes a sandbox environment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn destroy(&self, environment_id: &str) -> Result<Value, ApiError>;
}

/// Collaborators, invitations, and roles.
pub trait CollaboratorsApi: Send + Sync {
    /// Lists project collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn list(&self) -> Result<Value, ApiError>;

    /// Invites a collaborator by email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn invite(&self, attrs: &Value) -> Result<Value, ApiError>;

    /// Removes a collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn destroy(&self, collaborator_id: &str) -> Result<Value, ApiError>;

    /// Lists the available roles.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn roles(&self) -> Result<Value, ApiError>;
}

/// Delivery webhooks.
pub trait WebhooksApi: Send + Sync {
    /// Lists all webhooks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn list(&self) -> Result<Value, ApiError>;

    /// Fetches one webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn find(&self, webhook_id: &str) -> Result<Value, ApiError>;

    /// Creates a webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn create(&self, attrs: &Value) -> Result<Value, ApiError>;

    /// Updates a webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn update(&self, webhook_id: &str, attrs: &Value) -> Result<Value, ApiError>;

    /// Deletes a webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform rejects the call.
    fn destroy(&self, webhook_id: &str) -> Result<Value, ApiError>;
}

// ============================================================================
// SECTION: Client Bundle
// ============================================================================

/// One handle per platform resource family.
///
/// # Invariants
/// - Handles are read-only after construction; all mutability lives behind
///   the trait implementations.
#[derive(Clone)]
pub struct PlatformClient {
    /// Site settings sub-client.
    pub site: Arc<dyn SiteApi>,
    /// Records sub-client.
    pub items: Arc<dyn ItemsApi>,
    /// Models sub-client.
    pub item_types: Arc<dyn ItemTypesApi>,
    /// Schema fields sub-client.
    pub fields: Arc<dyn FieldsApi>,
    /// Uploads sub-client.
    pub uploads: Arc<dyn UploadsApi>,
    /// Environments sub-client.
    pub environments: Arc<dyn EnvironmentsApi>,
    /// Collaborators sub-client.
    pub collaborators: Arc<dyn CollaboratorsApi>,
    /// Webhooks sub-client.
    pub webhooks: Arc<dyn WebhooksApi>,
}
