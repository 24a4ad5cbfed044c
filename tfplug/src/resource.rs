//! Resource trait and related types
//!
//! Resources implement create, read and delete. There is no update: every
//! user-settable attribute is ForceNew, so a changed configuration is planned
//! as a replacement (see [`crate::plan`]).

use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue};
use async_trait::async_trait;

/// Base trait for resources - implement CRUD operations
/// Type name should be constant and match the name the provider registers
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name should be constant (e.g., "aviatrix_firewall_instance")
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    /// Called during plan to validate configuration
    async fn validate(&self, request: ValidateResourceConfigRequest)
        -> ValidateResourceConfigResponse;

    /// Called to create a new resource
    /// MUST populate all attributes in response.new_state (including computed)
    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse;

    /// Called to refresh state, and after import
    /// MUST return None if the remote object no longer exists
    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse;

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse;
}

pub struct ValidateResourceConfigRequest {
    pub type_name: String,
    pub config: DynamicValue,
}

pub struct ValidateResourceConfigResponse {
    pub diagnostics: Vec<Diagnostic>,
}

pub struct CreateResourceRequest {
    pub type_name: String,
    pub planned_state: DynamicValue,
    pub config: DynamicValue,
}

pub struct CreateResourceResponse {
    /// Null when creation failed
    pub new_state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ReadResourceRequest {
    pub type_name: String,
    pub current_state: DynamicValue,
}

pub struct ReadResourceResponse {
    /// None means the remote object is gone and the state should be dropped
    pub new_state: Option<DynamicValue>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct DeleteResourceRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
}

pub struct DeleteResourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}

/// Optional interface for import functionality
#[async_trait]
pub trait ResourceWithImportState: Resource {
    /// Called during "terraform import"; the returned state is then passed
    /// to [`Resource::read`] to be filled in
    async fn import_state(&self, request: ImportResourceStateRequest)
        -> ImportResourceStateResponse;
}

pub struct ImportResourceStateRequest {
    pub type_name: String,
    pub id: String,
}

pub struct ImportResourceStateResponse {
    pub imported_resources: Vec<ImportedResource>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ImportedResource {
    pub type_name: String,
    pub state: DynamicValue,
}
