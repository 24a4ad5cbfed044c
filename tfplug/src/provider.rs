//! Provider trait
//!
//! A provider is configured once, then acts as the factory for its resources.
//! Resources receive whatever the provider built during configure (usually an
//! API client) through their constructors.

use crate::resource::Resource;
use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Prefix shared by every resource type name (e.g., "aviatrix")
    fn type_name(&self) -> &str;

    /// Schema of the provider block itself
    fn schema(&self) -> Schema;

    async fn configure(&mut self, request: ConfigureProviderRequest) -> ConfigureProviderResponse;

    /// Every resource type name `create_resource` accepts
    fn resource_types(&self) -> Vec<String>;

    /// Fails with `ProviderNotConfigured` before configure has succeeded and
    /// with `ResourceNotFound` for unknown names
    async fn create_resource(&self, type_name: &str) -> Result<Box<dyn Resource>>;
}

pub struct ConfigureProviderRequest {
    pub terraform_version: String,
    pub config: DynamicValue,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Vec<Diagnostic>,
}
