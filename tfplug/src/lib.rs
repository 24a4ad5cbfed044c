//! tfplug - declarative resource framework for Terraform-style providers
//!
//! Resources declare a [`Schema`], then implement create, read and delete
//! against state carried as [`DynamicValue`]s. The framework supplies defaults,
//! validators, ForceNew planning, conditional-attribute constraints, import
//! passthrough and logging setup.

// Core modules
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod provider;
pub mod resource;

// Helper modules
pub mod constraint;
pub mod defaults;
pub mod import;
pub mod logging;
pub mod plan;
pub mod plan_modifier;
pub mod validator;

// Re-exports for convenience
pub use error::{Result, TfplugError};
pub use import::import_state_passthrough_id;
pub use provider::{ConfigureProviderRequest, ConfigureProviderResponse, Provider};
pub use resource::{Resource, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{AttributePath, Diagnostic, Dynamic, DynamicValue, Sensitive};
