//! Resources managed through the controller
//!
//! Each resource owns a typed model with `from_state`/`to_state`, a schema,
//! and async create/read/delete functions over a [`ControllerApi`] handle.
//! The [`tfplug::Resource`] impls are thin wrappers that turn
//! [`ResourceError`]s into diagnostics.
//!
//! [`ControllerApi`]: crate::api::ControllerApi

pub mod device_transit_gateway_attachment;
pub mod firewall_instance;

use crate::api::ApiError;
use crate::convert::ConversionError;
use tfplug::resource::CreateResourceRequest;
use tfplug::types::has_errors;
use tfplug::{Diagnostic, DynamicValue, Schema, TfplugError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    /// A constraint was violated before any mutating call was made
    #[error("{}", describe(.0))]
    Validation(Vec<Diagnostic>),

    #[error("failed to {operation} {resource} '{id}': {source}")]
    RemoteOperation {
        operation: &'static str,
        resource: &'static str,
        id: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("invalid resource state: {0}")]
    State(#[from] TfplugError),
}

fn describe(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.detail.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ResourceError {
    pub fn remote(
        operation: &'static str,
        resource: &'static str,
        id: impl Into<String>,
        source: ApiError,
    ) -> Self {
        ResourceError::RemoteOperation {
            operation,
            resource,
            id: id.into(),
            source,
        }
    }

    /// Diagnostics to report for this error under `summary`
    pub fn into_diagnostics(self, summary: &str) -> Vec<Diagnostic> {
        match self {
            ResourceError::Validation(diagnostics) => diagnostics,
            other => vec![Diagnostic::error(summary, other.to_string())],
        }
    }
}

/// The desired state a create works from: planned values (falling back to the
/// raw config) with schema defaults filled in. The user config must validate.
pub(crate) fn desired_state(
    schema: &Schema,
    request: &CreateResourceRequest,
) -> Result<DynamicValue, Vec<Diagnostic>> {
    let diagnostics = schema.validate_config(&request.config);
    if has_errors(&diagnostics) {
        return Err(diagnostics);
    }

    let mut desired = if request.planned_state.is_null() {
        request.config.clone()
    } else {
        request.planned_state.clone()
    };
    schema
        .apply_defaults(&mut desired)
        .map_err(|e| vec![Diagnostic::error("Failed to apply defaults", e.to_string())])?;
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_name_operation_and_record() {
        let err = ResourceError::remote(
            "delete",
            "device transit gateway attachment",
            "conn1",
            ApiError::rejected("delete_device_attachment", "busy"),
        );
        assert_eq!(
            err.to_string(),
            "failed to delete device transit gateway attachment 'conn1': controller rejected delete_device_attachment: busy"
        );
    }

    #[test]
    fn validation_errors_keep_their_diagnostics() {
        let diagnostic = Diagnostic::error("Invalid attribute combination", "'zone' attribute is only valid for AZURE");
        let err = ResourceError::Validation(vec![diagnostic.clone()]);
        assert_eq!(err.to_string(), "'zone' attribute is only valid for AZURE");

        let diagnostics = err.into_diagnostics("Failed to create firewall instance");
        assert_eq!(diagnostics, vec![diagnostic]);
    }

    #[test]
    fn other_errors_become_a_single_diagnostic() {
        let err = ResourceError::from(ConversionError {
            field: "phase1_dh_groups",
            target: "int",
            value: "abc".to_string(),
        });
        let diagnostics = err.into_diagnostics("Failed to read attachment");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Failed to read attachment");
        assert!(diagnostics[0].detail.contains("phase1_dh_groups"));
    }
}
