//! Import helpers for simplifying resource import implementations

use crate::resource::{ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource};
use crate::types::{AttributePath, Diagnostic, DynamicValue};

/// Sets the import ID to a specific attribute in state
///
/// Every other attribute is left unset; the resource's read is expected to
/// recognise the sparse state as an import and rebuild the rest.
///
/// Example: ID "conn1" -> state.id = "conn1"
pub fn import_state_passthrough_id(
    attr_path: AttributePath,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    if request.id.is_empty() {
        response.diagnostics.push(
            Diagnostic::error(
                "Missing import ID",
                "An import ID is required to import this resource",
            )
            .with_attribute(attr_path),
        );
        return;
    }

    let mut state = DynamicValue::object();
    if let Err(e) = state.set_string(&attr_path, request.id.clone()) {
        response.diagnostics.push(
            Diagnostic::error(
                format!("Failed to set import ID: {}", e),
                format!("Could not set attribute '{}' to value '{}'", attr_path, request.id),
            )
            .with_attribute(attr_path),
        );
        return;
    }

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str) -> ImportResourceStateRequest {
        ImportResourceStateRequest {
            type_name: "test_resource".to_string(),
            id: id.to_string(),
        }
    }

    fn empty_response() -> ImportResourceStateResponse {
        ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        }
    }

    #[test]
    fn passthrough_sets_only_the_id_attribute() {
        let mut response = empty_response();
        import_state_passthrough_id(AttributePath::new("id"), &request("conn1"), &mut response);

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.imported_resources.len(), 1);
        let imported = &response.imported_resources[0];
        assert_eq!(imported.type_name, "test_resource");
        assert_eq!(imported.state.get_string(&AttributePath::new("id")).unwrap(), "conn1");
        assert!(!imported.state.is_set(&AttributePath::new("connection_name")));
    }

    #[test]
    fn passthrough_rejects_empty_id() {
        let mut response = empty_response();
        import_state_passthrough_id(AttributePath::new("id"), &request(""), &mut response);

        assert!(response.imported_resources.is_empty());
        assert_eq!(response.diagnostics[0].summary, "Missing import ID");
    }
}
