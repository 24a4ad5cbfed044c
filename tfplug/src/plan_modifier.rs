use crate::types::{AttributePath, Diagnostic, Dynamic};

#[derive(Debug, Clone)]
pub struct PlanModifyRequest {
    pub state: Dynamic,
    pub plan: Dynamic,
    pub config: Dynamic,
    pub path: AttributePath,
}

#[derive(Debug, Clone)]
pub struct PlanModifyResponse {
    pub plan_value: Dynamic,
    pub requires_replace: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Trait for modifying the planned value of a single attribute
///
/// Plan modifiers run after defaults have been applied and can:
/// - Modify the planned value
/// - Mark an attribute as requiring replacement
/// - Add warnings or errors to the plan
pub trait PlanModifier: Send + Sync {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse;

    /// Lets schemas report ForceNew attributes without running a plan
    fn requires_replace_on_change(&self) -> bool {
        false
    }
}

/// Marks an attribute as requiring replacement when it changes (ForceNew)
pub struct RequiresReplace;

impl RequiresReplace {
    pub fn create() -> Box<dyn PlanModifier> {
        Box::new(Self)
    }
}

impl PlanModifier for RequiresReplace {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        // Unknowns are resolved at apply time
        let requires_replace = !matches!(
            (&request.state, &request.plan),
            (Dynamic::Unknown, _) | (_, Dynamic::Unknown)
        ) && !values_equal(&request.state, &request.plan);

        PlanModifyResponse {
            plan_value: request.plan,
            requires_replace,
            diagnostics: Vec::new(),
        }
    }

    fn requires_replace_on_change(&self) -> bool {
        true
    }
}

/// Uses the current state value when the planned value is unknown
///
/// Computed attributes such as remote-assigned IDs keep their value across
/// plans instead of showing as "known after apply".
pub struct UseStateForUnknown;

impl UseStateForUnknown {
    pub fn create() -> Box<dyn PlanModifier> {
        Box::new(Self)
    }
}

impl PlanModifier for UseStateForUnknown {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let plan_value = if request.plan.is_unknown() && !request.state.is_null() {
            request.state
        } else {
            request.plan
        };

        PlanModifyResponse {
            plan_value,
            requires_replace: false,
            diagnostics: Vec::new(),
        }
    }
}

/// An empty string and null both mean "unset" for optional string attributes
fn values_equal(a: &Dynamic, b: &Dynamic) -> bool {
    match (a, b) {
        (Dynamic::Null, Dynamic::String(s)) | (Dynamic::String(s), Dynamic::Null) => s.is_empty(),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(state: Dynamic, plan: Dynamic) -> PlanModifyRequest {
        PlanModifyRequest {
            state,
            config: plan.clone(),
            plan,
            path: AttributePath::new("attr"),
        }
    }

    #[test]
    fn requires_replace_when_value_changes() {
        let response = RequiresReplace.modify_plan(request(
            Dynamic::String("old".to_string()),
            Dynamic::String("new".to_string()),
        ));
        assert!(response.requires_replace);
    }

    #[test]
    fn no_replace_when_value_unchanged() {
        let response = RequiresReplace.modify_plan(request(
            Dynamic::Number(14.0),
            Dynamic::Number(14.0),
        ));
        assert!(!response.requires_replace);
    }

    #[test]
    fn setting_a_previously_unset_value_requires_replace() {
        let response =
            RequiresReplace.modify_plan(request(Dynamic::Null, Dynamic::String("x".to_string())));
        assert!(response.requires_replace);
    }

    #[test]
    fn removing_a_value_requires_replace() {
        let response =
            RequiresReplace.modify_plan(request(Dynamic::String("x".to_string()), Dynamic::Null));
        assert!(response.requires_replace);

        let response =
            RequiresReplace.modify_plan(request(Dynamic::String(String::new()), Dynamic::Null));
        assert!(!response.requires_replace);
    }

    #[test]
    fn use_state_for_unknown_keeps_prior_value() {
        let response = UseStateForUnknown.modify_plan(request(
            Dynamic::String("i-123".to_string()),
            Dynamic::Unknown,
        ));
        assert_eq!(response.plan_value, Dynamic::String("i-123".to_string()));

        let response = UseStateForUnknown.modify_plan(request(Dynamic::Null, Dynamic::Unknown));
        assert_eq!(response.plan_value, Dynamic::Unknown);
    }
}
