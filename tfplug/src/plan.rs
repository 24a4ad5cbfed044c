//! Resource change planning
//!
//! Computes the planned state for a configuration against the prior state and
//! reports which attribute changes force the resource to be replaced. Resources
//! without an update path rely on this: any ForceNew difference becomes a
//! destroy-and-recreate.

use crate::error::Result;
use crate::plan_modifier::PlanModifyRequest;
use crate::schema::Schema;
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PlannedChange {
    pub fn requires_replace(&self) -> bool {
        !self.requires_replace.is_empty()
    }
}

/// Plans a change from `prior_state` (null on create) to `config`
///
/// Defaults are applied first. Unset computed attributes become unknown, then
/// every attribute's plan modifiers run in schema order.
pub fn plan_resource_change(
    schema: &Schema,
    prior_state: &DynamicValue,
    config: &DynamicValue,
) -> Result<PlannedChange> {
    let mut planned_state = config.clone();
    if planned_state.is_null() {
        planned_state = DynamicValue::object();
    }
    schema.apply_defaults(&mut planned_state)?;

    let creating = prior_state.is_null();
    let mut requires_replace = Vec::new();
    let mut diagnostics = Vec::new();

    for attr in &schema.attributes {
        let path = attr.path();
        let config_value = config.get(&path).cloned().unwrap_or(Dynamic::Null);
        let mut plan_value = planned_state.get(&path).cloned().unwrap_or(Dynamic::Null);

        if attr.computed && plan_value.is_null() {
            plan_value = Dynamic::Unknown;
        }

        let state_value = prior_state.get(&path).cloned().unwrap_or(Dynamic::Null);

        for modifier in &attr.plan_modifiers {
            let response = modifier.modify_plan(PlanModifyRequest {
                state: state_value.clone(),
                plan: plan_value,
                config: config_value.clone(),
                path: path.clone(),
            });
            plan_value = response.plan_value;
            diagnostics.extend(response.diagnostics);

            if response.requires_replace && !creating && !requires_replace.contains(&path) {
                tracing::debug!(attribute = %path, "change requires replacement");
                requires_replace.push(path.clone());
            }
        }

        planned_state.set_value(&path, plan_value)?;
    }

    Ok(PlannedChange {
        planned_state,
        requires_replace,
        diagnostics,
    })
}
