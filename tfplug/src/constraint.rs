//! Conditional attribute constraints
//!
//! Some optional attributes are only legal under a condition that a per-field
//! validator cannot see, typically a fact about the remote environment. A
//! resource declares those rules as a table and evaluates it against the
//! configuration plus a context value before dispatching any mutating call.

use crate::types::{AttributePath, Diagnostic, DynamicValue};

/// "attribute may only be set when `allowed(context)` holds"
pub struct ConditionalAttribute<C: ?Sized> {
    pub attribute: &'static str,
    pub allowed: fn(&C) -> bool,
    /// Completes the sentence "'<attribute>' attribute is ..."
    pub requirement: &'static str,
}

impl<C: ?Sized> ConditionalAttribute<C> {
    pub fn message(&self) -> String {
        format!("'{}' attribute is {}", self.attribute, self.requirement)
    }
}

/// Returns one error diagnostic per violated rule, in table order
pub fn check_conditional_attributes<C: ?Sized>(
    table: &[ConditionalAttribute<C>],
    config: &DynamicValue,
    context: &C,
) -> Vec<Diagnostic> {
    table
        .iter()
        .filter(|rule| config.is_set(&AttributePath::new(rule.attribute)))
        .filter(|rule| !(rule.allowed)(context))
        .map(|rule| {
            Diagnostic::error("Invalid attribute combination", rule.message())
                .with_attribute(AttributePath::new(rule.attribute))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(PartialEq)]
    enum Platform {
        Azure,
        Aws,
    }

    fn is_azure(platform: &Platform) -> bool {
        *platform == Platform::Azure
    }

    const RULES: &[ConditionalAttribute<Platform>] = &[ConditionalAttribute {
        attribute: "zone",
        allowed: is_azure,
        requirement: "only valid for AZURE",
    }];

    fn config_with_zone(zone: &str) -> DynamicValue {
        let mut config = DynamicValue::object();
        config.set_string(&AttributePath::new("zone"), zone).unwrap();
        config
    }

    #[test]
    fn set_attribute_under_wrong_condition_is_rejected() {
        let diags = check_conditional_attributes(RULES, &config_with_zone("az-1"), &Platform::Aws);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].detail, "'zone' attribute is only valid for AZURE");
        assert_eq!(diags[0].attribute, Some(AttributePath::new("zone")));
    }

    #[test]
    fn set_attribute_under_matching_condition_passes() {
        assert!(
            check_conditional_attributes(RULES, &config_with_zone("az-1"), &Platform::Azure)
                .is_empty()
        );
    }

    #[test]
    fn unset_or_empty_attribute_is_always_legal() {
        assert!(check_conditional_attributes(RULES, &config_with_zone(""), &Platform::Aws).is_empty());
        assert!(
            check_conditional_attributes(RULES, &DynamicValue::object(), &Platform::Aws).is_empty()
        );
    }
}
