//! Built-in attribute validators

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{Diagnostic, Dynamic};

/// Rejects string values that do not match a regular expression
pub struct StringPatternValidator {
    pub pattern: regex::Regex,
    pub description: String,
}

impl StringPatternValidator {
    pub fn create(pattern: regex::Regex, description: &str) -> Box<dyn Validator> {
        Box::new(Self {
            pattern,
            description: description.to_string(),
        })
    }
}

impl Validator for StringPatternValidator {
    fn description(&self) -> String {
        format!("value must match {}", self.description)
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Vec::new();
        if let Dynamic::String(s) = request.config_value {
            if !self.pattern.is_match(s) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must be in the form {}", request.path, self.description),
                        format!("Value '{}' does not match pattern", s),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// Rejects string values from a deny list
pub struct StringNoneOfValidator {
    pub disallowed: Vec<String>,
}

impl StringNoneOfValidator {
    pub fn create(disallowed: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            disallowed: disallowed.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Validator for StringNoneOfValidator {
    fn description(&self) -> String {
        format!("value must not be one of {:?}", self.disallowed)
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Vec::new();
        if let Dynamic::String(s) = request.config_value {
            if self.disallowed.iter().any(|d| d == s) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} has a disallowed value", request.path),
                        format!("'{}' is not accepted", s),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributePath;

    fn run(validator: &dyn Validator, value: Dynamic) -> Vec<Diagnostic> {
        validator
            .validate(ValidatorRequest {
                config_value: &value,
                path: AttributePath::new("field"),
            })
            .diagnostics
    }

    #[test]
    fn string_pattern_validator_accepts_matching_pattern() {
        let validator = StringPatternValidator::create(
            regex::Regex::new(r"^az-\d+$").unwrap(),
            "'az-n'",
        );

        assert!(run(validator.as_ref(), Dynamic::String("az-2".to_string())).is_empty());
    }

    #[test]
    fn string_pattern_validator_rejects_non_matching() {
        let validator = StringPatternValidator::create(
            regex::Regex::new(r"^az-\d+$").unwrap(),
            "'az-n'",
        );

        let diags = run(validator.as_ref(), Dynamic::String("2".to_string()));
        assert_eq!(diags.len(), 1);
        assert!(diags[0].summary.contains("'az-n'"));
        assert_eq!(diags[0].attribute, Some(AttributePath::new("field")));
    }

    #[test]
    fn string_pattern_validator_ignores_other_types() {
        let validator =
            StringPatternValidator::create(regex::Regex::new(r"^a$").unwrap(), "a");

        assert!(run(validator.as_ref(), Dynamic::Number(1.0)).is_empty());
    }

    #[test]
    fn none_of_validator_rejects_listed_values() {
        let validator = StringNoneOfValidator::create(&["admin"]);

        assert_eq!(
            run(validator.as_ref(), Dynamic::String("admin".to_string())).len(),
            1
        );
        assert!(run(validator.as_ref(), Dynamic::String("operator".to_string())).is_empty());
    }
}
