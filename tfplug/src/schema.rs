//! Schema types and builders for tfplug
//!
//! A schema declares, per attribute, whether the user may set it, whether the
//! provider computes it, how it defaults, how it is validated, and whether a
//! change to it forces the resource to be replaced.

use crate::plan_modifier::{PlanModifier, RequiresReplace};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

/// AttributeType defines the primitive types an attribute may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    /// Always f64 on the wire
    Number,
    Bool,
}

impl AttributeType {
    pub fn accepts(&self, value: &Dynamic) -> bool {
        matches!(
            (self, value),
            (_, Dynamic::Null)
                | (_, Dynamic::Unknown)
                | (AttributeType::String, Dynamic::String(_))
                | (AttributeType::Number, Dynamic::Number(_))
                | (AttributeType::Bool, Dynamic::Bool(_))
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::Bool => "bool",
        }
    }
}

/// Schema is returned by providers and resources
/// Version is used for state migration
pub struct Schema {
    pub version: i64,
    pub description: String,
    pub attributes: Vec<Attribute>,
}

/// Attribute represents a single configuration attribute
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub validators: Vec<Box<dyn Validator>>,
    pub plan_modifiers: Vec<Box<dyn PlanModifier>>,
    pub default: Option<Box<dyn Default>>,
}

// Manual Debug implementation since validators/modifiers don't implement Debug
impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("validators", &self.validators.len())
            .field("plan_modifiers", &self.plan_modifiers.len())
            .field("default", &self.default.is_some())
            .finish()
    }
}

impl Attribute {
    pub fn path(&self) -> AttributePath {
        AttributePath::new(&self.name)
    }

    /// Computed attributes the user may not set themselves
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    pub fn requires_replace(&self) -> bool {
        self.plan_modifiers.iter().any(|m| m.requires_replace_on_change())
    }
}

/// Validator performs validation on attribute values during planning
pub trait Validator: Send + Sync {
    fn description(&self) -> String;
    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse;
}

pub struct ValidatorRequest<'a> {
    pub config_value: &'a Dynamic,
    pub path: AttributePath,
}

pub struct ValidatorResponse {
    pub diagnostics: Vec<Diagnostic>,
}

/// Default provides default values for optional attributes
/// Called when attribute is not set in configuration
pub trait Default: Send + Sync {
    fn description(&self) -> String;
    fn default_value(&self) -> Dynamic;
}

/// AttributeBuilder provides fluent API for building attributes
/// ALWAYS use this instead of constructing Attribute directly
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                validators: Vec::new(),
                plan_modifiers: Vec::new(),
                default: None,
            },
        }
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    /// Mark as sensitive (hidden)
    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    pub fn validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.attribute.validators.push(validator);
        self
    }

    pub fn plan_modifier(mut self, modifier: Box<dyn PlanModifier>) -> Self {
        self.attribute.plan_modifiers.push(modifier);
        self
    }

    /// Shorthand for the RequiresReplace plan modifier
    pub fn force_new(self) -> Self {
        self.plan_modifier(RequiresReplace::create())
    }

    pub fn default(mut self, default: Box<dyn Default>) -> Self {
        self.attribute.default = Some(default);
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// SchemaBuilder provides fluent API for building schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                description: String::new(),
                attributes: Vec::new(),
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.attributes.push(attr);
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.description = desc.to_string();
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl std::default::Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Checks a user configuration against the schema: required attributes are
    /// present, computed-only attributes are absent, values have the declared
    /// type, and every attribute validator passes.
    pub fn validate_config(&self, config: &DynamicValue) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if let Dynamic::Map(values) = &config.value {
            for name in values.keys() {
                if self.attribute(name).is_none() {
                    diagnostics.push(
                        Diagnostic::error(
                            "Unsupported argument",
                            format!("An argument named \"{}\" is not expected here", name),
                        )
                        .with_attribute(AttributePath::new(name)),
                    );
                }
            }
        }

        for attr in &self.attributes {
            let path = attr.path();
            let value = config.get(&path).unwrap_or(&Dynamic::Null);

            if attr.required && value.is_null() {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing required argument",
                        format!("The argument \"{}\" is required, but no definition was found", attr.name),
                    )
                    .with_attribute(path),
                );
                continue;
            }

            if attr.is_computed_only() && !value.is_null() {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid configuration",
                        format!("\"{}\" is computed by the provider and cannot be set", attr.name),
                    )
                    .with_attribute(path),
                );
                continue;
            }

            if !attr.r#type.accepts(value) {
                diagnostics.push(
                    Diagnostic::error(
                        "Incorrect attribute value type",
                        format!(
                            "\"{}\" must be a {}, got {}",
                            attr.name,
                            attr.r#type.name(),
                            value.type_name()
                        ),
                    )
                    .with_attribute(path),
                );
                continue;
            }

            if value.is_null() || value.is_unknown() {
                continue;
            }

            for validator in &attr.validators {
                let response = validator.validate(ValidatorRequest {
                    config_value: value,
                    path: path.clone(),
                });
                diagnostics.extend(response.diagnostics);
            }
        }

        diagnostics
    }

    /// Fills unset attributes that carry a default. Values the user supplied,
    /// including explicit empty strings, are left alone.
    pub fn apply_defaults(&self, config: &mut DynamicValue) -> crate::Result<()> {
        for attr in &self.attributes {
            let Some(default) = &attr.default else {
                continue;
            };
            let path = attr.path();
            if config.get(&path).map_or(true, Dynamic::is_null) {
                config.set_value(&path, default.default_value())?;
            }
        }
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::StaticDefault;
    use crate::validator::StringPatternValidator;

    fn test_schema() -> Schema {
        SchemaBuilder::new()
            .version(1)
            .description("Test resource schema")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("groups", AttributeType::Number)
                    .optional()
                    .default(StaticDefault::number(14.0))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("zone", AttributeType::String)
                    .optional()
                    .validator(StringPatternValidator::create(
                        regex::Regex::new(r"^az-\d+$").unwrap(),
                        "az-<n>",
                    ))
                    .build(),
            )
            .build()
    }

    #[test]
    fn attribute_builder_creates_required_string() {
        let attr = AttributeBuilder::new("name", AttributeType::String)
            .description("The name of the resource")
            .required()
            .force_new()
            .build();

        assert_eq!(attr.name, "name");
        assert_eq!(attr.r#type, AttributeType::String);
        assert!(attr.required);
        assert!(!attr.optional);
        assert!(attr.requires_replace());
        assert_eq!(attr.description, "The name of the resource");
    }

    #[test]
    fn schema_builder_creates_schema_with_attributes() {
        let schema = test_schema();

        assert_eq!(schema.version, 1);
        assert_eq!(schema.attributes.len(), 4);
        assert!(schema.attribute("id").unwrap().is_computed_only());
        assert!(!schema.attribute("groups").unwrap().is_computed_only());
    }

    #[test]
    fn validate_config_reports_missing_required() {
        let diags = test_schema().validate_config(&DynamicValue::object());

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].summary, "Missing required argument");
        assert_eq!(diags[0].attribute, Some(AttributePath::new("name")));
    }

    #[test]
    fn validate_config_rejects_computed_only_and_wrong_types() {
        let mut config = DynamicValue::object();
        config.set_string(&AttributePath::new("name"), "x").unwrap();
        config.set_string(&AttributePath::new("id"), "manual").unwrap();
        config.set_string(&AttributePath::new("groups"), "14").unwrap();

        let diags = test_schema().validate_config(&config);
        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert!(summaries.contains(&"Invalid configuration"));
        assert!(summaries.contains(&"Incorrect attribute value type"));
    }

    #[test]
    fn validate_config_runs_attribute_validators() {
        let mut config = DynamicValue::object();
        config.set_string(&AttributePath::new("name"), "x").unwrap();
        config.set_string(&AttributePath::new("zone"), "zone-2").unwrap();

        let diags = test_schema().validate_config(&config);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].summary.contains("az-<n>"));
    }

    #[test]
    fn validate_config_rejects_unknown_arguments() {
        let mut config = DynamicValue::object();
        config.set_string(&AttributePath::new("name"), "x").unwrap();
        config.set_string(&AttributePath::new("colour"), "red").unwrap();

        let diags = test_schema().validate_config(&config);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].summary, "Unsupported argument");
    }

    #[test]
    fn apply_defaults_fills_only_unset_attributes() {
        let schema = test_schema();

        let mut unset = DynamicValue::object();
        schema.apply_defaults(&mut unset).unwrap();
        assert_eq!(unset.get_int(&AttributePath::new("groups")).unwrap(), 14);

        let mut explicit = DynamicValue::object();
        explicit.set_int(&AttributePath::new("groups"), 5).unwrap();
        schema.apply_defaults(&mut explicit).unwrap();
        assert_eq!(explicit.get_int(&AttributePath::new("groups")).unwrap(), 5);
    }
}
