//! Default value providers for attributes
//!
//! Defaults are evaluated when an attribute is absent or null in the
//! configuration. They are applied by the provider before anything reaches the
//! remote API, so the remote never decides what an unset field means.
//!
//! ```no_run
//! use tfplug::schema::{AttributeBuilder, AttributeType};
//! use tfplug::defaults::StaticDefault;
//!
//! let dh_groups = AttributeBuilder::new("phase1_dh_groups", AttributeType::Number)
//!     .optional()
//!     .default(StaticDefault::number(14.0))
//!     .build();
//! ```

use crate::schema::Default;
use crate::types::Dynamic;

/// StaticDefault provides a static default value
pub struct StaticDefault {
    value: Dynamic,
}

impl StaticDefault {
    pub fn create(value: Dynamic) -> Box<dyn Default> {
        Box::new(Self { value })
    }

    pub fn string(value: &str) -> Box<dyn Default> {
        Self::create(Dynamic::String(value.to_string()))
    }

    pub fn number(value: f64) -> Box<dyn Default> {
        Self::create(Dynamic::Number(value))
    }

    pub fn bool(value: bool) -> Box<dyn Default> {
        Self::create(Dynamic::Bool(value))
    }
}

impl Default for StaticDefault {
    fn description(&self) -> String {
        format!("static default value: {:?}", self.value)
    }

    fn default_value(&self) -> Dynamic {
        self.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_defaults_return_their_value() {
        assert_eq!(
            StaticDefault::string("SHA-256").default_value(),
            Dynamic::String("SHA-256".to_string())
        );
        assert_eq!(StaticDefault::number(14.0).default_value(), Dynamic::Number(14.0));
        assert_eq!(StaticDefault::bool(false).default_value(), Dynamic::Bool(false));
    }

    #[test]
    fn description_mentions_value() {
        let default = StaticDefault::string("AES-256-CBC");
        assert!(default.description().contains("AES-256-CBC"));
    }
}
