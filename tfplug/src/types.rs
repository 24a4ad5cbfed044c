//! Core type system for tfplug
//!
//! Configuration, plan and state all travel as [`DynamicValue`] objects. Resource
//! implementations read them through the typed accessors below and usually
//! convert them into their own model structs at the boundary.

use crate::error::{Result, TfplugError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Dynamic represents Terraform values that can be of any type
/// IMPORTANT: Always use type-safe accessors instead of matching directly
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
    /// Explicit null value
    Null,
    Bool(bool),
    /// All numbers are f64 to match Terraform
    Number(f64),
    String(String),
    /// Objects are represented as maps
    Map(HashMap<String, Dynamic>),
    /// Value not yet known (during planning)
    Unknown,
}

impl Dynamic {
    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Dynamic::Unknown)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::Bool(_) => "bool",
            Dynamic::Number(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::Map(_) => "map",
            Dynamic::Unknown => "unknown",
        }
    }
}

impl Serialize for Dynamic {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Dynamic::Null => serializer.serialize_unit(),
            Dynamic::Bool(b) => serializer.serialize_bool(*b),
            Dynamic::Number(n) => serializer.serialize_f64(*n),
            Dynamic::String(s) => serializer.serialize_str(s),
            Dynamic::Map(m) => m.serialize(serializer),
            Dynamic::Unknown => serializer.serialize_str(UNKNOWN_MARKER),
        }
    }
}

const UNKNOWN_MARKER: &str = "__unknown__";

impl<'de> Deserialize<'de> for Dynamic {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct DynamicVisitor;

        impl<'de> Visitor<'de> for DynamicVisitor {
            type Value = Dynamic;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a null, bool, number, string or object value")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Null)
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Null)
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Bool(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Number(value as f64))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Number(value as f64))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Dynamic, E> {
                Ok(Dynamic::Number(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Dynamic, E> {
                if value == UNKNOWN_MARKER {
                    Ok(Dynamic::Unknown)
                } else {
                    Ok(Dynamic::String(value.to_string()))
                }
            }

            fn visit_map<V>(self, mut map: V) -> std::result::Result<Dynamic, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut values = HashMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Dynamic::Map(values))
            }
        }

        deserializer.deserialize_any(DynamicVisitor)
    }
}

/// DynamicValue wraps Dynamic and provides encoding/decoding plus typed access
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicValue {
    pub value: Dynamic,
}

impl DynamicValue {
    pub fn new(value: Dynamic) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self {
            value: Dynamic::Null,
        }
    }

    /// An empty object, the usual starting point for building state
    pub fn object() -> Self {
        Self {
            value: Dynamic::Map(HashMap::new()),
        }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Terraform uses msgpack by default
    pub fn encode_msgpack(&self) -> Result<Vec<u8>> {
        if self.is_null() {
            return Ok(vec![]);
        }
        rmp_serde::encode::to_vec(&self.value)
            .map_err(|e| TfplugError::EncodingError(format!("msgpack encoding failed: {}", e)))
    }

    pub fn decode_msgpack(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::null());
        }
        let value = rmp_serde::decode::from_slice::<Dynamic>(data)
            .map_err(|e| TfplugError::DecodingError(format!("msgpack decoding failed: {}", e)))?;
        Ok(Self { value })
    }

    pub fn encode_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.value)
            .map_err(|e| TfplugError::EncodingError(format!("json encoding failed: {}", e)))
    }

    pub fn decode_json(data: &[u8]) -> Result<Self> {
        let value = serde_json::from_slice(data)
            .map_err(|e| TfplugError::DecodingError(format!("json decoding failed: {}", e)))?;
        Ok(Self { value })
    }

    /// Raw lookup; `None` when any step of the path is missing
    pub fn get(&self, path: &AttributePath) -> Option<&Dynamic> {
        let mut current = &self.value;
        for step in &path.steps {
            current = match (current, step) {
                (Dynamic::Map(m), AttributePathStep::AttributeName(name)) => m.get(name)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Presence check: the attribute exists, is known, and is not null or an
    /// empty string
    pub fn is_set(&self, path: &AttributePath) -> bool {
        match self.get(path) {
            None | Some(Dynamic::Null) | Some(Dynamic::Unknown) => false,
            Some(Dynamic::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Type-safe accessors - ALWAYS use these instead of pattern matching
    pub fn get_string(&self, path: &AttributePath) -> Result<String> {
        match self.require(path)? {
            Dynamic::String(s) => Ok(s.clone()),
            other => Err(mismatch(path, "string", other)),
        }
    }

    pub fn get_number(&self, path: &AttributePath) -> Result<f64> {
        match self.require(path)? {
            Dynamic::Number(n) => Ok(*n),
            other => Err(mismatch(path, "number", other)),
        }
    }

    /// Numbers are f64 on the wire; integer attributes must hold whole values
    pub fn get_int(&self, path: &AttributePath) -> Result<i64> {
        let n = self.get_number(path)?;
        if n.fract() != 0.0 || !n.is_finite() || n.abs() > i64::MAX as f64 {
            return Err(TfplugError::TypeMismatch {
                path: path.to_string(),
                expected: "integer".to_string(),
                actual: n.to_string(),
            });
        }
        Ok(n as i64)
    }

    pub fn get_bool(&self, path: &AttributePath) -> Result<bool> {
        match self.require(path)? {
            Dynamic::Bool(b) => Ok(*b),
            other => Err(mismatch(path, "bool", other)),
        }
    }

    /// Missing, null, unknown and empty strings all read as `None`
    pub fn get_optional_string(&self, path: &AttributePath) -> Result<Option<String>> {
        match self.get(path) {
            None | Some(Dynamic::Null) | Some(Dynamic::Unknown) => Ok(None),
            Some(Dynamic::String(s)) if s.is_empty() => Ok(None),
            Some(Dynamic::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(mismatch(path, "string", other)),
        }
    }

    pub fn get_optional_bool(&self, path: &AttributePath) -> Result<Option<bool>> {
        match self.get(path) {
            None | Some(Dynamic::Null) | Some(Dynamic::Unknown) => Ok(None),
            Some(_) => self.get_bool(path).map(Some),
        }
    }

    /// Type-safe setters - Use for building state/config objects
    pub fn set_string(&mut self, path: &AttributePath, value: impl Into<String>) -> Result<()> {
        self.set_value(path, Dynamic::String(value.into()))
    }

    pub fn set_number(&mut self, path: &AttributePath, value: f64) -> Result<()> {
        self.set_value(path, Dynamic::Number(value))
    }

    pub fn set_int(&mut self, path: &AttributePath, value: i64) -> Result<()> {
        self.set_value(path, Dynamic::Number(value as f64))
    }

    pub fn set_bool(&mut self, path: &AttributePath, value: bool) -> Result<()> {
        self.set_value(path, Dynamic::Bool(value))
    }

    /// `None` is stored as an explicit null so the attribute stays in state
    pub fn set_optional_string(&mut self, path: &AttributePath, value: Option<String>) -> Result<()> {
        match value {
            Some(s) => self.set_value(path, Dynamic::String(s)),
            None => self.set_value(path, Dynamic::Null),
        }
    }

    pub fn set_null(&mut self, path: &AttributePath) -> Result<()> {
        self.set_value(path, Dynamic::Null)
    }

    pub fn set_value(&mut self, path: &AttributePath, new_value: Dynamic) -> Result<()> {
        let Some((last, parents)) = path.steps.split_last() else {
            self.value = new_value;
            return Ok(());
        };

        if !matches!(self.value, Dynamic::Map(_)) {
            self.value = Dynamic::Map(HashMap::new());
        }

        let mut current = &mut self.value;
        for step in parents {
            current = match current {
                Dynamic::Map(m) => m
                    .entry(step.key().to_string())
                    .or_insert_with(|| Dynamic::Map(HashMap::new())),
                other => {
                    return Err(TfplugError::InvalidState(format!(
                        "cannot descend into {} at {}",
                        other.type_name(),
                        path
                    )))
                }
            };
        }

        match current {
            Dynamic::Map(m) => {
                m.insert(last.key().to_string(), new_value);
                Ok(())
            }
            other => Err(TfplugError::InvalidState(format!(
                "cannot set attribute on {} at {}",
                other.type_name(),
                path
            ))),
        }
    }

    fn require(&self, path: &AttributePath) -> Result<&Dynamic> {
        self.get(path)
            .ok_or_else(|| TfplugError::AttributeNotFound(path.to_string()))
    }
}

fn mismatch(path: &AttributePath, expected: &str, actual: &Dynamic) -> TfplugError {
    TfplugError::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

/// AttributePath represents a path to an attribute within a DynamicValue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    pub steps: Vec<AttributePathStep>,
}

impl AttributePath {
    pub fn new(name: &str) -> Self {
        Self {
            steps: vec![AttributePathStep::AttributeName(name.to_string())],
        }
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.steps
            .push(AttributePathStep::AttributeName(name.to_string()));
        self
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, step) in self.steps.iter().enumerate() {
            match step {
                AttributePathStep::AttributeName(name) if idx == 0 => write!(f, "{}", name)?,
                AttributePathStep::AttributeName(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

/// Individual step in an AttributePath
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributePathStep {
    /// Access attribute by name in an object
    AttributeName(String),
}

impl AttributePathStep {
    fn key(&self) -> &str {
        match self {
            AttributePathStep::AttributeName(name) => name,
        }
    }
}

/// Diagnostic represents a warning or error from the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    pub detail: String,
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, path: AttributePath) -> Self {
        self.attribute = Some(path);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// True when any diagnostic in the slice is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Secret string that never shows up in Debug output or logs
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sensitive(String);

impl Sensitive {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Sensitive {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Sensitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(sensitive value)")
    }
}
