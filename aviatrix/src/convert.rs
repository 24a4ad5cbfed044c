//! Conversions for the controller's stringly-typed fields
//!
//! The controller sends and expects integers and booleans as text. Parsing
//! follows the controller's own rules: plain decimal integers with an optional
//! sign, and the boolean spellings `1 t T TRUE true True` / `0 f F FALSE false False`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not convert {field} to {target}: invalid value {value:?}")]
pub struct ConversionError {
    pub field: &'static str,
    pub target: &'static str,
    pub value: String,
}

pub fn parse_int(field: &'static str, value: &str) -> Result<i64, ConversionError> {
    value.parse::<i64>().map_err(|_| ConversionError {
        field,
        target: "int",
        value: value.to_string(),
    })
}

pub fn parse_bool(field: &'static str, value: &str) -> Result<bool, ConversionError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConversionError {
            field,
            target: "bool",
            value: value.to_string(),
        }),
    }
}

pub fn format_int(value: i64) -> String {
    value.to_string()
}

pub fn format_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// Presence check for optional remote fields: empty means unset
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_controller_integers() {
        assert_eq!(parse_int("phase1_dh_groups", "14"), Ok(14));
        assert_eq!(parse_int("device_bgp_asn", "-1"), Ok(-1));
        assert_eq!(parse_int("device_bgp_asn", "+65001"), Ok(65001));
    }

    #[test]
    fn rejects_malformed_integers_naming_the_field() {
        let err = parse_int("transit_gateway_bgp_asn", "abc").unwrap_err();
        assert_eq!(err.field, "transit_gateway_bgp_asn");
        assert_eq!(
            err.to_string(),
            "could not convert transit_gateway_bgp_asn to int: invalid value \"abc\""
        );
        assert!(parse_int("phase2_dh_groups", "").is_err());
        assert!(parse_int("phase2_dh_groups", " 14").is_err());
    }

    #[test]
    fn parses_every_accepted_boolean_spelling() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool("enable_global_accelerator", value), Ok(true));
        }
        for value in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool("enable_global_accelerator", value), Ok(false));
        }
        assert!(parse_bool("enable_global_accelerator", "yes").is_err());
        assert!(parse_bool("enable_global_accelerator", "tRUE").is_err());
    }

    #[test]
    fn formats_values_as_controller_text() {
        assert_eq!(format_int(65000), "65000");
        assert_eq!(format_bool(true), "true");
        assert_eq!(format_bool(false), "false");
    }

    #[test]
    fn empty_remote_values_are_unset() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("eni-1"), Some("eni-1".to_string()));
    }
}
