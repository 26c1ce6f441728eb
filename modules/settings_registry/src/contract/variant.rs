//! Dynamic value exchanged with persistent stores
//!
//! `Variant` is the kind-erased representation used at the persistence boundary.
//! Colors and quantities travel as strings (`#RRGGBB[AA]`, `<number><unit>`).
//! Coercions return `None` when the stored value cannot represent the requested type,
//! so a malformed entry never silently becomes a zero or an empty string.
//! Non-finite doubles are serialized as `"NaN"`, `"inf"` or `"-inf"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(#[serde(with = "json_double")] f64),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    String(String),
    StringList(Vec<String>),
    DateTime(DateTime<Utc>),
}

impl Variant {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the stored representation, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::StringList(_) => "string list",
            Self::DateTime(_) => "date-time",
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(value) => Some(*value != 0),
            Self::Double(value) => Some(*value != 0.0),
            Self::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn to_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Bool(value) => Some(i64::from(*value)),
            Self::Double(value) => {
                let in_range = *value >= i64::MIN as f64 && *value < i64::MAX as f64;
                (value.is_finite() && value.fract() == 0.0 && in_range).then_some(*value as i64)
            }
            Self::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn to_double(&self) -> Option<f64> {
        match self {
            Self::Double(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            Self::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            Self::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Some(bytes.clone()),
            Self::String(text) => Some(text.as_bytes().to_vec()),
            _ => None,
        }
    }

    /// Textual form of scalar values
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(text) => Some(text.clone()),
            Self::Bool(value) => Some(value.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::Double(value) => Some(value.to_string()),
            Self::Bytes(bytes) => String::from_utf8(bytes.clone()).ok(),
            Self::DateTime(value) => Some(value.to_rfc3339()),
            Self::Null | Self::StringList(_) => None,
        }
    }

    /// A plain string is read as a single-element list
    pub fn to_string_list(&self) -> Option<Vec<String>> {
        match self {
            Self::StringList(list) => Some(list.clone()),
            Self::String(text) => Some(vec![text.clone()]),
            _ => None,
        }
    }

    /// Strings are parsed as RFC 3339
    pub fn to_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(value) => Some(*value),
            Self::String(text) => DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(|value| value.with_timezone(&Utc)),
            _ => None,
        }
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<Vec<u8>> for Variant {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<String>> for Variant {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl From<DateTime<Utc>> for Variant {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

mod json_double {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid double '{text}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_bool_coercion() {
        assert_eq!(Variant::Bool(true).to_bool(), Some(true));
        assert_eq!(Variant::Int(0).to_bool(), Some(false));
        assert_eq!(Variant::from("TRUE").to_bool(), Some(true));
        assert_eq!(Variant::from("off").to_bool(), Some(false));
        assert_eq!(Variant::from("maybe").to_bool(), None);
        assert_eq!(Variant::Null.to_bool(), None);
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(Variant::Int(42).to_int(), Some(42));
        assert_eq!(Variant::from(" -7 ").to_int(), Some(-7));
        assert_eq!(Variant::Double(3.0).to_int(), Some(3));
        assert_eq!(Variant::Double(3.5).to_int(), None);
        assert_eq!(Variant::Double(f64::NAN).to_int(), None);
        assert_eq!(Variant::from("abc").to_int(), None);
        assert_eq!(Variant::StringList(vec![]).to_int(), None);
    }

    #[test]
    fn test_double_coercion() {
        assert_eq!(Variant::Double(0.25).to_double(), Some(0.25));
        assert_eq!(Variant::Int(4).to_double(), Some(4.0));
        assert_eq!(Variant::from("1.5e3").to_double(), Some(1500.0));
        assert_eq!(Variant::from("1.5mm").to_double(), None);
    }

    #[test]
    fn test_text_and_list_coercion() {
        assert_eq!(Variant::Int(12).to_text().as_deref(), Some("12"));
        assert_eq!(Variant::Bytes(b"abc".to_vec()).to_text().as_deref(), Some("abc"));
        assert_eq!(Variant::Null.to_text(), None);

        assert_eq!(
            Variant::from("single").to_string_list(),
            Some(vec!["single".to_string()])
        );
        assert_eq!(Variant::Int(1).to_string_list(), None);
    }

    #[test]
    fn test_date_time_coercion() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 14, 15, 9, 26).single();
        assert_eq!(
            Variant::from("2021-03-14T15:09:26Z").to_date_time(),
            expected
        );
        assert_eq!(
            Variant::from("2021-03-14T17:09:26+02:00").to_date_time(),
            expected
        );
        assert_eq!(Variant::from("yesterday").to_date_time(), None);
    }

    #[test]
    fn test_serde_representation() {
        let value = serde_json::to_value(Variant::Int(5)).unwrap();
        assert_eq!(value, json!({"type": "int", "value": 5}));

        let value = serde_json::to_value(Variant::Bytes(vec![0, 1, 2, 255])).unwrap();
        assert_eq!(value, json!({"type": "bytes", "value": "AAEC/w=="}));

        let value = serde_json::to_value(Variant::Null).unwrap();
        assert_eq!(value, json!({"type": "null"}));
    }

    #[test]
    fn test_serde_parses_bytes_and_lists() {
        let parsed: Variant =
            serde_json::from_value(json!({"type": "bytes", "value": "AAEC/w=="})).unwrap();
        assert_eq!(parsed, Variant::Bytes(vec![0, 1, 2, 255]));

        let parsed: Variant =
            serde_json::from_value(json!({"type": "string_list", "value": ["a", "b"]})).unwrap();
        assert_eq!(parsed, Variant::StringList(vec!["a".to_string(), "b".to_string()]));

        let invalid = serde_json::from_value::<Variant>(json!({"type": "bytes", "value": "%%"}));
        assert!(invalid.is_err());
    }

    #[test]
    fn test_serde_non_finite_doubles() {
        let value = serde_json::to_value(Variant::Double(f64::INFINITY)).unwrap();
        assert_eq!(value, json!({"type": "double", "value": "inf"}));
        let value = serde_json::to_value(Variant::Double(f64::NEG_INFINITY)).unwrap();
        assert_eq!(value, json!({"type": "double", "value": "-inf"}));

        let text = serde_json::to_string(&Variant::Double(f64::NAN)).unwrap();
        let parsed: Variant = serde_json::from_str(&text).unwrap();
        assert!(matches!(parsed, Variant::Double(value) if value.is_nan()));

        let parsed: Variant =
            serde_json::from_value(json!({"type": "double", "value": "-inf"})).unwrap();
        assert_eq!(parsed, Variant::Double(f64::NEG_INFINITY));
        let parsed: Variant = serde_json::from_value(json!({"type": "double", "value": 2})).unwrap();
        assert_eq!(parsed, Variant::Double(2.0));

        let invalid = serde_json::from_value::<Variant>(json!({"type": "double", "value": "many"}));
        assert!(invalid.is_err());
    }

    #[test]
    fn test_int_coercion_rejects_two_to_the_63() {
        assert_eq!(Variant::Double(9_223_372_036_854_775_808.0).to_int(), None);
        assert_eq!(Variant::Double(-9_223_372_036_854_775_808.0).to_int(), Some(i64::MIN));
        assert_eq!(Variant::Double(9_007_199_254_740_992.0).to_int(), Some(1 << 53));
    }
}
