//! Property <-> dynamic value conversion
//!
//! [`ValueConversion`] is the seam the registry persists through. The built-in
//! [`DefaultValueConversion`] dispatches on the property kind; conversion problems are
//! logged with the property key and reported as `None`/`false`, never raised.

use super::property::{Property, PropertyError};
use super::unit_system::{self, UnitError, UnitSchema};
use super::value::{Color, PropertyKind, PropertyValue};
use crate::contract::Variant;

/// Conversion between properties and persisted values
pub trait ValueConversion {
    /// Dynamic representation of the property's current value
    fn to_variant(&self, property: &Property) -> Option<Variant>;

    /// Assign `variant` to the property, `false` leaves the property untouched
    fn from_variant(&self, property: &Property, variant: &Variant) -> bool;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("conversion not yet implemented for {0} properties")]
    NotImplemented(PropertyKind),

    #[error("cannot convert {found} value to {kind}")]
    Coercion {
        kind: PropertyKind,
        found: &'static str,
    },

    #[error("not hexadecimal color format '{0}'")]
    InvalidColor(String),

    #[error("no enumeration item for '{0}'")]
    UnknownEnumName(String),

    #[error("enumeration value {0} has no item name")]
    UnnamedEnumValue(i32),

    #[error("failed to parse quantity string '{text}': {source}")]
    QuantityParse {
        text: String,
        #[source]
        source: UnitError,
    },

    #[error("invalid scale factor in quantity string '{0}'")]
    InvalidFactor(String),

    #[error("unit mismatch with quantity string '{text}', expected {expected}")]
    UnitMismatch {
        text: String,
        expected: unit_system::Unit,
    },

    #[error("cannot format quantity value {0}")]
    QuantityFormat(f64),

    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// Built-in conversion
///
/// Quantities are written in the reference unit of `unit_schema` with at most
/// `double_precision` significant digits.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValueConversion {
    double_precision: usize,
    unit_schema: UnitSchema,
}

impl Default for DefaultValueConversion {
    fn default() -> Self {
        Self {
            double_precision: 6,
            unit_schema: UnitSchema::Si,
        }
    }
}

impl DefaultValueConversion {
    pub fn new(double_precision: usize, unit_schema: UnitSchema) -> Self {
        Self {
            double_precision,
            unit_schema,
        }
    }

    pub fn double_precision(&self) -> usize {
        self.double_precision
    }

    pub fn set_double_precision(&mut self, precision: usize) {
        self.double_precision = precision;
    }

    pub fn unit_schema(&self) -> UnitSchema {
        self.unit_schema
    }

    pub fn set_unit_schema(&mut self, schema: UnitSchema) {
        self.unit_schema = schema;
    }

    pub fn try_to_variant(&self, property: &Property) -> Result<Variant, ConversionError> {
        property.with_value(|value| -> Result<Variant, ConversionError> {
            match value {
                PropertyValue::Bool(value) => Ok(Variant::Bool(*value)),
                PropertyValue::Int(value) => Ok(Variant::from(*value)),
                PropertyValue::Double(value) => Ok(Variant::Double(*value)),
                PropertyValue::Bytes(value) => Ok(Variant::Bytes(value.clone())),
                PropertyValue::String(value) => Ok(Variant::String(value.clone())),
                PropertyValue::StringList(value) => Ok(Variant::StringList(value.clone())),
                PropertyValue::DateTime(value) => Ok(Variant::DateTime(*value)),
                PropertyValue::Color(color) => Ok(Variant::String(color.to_hex())),
                PropertyValue::Enumeration(value) => value
                    .name()
                    .map(Variant::from)
                    .ok_or(ConversionError::UnnamedEnumValue(value.value())),
                PropertyValue::Quantity(quantity) => {
                    let translated =
                        unit_system::translate(self.unit_schema, quantity.value, quantity.unit);
                    let value = translated.translated_value();
                    let number = unit_system::format_general(value, self.double_precision)
                        .ok_or(ConversionError::QuantityFormat(value))?;
                    Ok(Variant::String(format!("{}{}", number, translated.unit_suffix())))
                }
                PropertyValue::CheckState(_) | PropertyValue::Point(_) | PropertyValue::Transform(_) => {
                    Err(ConversionError::NotImplemented(value.kind()))
                }
            }
        })
    }

    pub fn try_from_variant(
        &self,
        property: &Property,
        variant: &Variant,
    ) -> Result<(), ConversionError> {
        let kind = property.kind();
        let coercion = || ConversionError::Coercion {
            kind,
            found: variant.type_name(),
        };

        match kind {
            PropertyKind::Bool => property.set_value(variant.to_bool().ok_or_else(coercion)?)?,
            PropertyKind::Int => {
                let value = variant
                    .to_int()
                    .and_then(|value| i32::try_from(value).ok())
                    .ok_or_else(coercion)?;
                property.set_value(value)?
            }
            PropertyKind::Double => property.set_value(variant.to_double().ok_or_else(coercion)?)?,
            PropertyKind::Bytes => property.set_value(variant.to_bytes().ok_or_else(coercion)?)?,
            PropertyKind::String => property.set_value(variant.to_text().ok_or_else(coercion)?)?,
            PropertyKind::StringList => {
                property.set_value(variant.to_string_list().ok_or_else(coercion)?)?
            }
            PropertyKind::DateTime => {
                property.set_value(variant.to_date_time().ok_or_else(coercion)?)?
            }
            PropertyKind::Color => {
                let text = variant.to_text().ok_or_else(coercion)?;
                let color =
                    Color::from_hex(&text).ok_or(ConversionError::InvalidColor(text))?;
                property.set_value(color)?
            }
            PropertyKind::Enumeration => {
                let name = variant.to_text().ok_or_else(coercion)?;
                let item_value = property
                    .enum_value()
                    .and_then(|current| {
                        current
                            .enumeration()
                            .find_item_by_name(&name)
                            .map(|item| item.value)
                    })
                    .ok_or(ConversionError::UnknownEnumName(name))?;
                property.set_enum_value(item_value)?
            }
            PropertyKind::Quantity => {
                let text = variant.to_text().ok_or_else(coercion)?;
                let value = self.parse_quantity_for(property, &text)?;
                property.set_quantity_value(value)?
            }
            PropertyKind::CheckState | PropertyKind::Point | PropertyKind::Transform => {
                return Err(ConversionError::NotImplemented(kind));
            }
        }

        Ok(())
    }

    /// Value of `text` expressed in the property's unit
    ///
    /// A unit token must name either the property's unit or the reference unit it is
    /// written in under the active schema. Without a token the property's unit is assumed.
    fn parse_quantity_for(&self, property: &Property, text: &str) -> Result<f64, ConversionError> {
        let unit = property
            .quantity_unit()
            .ok_or(ConversionError::Coercion {
                kind: PropertyKind::Quantity,
                found: "non-quantity",
            })?;

        let parsed = unit_system::parse_quantity(text).map_err(|source| {
            ConversionError::QuantityParse {
                text: text.to_string(),
                source,
            }
        })?;
        if !parsed.factor.is_finite() || parsed.factor == 0.0 {
            return Err(ConversionError::InvalidFactor(text.to_string()));
        }

        match parsed.unit {
            None => Ok(parsed.value),
            Some(token) if token == unit => Ok(parsed.value),
            Some(token) if token == self.unit_schema.reference_unit(unit) => {
                Ok(parsed.value * parsed.factor / unit.factor_to_base())
            }
            Some(_) => Err(ConversionError::UnitMismatch {
                text: text.to_string(),
                expected: unit,
            }),
        }
    }
}

impl ValueConversion for DefaultValueConversion {
    fn to_variant(&self, property: &Property) -> Option<Variant> {
        match self.try_to_variant(property) {
            Ok(variant) => Some(variant),
            Err(err) => {
                tracing::error!(property = property.key(), "to_variant() failed: {}", err);
                None
            }
        }
    }

    fn from_variant(&self, property: &Property, variant: &Variant) -> bool {
        match self.try_from_variant(property, variant) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(property = property.key(), "from_variant() failed: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enumeration::Enumeration;
    use crate::domain::unit_system::Unit;
    use crate::domain::value::{CheckState, EnumValue, Point3, Quantity, Transform};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn conversion() -> DefaultValueConversion {
        DefaultValueConversion::default()
    }

    #[test]
    fn test_scalar_kinds_round_trip() {
        let conv = conversion();
        let date = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).single().unwrap();
        let cases: Vec<(PropertyValue, PropertyValue)> = vec![
            (true.into(), false.into()),
            (7.into(), (-123_456).into()),
            (0.5.into(), 1.0e-9.into()),
            (vec![1u8, 2].into(), vec![0u8, 255, 16].into()),
            ("abc".into(), "hello, world".into()),
            (vec!["a".to_string()].into(), vec!["x".to_string(), "y".to_string()].into()),
            (Utc::now().into(), date.into()),
        ];

        for (initial, expected) in cases {
            let source = Property::new("source", expected.clone());
            let target = Property::new("target", initial);

            let variant = conv.to_variant(&source).unwrap();
            assert!(conv.from_variant(&target, &variant), "{variant:?}");
            assert_eq!(target.value(), expected);
        }
    }

    #[test]
    fn test_int_rejects_out_of_range_and_text() {
        let conv = conversion();
        let property = Property::new("count", 3);

        assert!(!conv.from_variant(&property, &Variant::Int(i64::from(i32::MAX) + 1)));
        assert!(!conv.from_variant(&property, &Variant::from("three")));
        assert!(!conv.from_variant(&property, &Variant::Null));
        assert_eq!(property.as_int(), Some(3));

        assert!(conv.from_variant(&property, &Variant::from("42")));
        assert_eq!(property.as_int(), Some(42));
    }

    #[test]
    fn test_color_conversion() {
        let conv = conversion();
        let property = Property::new("background", Color::from_rgb(0, 0, 0));

        assert!(conv.from_variant(&property, &Variant::from("#3A7BD5")));
        assert_eq!(property.value(), PropertyValue::Color(Color::from_rgb(0x3A, 0x7B, 0xD5)));
        assert_eq!(conv.to_variant(&property), Some(Variant::from("#3A7BD5")));

        assert!(conv.from_variant(&property, &Variant::from("#11223380")));
        assert_eq!(conv.to_variant(&property), Some(Variant::from("#11223380")));

        assert!(!conv.from_variant(&property, &Variant::from("blue")));
        assert!(!conv.from_variant(&property, &Variant::from("#12345")));
        assert_eq!(property.value(), PropertyValue::Color(Color::from_rgba(0x11, 0x22, 0x33, 0x80)));
    }

    #[test]
    fn test_enumeration_conversion() {
        let conv = conversion();
        let modes = Arc::new(
            Enumeration::new()
                .with_item(1, "Wireframe")
                .with_item(2, "Shaded")
                .with_item(4, "ShadedWithEdges"),
        );
        let property = Property::new("displayMode", EnumValue::new(modes, 1).unwrap());

        assert!(!conv.from_variant(&property, &Variant::from("UnknownName")));
        assert_eq!(property.enum_value().map(|v| v.value()), Some(1));

        assert!(conv.from_variant(&property, &Variant::from("ShadedWithEdges")));
        assert_eq!(property.enum_value().map(|v| v.value()), Some(4));
        assert_eq!(conv.to_variant(&property), Some(Variant::from("ShadedWithEdges")));
    }

    #[test]
    fn test_quantity_with_matching_unit() {
        let conv = conversion();
        let property = Property::new("length", Quantity::new(1.0, Unit::Millimeter));

        assert!(conv.from_variant(&property, &Variant::from("10mm")));
        assert_eq!(property.quantity().map(|q| q.value), Some(10.0));
    }

    #[test]
    fn test_quantity_with_other_unit_fails() {
        let conv = conversion();
        let property = Property::new("length", Quantity::new(1.0, Unit::Meter));

        assert!(!conv.from_variant(&property, &Variant::from("10mm")));
        assert_eq!(property.quantity().map(|q| q.value), Some(1.0));

        let err = conv.try_from_variant(&property, &Variant::from("10mm")).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnitMismatch {
                text: "10mm".to_string(),
                expected: Unit::Meter,
            }
        );
    }

    #[test]
    fn test_quantity_without_unit_uses_native_unit() {
        let conv = conversion();
        let property = Property::new("length", Quantity::new(1.0, Unit::Millimeter));

        assert!(conv.from_variant(&property, &Variant::from("10")));
        assert_eq!(property.quantity().map(|q| q.value), Some(10.0));

        assert!(conv.from_variant(&property, &Variant::Double(2.5)));
        assert_eq!(property.quantity().map(|q| q.value), Some(2.5));
    }

    #[test]
    fn test_quantity_parse_failure_keeps_value() {
        let conv = conversion();
        let property = Property::new("angle", Quantity::new(45.0, Unit::Degree));

        for text in ["", "deg", "12 parsecs", "1e999deg"] {
            assert!(!conv.from_variant(&property, &Variant::from(text)), "{text}");
        }
        assert!(!conv.from_variant(&property, &Variant::Null));
        assert_eq!(property.quantity().map(|q| q.value), Some(45.0));
    }

    #[test]
    fn test_quantity_formatting() {
        let conv = conversion();
        let property = Property::new("deflection", Quantity::new(0.1 + 0.2, Unit::Millimeter));
        assert_eq!(conv.to_variant(&property), Some(Variant::from("0.3mm")));

        let precise = DefaultValueConversion::new(12, UnitSchema::Si);
        assert_eq!(precise.to_variant(&property), Some(Variant::from("0.3mm")));

        let coarse = DefaultValueConversion::new(2, UnitSchema::Si);
        let property = Property::new("size", Quantity::new(1234.0, Unit::Millimeter));
        assert_eq!(coarse.to_variant(&property), Some(Variant::from("1.2e3mm")));
    }

    #[test]
    fn test_oversized_precision_is_clamped() {
        let conv = DefaultValueConversion::new(70_000, UnitSchema::Si);
        let property = Property::new("length", Quantity::new(1.5, Unit::Millimeter));
        assert_eq!(conv.to_variant(&property), Some(Variant::from("1.5mm")));

        let target = Property::new("length", Quantity::new(0.0, Unit::Millimeter));
        assert!(conv.from_variant(&target, &Variant::from("1.5mm")));
        assert_eq!(target.quantity().map(|q| q.value), Some(1.5));
    }

    #[test]
    fn test_quantity_non_finite_yields_none() {
        let conv = conversion();
        let property = Property::new("size", Quantity::new(f64::INFINITY, Unit::Millimeter));
        assert_eq!(conv.to_variant(&property), None);
        assert!(matches!(
            conv.try_to_variant(&property),
            Err(ConversionError::QuantityFormat(_))
        ));
    }

    #[test]
    fn test_imperial_quantity_round_trips_through_reference_unit() {
        let conv = conversion();
        let source = Property::new("thickness", Quantity::new(2.0, Unit::Inch));
        let variant = conv.to_variant(&source).unwrap();
        assert_eq!(variant, Variant::from("50.8mm"));

        let target = Property::new("thickness", Quantity::new(0.0, Unit::Inch));
        assert!(conv.from_variant(&target, &variant));
        let value = target.quantity().map(|q| q.value).unwrap_or_default();
        assert!((value - 2.0).abs() < 1e-9);

        assert!(conv.from_variant(&target, &Variant::from("3in")));
        assert_eq!(target.quantity().map(|q| q.value), Some(3.0));
        assert!(!conv.from_variant(&target, &Variant::from("3ft")));
    }

    #[test]
    fn test_unimplemented_kinds() {
        let conv = conversion();
        let kinds: Vec<PropertyValue> = vec![
            CheckState::Checked.into(),
            Point3::new(1.0, 2.0, 3.0).into(),
            Transform::identity().into(),
        ];

        for value in kinds {
            let property = Property::new("unsupported", value.clone());
            assert_eq!(conv.to_variant(&property), None);
            assert!(!conv.from_variant(&property, &Variant::from("anything")));
            assert_eq!(property.value(), value);
            assert_eq!(
                conv.try_to_variant(&property),
                Err(ConversionError::NotImplemented(value.kind()))
            );
        }
    }
}
