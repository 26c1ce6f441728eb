//! Physical units and quantity text
//!
//! Every [`Unit`] belongs to a [`Dimension`] and carries its scale factor to the
//! dimension's base unit (mm, mm², mm³, rad, kg, s, mm/s, kg/m³, Pa).
//! A [`UnitSchema`] picks the reference unit a value is rendered in.

use std::f64::consts::PI;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Area,
    Volume,
    Angle,
    Mass,
    Time,
    Velocity,
    Density,
    Pressure,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Length => "length",
            Self::Area => "area",
            Self::Volume => "volume",
            Self::Angle => "angle",
            Self::Mass => "mass",
            Self::Time => "time",
            Self::Velocity => "velocity",
            Self::Density => "density",
            Self::Pressure => "pressure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Micrometer,
    Millimeter,
    Centimeter,
    Meter,
    Kilometer,
    Inch,
    Foot,

    SquareMillimeter,
    SquareCentimeter,
    SquareMeter,
    SquareInch,
    SquareFoot,

    CubicMillimeter,
    CubicCentimeter,
    CubicMeter,
    Liter,
    CubicInch,
    CubicFoot,

    Radian,
    Degree,

    Gram,
    Kilogram,
    Tonne,
    Pound,

    Millisecond,
    Second,
    Minute,
    Hour,

    MillimeterPerSecond,
    MeterPerSecond,
    InchPerSecond,

    KilogramPerCubicMeter,
    GramPerCubicCentimeter,
    PoundPerCubicFoot,

    Pascal,
    Kilopascal,
    Megapascal,
    Psi,
}

impl Unit {
    const ALL: [Unit; 38] = [
        Unit::Micrometer,
        Unit::Millimeter,
        Unit::Centimeter,
        Unit::Meter,
        Unit::Kilometer,
        Unit::Inch,
        Unit::Foot,
        Unit::SquareMillimeter,
        Unit::SquareCentimeter,
        Unit::SquareMeter,
        Unit::SquareInch,
        Unit::SquareFoot,
        Unit::CubicMillimeter,
        Unit::CubicCentimeter,
        Unit::CubicMeter,
        Unit::Liter,
        Unit::CubicInch,
        Unit::CubicFoot,
        Unit::Radian,
        Unit::Degree,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Tonne,
        Unit::Pound,
        Unit::Millisecond,
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::MillimeterPerSecond,
        Unit::MeterPerSecond,
        Unit::InchPerSecond,
        Unit::KilogramPerCubicMeter,
        Unit::GramPerCubicCentimeter,
        Unit::PoundPerCubicFoot,
        Unit::Pascal,
        Unit::Kilopascal,
        Unit::Megapascal,
        Unit::Psi,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Micrometer => "um",
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Inch => "in",
            Self::Foot => "ft",
            Self::SquareMillimeter => "mm2",
            Self::SquareCentimeter => "cm2",
            Self::SquareMeter => "m2",
            Self::SquareInch => "in2",
            Self::SquareFoot => "ft2",
            Self::CubicMillimeter => "mm3",
            Self::CubicCentimeter => "cm3",
            Self::CubicMeter => "m3",
            Self::Liter => "L",
            Self::CubicInch => "in3",
            Self::CubicFoot => "ft3",
            Self::Radian => "rad",
            Self::Degree => "deg",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Tonne => "t",
            Self::Pound => "lb",
            Self::Millisecond => "ms",
            Self::Second => "s",
            Self::Minute => "min",
            Self::Hour => "h",
            Self::MillimeterPerSecond => "mm/s",
            Self::MeterPerSecond => "m/s",
            Self::InchPerSecond => "in/s",
            Self::KilogramPerCubicMeter => "kg/m3",
            Self::GramPerCubicCentimeter => "g/cm3",
            Self::PoundPerCubicFoot => "lb/ft3",
            Self::Pascal => "Pa",
            Self::Kilopascal => "kPa",
            Self::Megapascal => "MPa",
            Self::Psi => "psi",
        }
    }

    pub fn dimension(self) -> Dimension {
        match self {
            Self::Micrometer
            | Self::Millimeter
            | Self::Centimeter
            | Self::Meter
            | Self::Kilometer
            | Self::Inch
            | Self::Foot => Dimension::Length,
            Self::SquareMillimeter
            | Self::SquareCentimeter
            | Self::SquareMeter
            | Self::SquareInch
            | Self::SquareFoot => Dimension::Area,
            Self::CubicMillimeter
            | Self::CubicCentimeter
            | Self::CubicMeter
            | Self::Liter
            | Self::CubicInch
            | Self::CubicFoot => Dimension::Volume,
            Self::Radian | Self::Degree => Dimension::Angle,
            Self::Gram | Self::Kilogram | Self::Tonne | Self::Pound => Dimension::Mass,
            Self::Millisecond | Self::Second | Self::Minute | Self::Hour => Dimension::Time,
            Self::MillimeterPerSecond | Self::MeterPerSecond | Self::InchPerSecond => {
                Dimension::Velocity
            }
            Self::KilogramPerCubicMeter | Self::GramPerCubicCentimeter | Self::PoundPerCubicFoot => {
                Dimension::Density
            }
            Self::Pascal | Self::Kilopascal | Self::Megapascal | Self::Psi => Dimension::Pressure,
        }
    }

    /// Scale factor from this unit to the base unit of its dimension
    pub fn factor_to_base(self) -> f64 {
        match self {
            Self::Micrometer => 0.001,
            Self::Millimeter => 1.0,
            Self::Centimeter => 10.0,
            Self::Meter => 1000.0,
            Self::Kilometer => 1.0e6,
            Self::Inch => 25.4,
            Self::Foot => 304.8,
            Self::SquareMillimeter => 1.0,
            Self::SquareCentimeter => 100.0,
            Self::SquareMeter => 1.0e6,
            Self::SquareInch => 645.16,
            Self::SquareFoot => 92_903.04,
            Self::CubicMillimeter => 1.0,
            Self::CubicCentimeter => 1000.0,
            Self::CubicMeter => 1.0e9,
            Self::Liter => 1.0e6,
            Self::CubicInch => 16_387.064,
            Self::CubicFoot => 28_316_846.592,
            Self::Radian => 1.0,
            Self::Degree => PI / 180.0,
            Self::Gram => 0.001,
            Self::Kilogram => 1.0,
            Self::Tonne => 1000.0,
            Self::Pound => 0.453_592_37,
            Self::Millisecond => 0.001,
            Self::Second => 1.0,
            Self::Minute => 60.0,
            Self::Hour => 3600.0,
            Self::MillimeterPerSecond => 1.0,
            Self::MeterPerSecond => 1000.0,
            Self::InchPerSecond => 25.4,
            Self::KilogramPerCubicMeter => 1.0,
            Self::GramPerCubicCentimeter => 1000.0,
            Self::PoundPerCubicFoot => 16.018_463_373_960_138,
            Self::Pascal => 1.0,
            Self::Kilopascal => 1000.0,
            Self::Megapascal => 1.0e6,
            Self::Psi => 6894.757_293_168_361,
        }
    }

    /// Resolve a unit token; `µm` and `°` are accepted as aliases
    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        match symbol {
            "µm" => Some(Self::Micrometer),
            "°" => Some(Self::Degree),
            _ => Self::ALL.iter().copied().find(|unit| unit.symbol() == symbol),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Schema used to render quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSchema {
    /// Metric units kept as they are, imperial units mapped to their metric reference
    #[default]
    Si,
    /// Metric units mapped to their imperial counterpart
    ImperialUk,
}

impl UnitSchema {
    /// Unit a value expressed in `unit` is rendered in under this schema
    pub fn reference_unit(self, unit: Unit) -> Unit {
        use Unit::*;

        match self {
            Self::Si => match unit {
                Inch | Foot => Millimeter,
                SquareInch | SquareFoot => SquareMillimeter,
                CubicInch | CubicFoot => CubicMillimeter,
                Pound => Kilogram,
                InchPerSecond => MillimeterPerSecond,
                PoundPerCubicFoot => KilogramPerCubicMeter,
                Psi => Pascal,
                other => other,
            },
            Self::ImperialUk => match unit {
                Micrometer | Millimeter | Centimeter | Meter | Kilometer => Inch,
                SquareMillimeter | SquareCentimeter | SquareMeter => SquareInch,
                CubicMillimeter | CubicCentimeter | CubicMeter | Liter => CubicInch,
                Gram | Kilogram | Tonne => Pound,
                MillimeterPerSecond | MeterPerSecond => InchPerSecond,
                KilogramPerCubicMeter | GramPerCubicCentimeter => PoundPerCubicFoot,
                Pascal | Kilopascal | Megapascal => Psi,
                other => other,
            },
        }
    }
}

/// Outcome of [`translate`]: `value * factor` is the value expressed in `unit`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateResult {
    pub value: f64,
    pub factor: f64,
    pub unit: Unit,
}

impl TranslateResult {
    pub fn unit_suffix(&self) -> &'static str {
        self.unit.symbol()
    }

    pub fn translated_value(&self) -> f64 {
        self.value * self.factor
    }
}

/// Outcome of [`parse_quantity`]
///
/// `factor` converts `value` to the base unit of the token's dimension; it is `1.0`
/// when the text has no unit token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedQuantity {
    pub value: f64,
    pub factor: f64,
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("no numeric value found in '{0}'")]
    InvalidNumber(String),

    #[error("unknown unit '{unit}' in '{text}'")]
    UnknownUnit { text: String, unit: String },
}

/// Express `value` (given in `unit`) in the reference unit of `schema`
pub fn translate(schema: UnitSchema, value: f64, unit: Unit) -> TranslateResult {
    let target = schema.reference_unit(unit);
    let factor = if target == unit {
        1.0
    } else {
        unit.factor_to_base() / target.factor_to_base()
    };

    TranslateResult {
        value,
        factor,
        unit: target,
    }
}

#[allow(clippy::expect_used)]
static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)\s*(\S*)\s*$")
        .expect("quantity pattern is a valid regex")
});

/// Parse `<number>[<unit>]`, e.g. `"12.5mm"`, `"-3e2 deg"` or `"40"`
pub fn parse_quantity(text: &str) -> Result<ParsedQuantity, UnitError> {
    let captures = QUANTITY_PATTERN
        .captures(text)
        .ok_or_else(|| UnitError::InvalidNumber(text.to_string()))?;

    let number = captures.get(1).map_or("", |m| m.as_str());
    let value: f64 = number
        .parse()
        .map_err(|_| UnitError::InvalidNumber(text.to_string()))?;
    if !value.is_finite() {
        return Err(UnitError::InvalidNumber(text.to_string()));
    }

    let token = captures.get(2).map_or("", |m| m.as_str());
    if token.is_empty() {
        return Ok(ParsedQuantity {
            value,
            factor: 1.0,
            unit: None,
        });
    }

    let unit = Unit::from_symbol(token).ok_or_else(|| UnitError::UnknownUnit {
        text: text.to_string(),
        unit: token.to_string(),
    })?;

    Ok(ParsedQuantity {
        value,
        factor: unit.factor_to_base(),
        unit: Some(unit),
    })
}

/// Digits needed to round-trip any `f64`, larger precisions are clamped to it
pub const MAX_SIGNIFICANT_DIGITS: usize = 17;

/// Shortest "general" rendering of `value` with at most `precision` significant digits
///
/// Fixed notation is used for decimal exponents in `-4..precision`, scientific otherwise.
/// Trailing zeros are dropped. Returns `None` for non-finite values.
pub fn format_general(value: f64, precision: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }

    let precision = precision.clamp(1, MAX_SIGNIFICANT_DIGITS);
    // Rounding to the requested digits first gives the exponent of the rendered value
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = scientific.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    let max_exponent = i32::try_from(precision).unwrap_or(i32::MAX);

    if exponent < -4 || exponent >= max_exponent {
        return Some(format!("{}e{}", trim_fraction(mantissa), exponent));
    }

    let decimals = usize::try_from(max_exponent - 1 - exponent).unwrap_or(0);
    let fixed = format!("{:.*}", decimals, value);
    Some(trim_fraction(&fixed).to_string())
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
