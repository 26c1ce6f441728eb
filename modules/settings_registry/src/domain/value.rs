//! Typed property values
//!
//! `PropertyValue` is the closed set of kinds a property can hold. Each variant carries
//! everything needed to interpret it: quantities their unit, enumeration values the
//! enumeration they come from.

use super::enumeration::Enumeration;
use super::unit_system::Unit;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Bool,
    Int,
    Double,
    CheckState,
    Bytes,
    String,
    StringList,
    DateTime,
    Color,
    Point,
    Transform,
    Quantity,
    Enumeration,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::CheckState => "check-state",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::StringList => "string-list",
            Self::DateTime => "date-time",
            Self::Color => "color",
            Self::Point => "point",
            Self::Transform => "transform",
            Self::Quantity => "quantity",
            Self::Enumeration => "enumeration",
        };
        f.write_str(name)
    }
}

/// Tri-state check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    PartiallyChecked,
    Checked,
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#RRGGBB` when opaque, `#RRGGBBAA` otherwise
    pub fn to_hex(&self) -> String {
        if self.a == u8::MAX {
            format!("#{}", hex::encode_upper([self.r, self.g, self.b]))
        } else {
            format!("#{}", hex::encode_upper([self.r, self.g, self.b, self.a]))
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive)
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.trim().strip_prefix('#')?;
        let bytes = hex::decode(digits).ok()?;
        match bytes.as_slice() {
            [r, g, b] => Some(Self::from_rgb(*r, *g, *b)),
            [r, g, b, a] => Some(Self::from_rgba(*r, *g, *b, *a)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Affine 3D transform stored as the top three rows of a 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rows: [[f64; 4]; 3],
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    pub fn translation(offset: Point3) -> Self {
        let mut transform = Self::identity();
        transform.rows[0][3] = offset.x;
        transform.rows[1][3] = offset.y;
        transform.rows[2][3] = offset.z;
        transform
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Numeric value expressed in a physical unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// Item value of an enumeration
#[derive(Debug, Clone)]
pub struct EnumValue {
    enumeration: Arc<Enumeration>,
    value: i32,
}

impl EnumValue {
    /// `None` when `value` is not an item of `enumeration`
    pub fn new(enumeration: Arc<Enumeration>, value: i32) -> Option<Self> {
        enumeration
            .contains(value)
            .then_some(Self { enumeration, value })
    }

    /// Value of the first item, `None` for an empty enumeration
    pub fn first(enumeration: Arc<Enumeration>) -> Option<Self> {
        let value = enumeration.items().first()?.value;
        Some(Self { enumeration, value })
    }

    pub fn enumeration(&self) -> &Arc<Enumeration> {
        &self.enumeration
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.enumeration.find_name(self.value)
    }

    pub(crate) fn same_enumeration(&self, other: &EnumValue) -> bool {
        Arc::ptr_eq(&self.enumeration, &other.enumeration) || self.enumeration == other.enumeration
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.same_enumeration(other)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Double(f64),
    CheckState(CheckState),
    Bytes(Vec<u8>),
    String(String),
    StringList(Vec<String>),
    DateTime(DateTime<Utc>),
    Color(Color),
    Point(Point3),
    Transform(Transform),
    Quantity(Quantity),
    Enumeration(EnumValue),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Double(_) => PropertyKind::Double,
            Self::CheckState(_) => PropertyKind::CheckState,
            Self::Bytes(_) => PropertyKind::Bytes,
            Self::String(_) => PropertyKind::String,
            Self::StringList(_) => PropertyKind::StringList,
            Self::DateTime(_) => PropertyKind::DateTime,
            Self::Color(_) => PropertyKind::Color,
            Self::Point(_) => PropertyKind::Point,
            Self::Transform(_) => PropertyKind::Transform,
            Self::Quantity(_) => PropertyKind::Quantity,
            Self::Enumeration(_) => PropertyKind::Enumeration,
        }
    }

    /// Whether `other` may replace `self` in a property
    ///
    /// Same kind, and for quantities the same unit, for enumerations the same item set.
    pub fn is_compatible_with(&self, other: &PropertyValue) -> bool {
        match (self, other) {
            (Self::Quantity(current), Self::Quantity(next)) => current.unit == next.unit,
            (Self::Enumeration(current), Self::Enumeration(next)) => current.same_enumeration(next),
            _ => self.kind() == other.kind(),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<CheckState> for PropertyValue {
    fn from(value: CheckState) -> Self {
        Self::CheckState(value)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<Point3> for PropertyValue {
    fn from(value: Point3) -> Self {
        Self::Point(value)
    }
}

impl From<Transform> for PropertyValue {
    fn from(value: Transform) -> Self {
        Self::Transform(value)
    }
}

impl From<Quantity> for PropertyValue {
    fn from(value: Quantity) -> Self {
        Self::Quantity(value)
    }
}

impl From<EnumValue> for PropertyValue {
    fn from(value: EnumValue) -> Self {
        Self::Enumeration(value)
    }
}
