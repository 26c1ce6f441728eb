//! Observable typed value holder

use super::events::{PropertyEvent, Subscribers};
use super::unit_system::Unit;
use super::value::{EnumValue, PropertyKind, PropertyValue, Quantity};
use crate::contract::Identifier;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("property '{property}' holds {expected} values, got {found}")]
    KindMismatch {
        property: String,
        expected: PropertyKind,
        found: PropertyKind,
    },

    #[error("property '{property}' expects quantities in {expected}, got {found}")]
    UnitMismatch {
        property: String,
        expected: Unit,
        found: Unit,
    },

    #[error("property '{property}' has no enumeration item with value {value}")]
    UnknownEnumValue { property: String, value: i32 },
}

/// Typed value with a name, an enabled flag and change notification
///
/// The kind of a property is fixed by its initial value: replacing it with a value of
/// another kind (or a quantity in another unit, or an item of another enumeration) is
/// rejected. Replacing it with an equal value does nothing and notifies nobody.
///
/// Properties are shared through `Rc`; whoever creates one owns it, aggregates and the
/// settings registry only observe it.
pub struct Property {
    name: Identifier,
    value: RefCell<PropertyValue>,
    enabled: Cell<bool>,
    subscribers: Subscribers,
}

impl Property {
    pub fn new(name: impl Into<Identifier>, value: impl Into<PropertyValue>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            value: RefCell::new(value.into()),
            enabled: Cell::new(true),
            subscribers: Subscribers::new(),
        })
    }

    pub fn name(&self) -> &Identifier {
        &self.name
    }

    /// Key of the name, used to derive persisted setting paths
    pub fn key(&self) -> &str {
        self.name.key()
    }

    pub fn kind(&self) -> PropertyKind {
        self.value.borrow().kind()
    }

    pub fn value(&self) -> PropertyValue {
        self.value.borrow().clone()
    }

    /// Borrow the current value without cloning it
    pub fn with_value<R>(&self, f: impl FnOnce(&PropertyValue) -> R) -> R {
        f(&self.value.borrow())
    }

    pub fn set_value(&self, value: impl Into<PropertyValue>) -> Result<(), PropertyError> {
        let value = value.into();
        {
            let mut current = self.value.borrow_mut();
            self.check_compatible(&current, &value)?;
            if *current == value {
                return Ok(());
            }
            *current = value;
        }
        self.subscribers.notify(self, PropertyEvent::Changed);
        Ok(())
    }

    /// Replace the numeric value of a quantity property, keeping its unit
    pub fn set_quantity_value(&self, value: f64) -> Result<(), PropertyError> {
        let unit = self.quantity_unit().ok_or_else(|| self.kind_mismatch(PropertyKind::Quantity))?;
        self.set_value(Quantity::new(value, unit))
    }

    /// Select another item of the property's enumeration by value
    pub fn set_enum_value(&self, value: i32) -> Result<(), PropertyError> {
        let enumeration = match &*self.value.borrow() {
            PropertyValue::Enumeration(current) => current.enumeration().clone(),
            _ => return Err(self.kind_mismatch(PropertyKind::Enumeration)),
        };
        let next = EnumValue::new(enumeration, value).ok_or_else(|| PropertyError::UnknownEnumValue {
            property: self.key().to_string(),
            value,
        })?;
        self.set_value(next)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &*self.value.borrow() {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match &*self.value.borrow() {
            PropertyValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match &*self.value.borrow() {
            PropertyValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match &*self.value.borrow() {
            PropertyValue::String(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn quantity(&self) -> Option<Quantity> {
        match &*self.value.borrow() {
            PropertyValue::Quantity(value) => Some(*value),
            _ => None,
        }
    }

    pub fn quantity_unit(&self) -> Option<Unit> {
        self.quantity().map(|quantity| quantity.unit)
    }

    pub fn enum_value(&self) -> Option<EnumValue> {
        match &*self.value.borrow() {
            PropertyValue::Enumeration(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, on: bool) {
        if self.enabled.replace(on) != on {
            self.subscribers.notify(self, PropertyEvent::Enabled(on));
        }
    }

    /// Register a callback for value and enabled-flag changes
    pub fn subscribe(&self, observer: impl Fn(&Property, PropertyEvent) + 'static) {
        self.subscribers.subscribe(observer);
    }

    fn check_compatible(&self, current: &PropertyValue, next: &PropertyValue) -> Result<(), PropertyError> {
        if current.is_compatible_with(next) {
            return Ok(());
        }
        match (current, next) {
            (PropertyValue::Quantity(current), PropertyValue::Quantity(next)) => {
                Err(PropertyError::UnitMismatch {
                    property: self.key().to_string(),
                    expected: current.unit,
                    found: next.unit,
                })
            }
            _ => Err(PropertyError::KindMismatch {
                property: self.key().to_string(),
                expected: current.kind(),
                found: next.kind(),
            }),
        }
    }

    fn kind_mismatch(&self, found: PropertyKind) -> PropertyError {
        PropertyError::KindMismatch {
            property: self.key().to_string(),
            expected: self.kind(),
            found,
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &*self.value.borrow())
            .field("enabled", &self.enabled.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enumeration::Enumeration;
    use std::sync::Arc;

    fn record_events(property: &Property) -> Rc<RefCell<Vec<PropertyEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        property.subscribe(move |_, event| sink.borrow_mut().push(event));
        events
    }

    #[test]
    fn test_set_value_notifies_on_change_only() {
        let property = Property::new("autoSave", false);
        let events = record_events(&property);

        property.set_value(true).unwrap();
        property.set_value(true).unwrap();
        assert_eq!(property.as_bool(), Some(true));
        assert_eq!(*events.borrow(), vec![PropertyEvent::Changed]);
    }

    #[test]
    fn test_set_value_rejects_other_kind() {
        let property = Property::new("recentFilesLimit", 10);
        let events = record_events(&property);

        let err = property.set_value("ten").unwrap_err();
        assert_eq!(
            err,
            PropertyError::KindMismatch {
                property: "recentFilesLimit".to_string(),
                expected: PropertyKind::Int,
                found: PropertyKind::String,
            }
        );
        assert_eq!(property.as_int(), Some(10));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_quantity_keeps_unit() {
        let property = Property::new("chordalDeflection", Quantity::new(1.0, Unit::Millimeter));
        property.set_quantity_value(0.25).unwrap();
        assert_eq!(property.quantity(), Some(Quantity::new(0.25, Unit::Millimeter)));

        let err = property.set_value(Quantity::new(1.0, Unit::Meter)).unwrap_err();
        assert!(matches!(err, PropertyError::UnitMismatch { .. }));

        let flag = Property::new("flag", true);
        assert!(matches!(
            flag.set_quantity_value(1.0),
            Err(PropertyError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_enum_value_validation() {
        let modes = Arc::new(Enumeration::from_names(["Wireframe", "Shaded"]));
        let property = Property::new("displayMode", EnumValue::first(modes).unwrap());

        property.set_enum_value(1).unwrap();
        assert_eq!(property.enum_value().and_then(|v| v.name().map(str::to_string)), Some("Shaded".to_string()));

        let err = property.set_enum_value(5).unwrap_err();
        assert_eq!(
            err,
            PropertyError::UnknownEnumValue {
                property: "displayMode".to_string(),
                value: 5,
            }
        );
        assert_eq!(property.enum_value().map(|v| v.value()), Some(1));
    }

    #[test]
    fn test_enabled_notification() {
        let property = Property::new("showGrid", true);
        let events = record_events(&property);

        assert!(property.is_enabled());
        property.set_enabled(true);
        property.set_enabled(false);
        property.set_enabled(false);
        property.set_enabled(true);

        assert_eq!(
            *events.borrow(),
            vec![PropertyEvent::Enabled(false), PropertyEvent::Enabled(true)]
        );
    }

    #[test]
    fn test_observer_can_read_new_value() {
        let property = Property::new("opacity", 0.5);
        let seen = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&seen);
        property.subscribe(move |prop, _| sink.set(prop.as_double().unwrap_or_default()));

        property.set_value(0.8).unwrap();
        assert_eq!(seen.get(), 0.8);
    }
}
