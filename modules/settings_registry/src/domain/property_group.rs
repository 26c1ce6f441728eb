//! Aggregate of properties with default restoration and event relay

use super::events::{PropertyEvent, Subscribers};
use super::property::Property;
use super::value::PropertyValue;
use crate::contract::Identifier;
use std::rc::Rc;

struct Member {
    property: Rc<Property>,
    default: PropertyValue,
}

/// Owns a set of properties
///
/// The value a property has when it joins the group is its default. Change and enable
/// events of every member are relayed to the group's subscribers, and from there to the
/// parent group when one was given.
#[derive(Default)]
pub struct PropertyGroup {
    members: Vec<Member>,
    subscribers: Rc<Subscribers>,
}

impl PropertyGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group whose events are also delivered to `parent`'s subscribers
    pub fn with_parent(parent: &PropertyGroup) -> Self {
        let group = Self::new();
        let relay = Rc::clone(&parent.subscribers);
        group
            .subscribers
            .subscribe(move |property, event| relay.notify(property, event));
        group
    }

    /// Add an existing property, capturing its current value as default
    pub fn add(&mut self, property: Rc<Property>) -> Rc<Property> {
        let relay = Rc::clone(&self.subscribers);
        property.subscribe(move |property, event| relay.notify(property, event));
        self.members.push(Member {
            default: property.value(),
            property: Rc::clone(&property),
        });
        property
    }

    /// Create a property owned by this group
    pub fn create(
        &mut self,
        name: impl Into<Identifier>,
        value: impl Into<PropertyValue>,
    ) -> Rc<Property> {
        self.add(Property::new(name, value))
    }

    pub fn properties(&self) -> impl Iterator<Item = &Rc<Property>> + '_ {
        self.members.iter().map(|member| &member.property)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&Rc<Property>> {
        self.properties().find(|property| property.key() == key)
    }

    pub fn default_value(&self, key: &str) -> Option<&PropertyValue> {
        self.members
            .iter()
            .find(|member| member.property.key() == key)
            .map(|member| &member.default)
    }

    /// Put every property back to the value it had when it joined the group
    pub fn restore_defaults(&self) {
        for member in &self.members {
            if let Err(err) = member.property.set_value(member.default.clone()) {
                tracing::warn!(property = member.property.key(), error = %err, "failed to restore default value");
            }
        }
    }

    pub fn subscribe(&self, observer: impl Fn(&Property, PropertyEvent) + 'static) {
        self.subscribers.subscribe(observer);
    }
}
