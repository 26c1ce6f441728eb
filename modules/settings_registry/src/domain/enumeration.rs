//! Named integer item sets backing enumeration properties

use crate::contract::Identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationItem {
    pub value: i32,
    pub name: Identifier,
}

/// Ordered set of `name <-> value` items
///
/// Names are matched on their identifier key, which is also what gets persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Enumeration {
    items: Vec<EnumerationItem>,
}

impl Enumeration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items numbered from 0 in the given order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        let mut enumeration = Self::new();
        for (value, name) in (0..).zip(names) {
            enumeration.add_item(value, name);
        }
        enumeration
    }

    pub fn add_item(&mut self, value: i32, name: impl Into<Identifier>) {
        self.items.push(EnumerationItem {
            value,
            name: name.into(),
        });
    }

    pub fn with_item(mut self, value: i32, name: impl Into<Identifier>) -> Self {
        self.add_item(value, name);
        self
    }

    pub fn items(&self) -> &[EnumerationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_item_by_name(&self, name: &str) -> Option<&EnumerationItem> {
        self.items.iter().find(|item| item.name.key() == name)
    }

    pub fn find_item_by_value(&self, value: i32) -> Option<&EnumerationItem> {
        self.items.iter().find(|item| item.value == value)
    }

    pub fn find_name(&self, value: i32) -> Option<&str> {
        self.find_item_by_value(value).map(|item| item.name.key())
    }

    pub fn contains(&self, value: i32) -> bool {
        self.find_item_by_value(value).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shading_modes() -> Enumeration {
        Enumeration::new()
            .with_item(10, "Wireframe")
            .with_item(20, Identifier::with_text("Shaded", "Shaded surfaces"))
            .with_item(30, "ShadedWithEdges")
    }

    #[test]
    fn test_lookup_by_name_and_value() {
        let modes = shading_modes();
        assert_eq!(modes.len(), 3);
        assert_eq!(modes.find_item_by_name("Shaded").map(|item| item.value), Some(20));
        assert_eq!(modes.find_name(30), Some("ShadedWithEdges"));
        assert!(modes.contains(10));
        assert!(!modes.contains(40));
    }

    #[test]
    fn test_lookup_uses_key_not_display_text() {
        let modes = shading_modes();
        assert!(modes.find_item_by_name("Shaded surfaces").is_none());
        assert!(modes.find_item_by_name("shaded").is_none());
    }

    #[test]
    fn test_from_names_numbers_items_in_order() {
        let levels = Enumeration::from_names(["Low", "Medium", "High"]);
        assert_eq!(levels.find_item_by_name("Low").map(|item| item.value), Some(0));
        assert_eq!(levels.find_item_by_name("High").map(|item| item.value), Some(2));
        assert!(Enumeration::new().is_empty());
    }
}
