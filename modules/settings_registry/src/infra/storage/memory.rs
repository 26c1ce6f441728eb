//! In-memory store

use crate::contract::Variant;
use crate::domain::store::PersistentStore;
use anyhow::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Store kept entirely in memory, `sync` has nothing to flush
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, Variant>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl FromIterator<(String, Variant)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Variant)>>(iter: I) -> Self {
        Self {
            values: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl PersistentStore for MemoryStore {
    fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    fn value(&self, key: &str) -> Option<Variant> {
        self.values.read().get(key).cloned()
    }

    fn set_value(&self, key: &str, value: Variant) {
        self.values.write().insert(key.to_string(), value);
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }
}
