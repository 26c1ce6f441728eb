//! Persistent key-value store trait
//!
//! The registry reads and writes settings through this interface.
//! Implementations are in infra/storage.

use crate::contract::Variant;
use anyhow::Result;
use std::sync::Arc;

/// Hierarchical string-keyed store (`"group/section/property"` keys)
///
/// Writes go to memory; `sync` makes them durable. I/O failures belong to `sync`
/// and to whatever opens the store.
pub trait PersistentStore: Send + Sync {
    /// Check whether a value is stored under `key`
    fn contains(&self, key: &str) -> bool;

    /// Value stored under `key`
    fn value(&self, key: &str) -> Option<Variant>;

    /// Store `value` under `key`, replacing any previous value
    fn set_value(&self, key: &str, value: Variant);

    /// Flush pending writes to the backing medium
    fn sync(&self) -> Result<()>;

    /// All stored keys, sorted
    fn keys(&self) -> Vec<String>;
}

impl<T: PersistentStore + ?Sized> PersistentStore for Arc<T> {
    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }

    fn value(&self, key: &str) -> Option<Variant> {
        (**self).value(key)
    }

    fn set_value(&self, key: &str, value: Variant) {
        (**self).set_value(key, value)
    }

    fn sync(&self) -> Result<()> {
        (**self).sync()
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}
