//! Registry construction from configuration

use crate::config::SettingsConfig;
use crate::domain::Settings;
use crate::infra::storage::{JsonFileStore, MemoryStore};
use crate::contract::SettingsError;

impl Settings {
    /// Build a registry and its owned store from `config`
    ///
    /// The store is a [`JsonFileStore`] at `store_path` when one is set, a
    /// [`MemoryStore`] otherwise.
    pub fn from_config(config: &SettingsConfig) -> Result<Self, SettingsError> {
        let settings = match &config.store_path {
            Some(path) => {
                let store = JsonFileStore::open(path)?;
                tracing::info!(path = %path.display(), "settings registry initialized with file store");
                Self::with_config(store, config.clone())
            }
            None => {
                tracing::info!("settings registry initialized with in-memory store");
                Self::with_config(MemoryStore::new(), config.clone())
            }
        };
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(MemoryStore::new())
    }
}
