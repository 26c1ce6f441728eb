//! JSON file store
//!
//! The file holds one flat JSON object mapping setting keys to tagged values:
//!
//! ```json
//! {
//!   "application/DEFAULT/language": { "type": "string", "value": "en" }
//! }
//! ```

use crate::contract::Variant;
use crate::domain::store::PersistentStore;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Store backed by a JSON file
///
/// Values are read once by [`open`](Self::open) and written back by `sync`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Variant>>,
}

impl JsonFileStore {
    /// Open the store at `path`, a missing file gives an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse settings file {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read settings file {}", path.display()))
            }
        };

        tracing::debug!(path = %path.display(), entries = values.len(), "settings file opened");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistentStore for JsonFileStore {
    fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    fn value(&self, key: &str) -> Option<Variant> {
        self.values.read().get(key).cloned()
    }

    fn set_value(&self, key: &str, value: Variant) {
        self.values.write().insert(key.to_string(), value);
    }

    /// Write the whole map to a sibling temporary file, then move it over the target
    fn sync(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&*self.values.read())
            .context("failed to serialize settings")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "settings file written");
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }
}
