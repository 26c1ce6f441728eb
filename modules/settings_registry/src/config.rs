//! Configuration for the settings registry

use crate::domain::unit_system::UnitSchema;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings registry configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// JSON file backing the registry's own store, in-memory store when absent
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Significant digits written for quantity values
    #[serde(default = "default_double_precision")]
    pub double_precision: usize,

    /// Unit schema quantities are persisted in
    #[serde(default)]
    pub unit_schema: UnitSchema,

    /// Create a default section along with every new group
    #[serde(default = "default_true")]
    pub auto_default_section: bool,

    /// Reject a section whose key is already used in the same group
    #[serde(default = "default_true")]
    pub unique_section_identifiers: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            double_precision: default_double_precision(),
            unit_schema: UnitSchema::default(),
            auto_default_section: true,
            unique_section_identifiers: true,
        }
    }
}

impl SettingsConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid settings registry configuration")
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    /// Per-user settings file, `None` when the platform has no config directory
    pub fn default_store_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("settings_registry").join("settings.json"))
    }
}

fn default_double_precision() -> usize {
    6
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = SettingsConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SettingsConfig::default());
        assert_eq!(config.double_precision, 6);
        assert_eq!(config.unit_schema, UnitSchema::Si);
        assert!(config.auto_default_section);
        assert!(config.unique_section_identifiers);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
store_path: /var/lib/app/settings.json
double_precision: 10
unit_schema: imperial_uk
auto_default_section: false
unique_section_identifiers: false
"#;
        let config = SettingsConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("/var/lib/app/settings.json")));
        assert_eq!(config.double_precision, 10);
        assert_eq!(config.unit_schema, UnitSchema::ImperialUk);
        assert!(!config.auto_default_section);
        assert!(!config.unique_section_identifiers);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SettingsConfig::from_yaml_str("retention_days: 30").unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"));
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.yaml");
        std::fs::write(&path, "double_precision: 3\n").unwrap();

        let config = SettingsConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.double_precision, 3);
        assert!(SettingsConfig::from_yaml_file(dir.path().join("missing.yaml")).is_err());
    }
}
