//! Contract error types for the settings registry

use super::model::{GroupIndex, SectionIndex, SettingIndex};

/// Settings registry errors
///
/// Structural misuse (invalid identifiers, stale handles) and store I/O failures.
/// Value conversion failures are not part of this type: they are logged and reported
/// as a `false` result by the conversion layer.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Identifier is empty or made of whitespace only
    #[error("invalid identifier '{0}': must not be empty or blank")]
    InvalidIdentifier(String),

    /// Section identifier already used in the group
    #[error("section '{section}' already exists in group '{group}'")]
    DuplicateSection {
        /// Group key
        group: String,
        /// Section key
        section: String,
    },

    #[error("no {0} in registry")]
    GroupOutOfRange(GroupIndex),

    #[error("no {0} in registry")]
    SectionOutOfRange(SectionIndex),

    #[error("no {0} in registry")]
    SettingOutOfRange(SettingIndex),

    /// Persistent store failure (read, parse or sync)
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SettingsError::InvalidIdentifier("  ".to_string());
        assert_eq!(err.to_string(), "invalid identifier '  ': must not be empty or blank");

        let err = SettingsError::DuplicateSection {
            group: "application".to_string(),
            section: "units".to_string(),
        };
        assert_eq!(err.to_string(), "section 'units' already exists in group 'application'");

        let err = SettingsError::SectionOutOfRange(SectionIndex::new(GroupIndex::new(1), 7));
        assert_eq!(err.to_string(), "no section #7 of group #1 in registry");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: SettingsError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, SettingsError::Store(_)));
        assert_eq!(err.to_string(), "disk full");
    }
}
