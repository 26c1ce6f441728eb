//! Identifier validation for groups and sections

use crate::contract::{Identifier, SettingsError};

/// Validate a group or section identifier
///
/// Rejects empty keys and keys made of whitespace only.
pub fn validate_identifier(identifier: &Identifier) -> Result<(), SettingsError> {
    if identifier.is_valid() {
        Ok(())
    } else {
        Err(SettingsError::InvalidIdentifier(identifier.key().to_string()))
    }
}
