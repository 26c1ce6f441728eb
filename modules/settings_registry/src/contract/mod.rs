//! Contract layer - public types shared by the registry and its collaborators
//!
//! Identifiers, tree handles, the dynamic value used at the persistence boundary,
//! and the registry error type.

pub mod error;
pub mod model;
pub mod variant;

pub use error::SettingsError;
pub use model::{GroupIndex, Identifier, ResetScope, SectionIndex, SettingIndex};
pub use variant::Variant;
