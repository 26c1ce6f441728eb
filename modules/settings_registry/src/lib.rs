//! Settings Registry
//!
//! Typed, observable properties bound to a hierarchical settings tree
//! (group → section → setting) and persisted through a pluggable value conversion
//! layer, with unit-aware quantities.

// Public exports
pub mod contract;
pub use contract::{
    GroupIndex, Identifier, ResetScope, SectionIndex, SettingIndex, SettingsError, Variant,
};

pub mod config;
pub use config::SettingsConfig;

pub mod domain;
pub use domain::{
    DefaultValueConversion, Enumeration, PersistentStore, Property, PropertyEvent,
    PropertyGroup, PropertyValue, Settings, Unit, UnitSchema, ValueConversion,
};

pub mod infra;
pub use infra::storage::{JsonFileStore, MemoryStore};

mod module;
