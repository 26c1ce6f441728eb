//! Domain layer - properties, value conversion and the settings registry

pub mod conversion;
pub mod enumeration;
pub mod events;
pub mod property;
pub mod property_group;
pub mod settings;
pub mod store;
pub mod unit_system;
pub mod validation;
pub mod value;

pub use conversion::{ConversionError, DefaultValueConversion, ValueConversion};
pub use enumeration::{Enumeration, EnumerationItem};
pub use events::{Observer, PropertyEvent, Subscribers};
pub use property::{Property, PropertyError};
pub use property_group::PropertyGroup;
pub use settings::{Settings, DEFAULT_SECTION_KEY};
pub use store::PersistentStore;
pub use unit_system::{Dimension, ParsedQuantity, TranslateResult, Unit, UnitError, UnitSchema};
pub use value::{
    CheckState, Color, EnumValue, Point3, PropertyKind, PropertyValue, Quantity, Transform,
};
