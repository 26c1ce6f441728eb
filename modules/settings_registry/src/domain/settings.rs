//! Hierarchical settings registry
//!
//! Groups hold sections, sections hold settings, and every setting observes a property
//! owned elsewhere. The registry persists those properties through the active
//! [`ValueConversion`] under `"<group>/<section>/<property>"` keys.

use super::conversion::{DefaultValueConversion, ValueConversion};
use super::events::{PropertyEvent, Subscribers};
use super::property::Property;
use super::store::PersistentStore;
use super::validation::validate_identifier;
use crate::config::SettingsConfig;
use crate::contract::{
    GroupIndex, Identifier, ResetScope, SectionIndex, SettingIndex, SettingsError, Variant,
};
use std::rc::{Rc, Weak};

/// Key of the section that receives settings added without an explicit section
pub const DEFAULT_SECTION_KEY: &str = "DEFAULT";

type ResetFunction = Rc<dyn Fn()>;

struct ResetBinding {
    scope: ResetScope,
    callback: ResetFunction,
}

struct Section {
    identifier: Identifier,
    title: Option<String>,
    is_default: bool,
    settings: Vec<Weak<Property>>,
}

impl Section {
    fn new(identifier: Identifier, is_default: bool) -> Self {
        Self {
            identifier,
            title: None,
            is_default,
            settings: Vec::new(),
        }
    }
}

struct Group {
    identifier: Identifier,
    title: Option<String>,
    sections: Vec<Section>,
}

fn section_path(group: &Group, section: &Section) -> String {
    format!("{}/{}", group.identifier.key(), section.identifier.key())
}

fn title_or_text(title: Option<&str>, identifier: &Identifier) -> String {
    title.unwrap_or_else(|| identifier.text()).to_string()
}

/// Registry of persisted settings
///
/// Handles returned by the `add_*` operations are plain positions. They are checked
/// against the current tree on every access, and stay meaningful as long as no default
/// section gets inserted in front of existing ones.
pub struct Settings {
    groups: Vec<Group>,
    reset_bindings: Vec<ResetBinding>,
    store: Box<dyn PersistentStore>,
    conversion: Box<dyn ValueConversion>,
    observers: Rc<Subscribers>,
    config: SettingsConfig,
}

impl Settings {
    /// Registry persisting to `store`, with default configuration
    pub fn new(store: impl PersistentStore + 'static) -> Self {
        Self::with_config(store, SettingsConfig::default())
    }

    pub fn with_config(store: impl PersistentStore + 'static, config: SettingsConfig) -> Self {
        Self {
            groups: Vec::new(),
            reset_bindings: Vec::new(),
            store: Box::new(store),
            conversion: Box::new(DefaultValueConversion::new(
                config.double_precision,
                config.unit_schema,
            )),
            observers: Rc::new(Subscribers::new()),
            config,
        }
    }

    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    // ===== Tree construction =====

    /// Find or create the group with the key of `identifier`
    ///
    /// Adding an existing group again with a display text different from its key
    /// replaces the stored display text.
    pub fn add_group(
        &mut self,
        identifier: impl Into<Identifier>,
    ) -> Result<GroupIndex, SettingsError> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;

        if let Some(position) = self
            .groups
            .iter()
            .position(|group| group.identifier.key() == identifier.key())
        {
            if identifier.text() != identifier.key() {
                self.groups[position].identifier = identifier;
            }
            return Ok(GroupIndex::new(position));
        }

        let mut sections = Vec::new();
        if self.config.auto_default_section {
            sections.push(Section::new(Identifier::new(DEFAULT_SECTION_KEY), true));
        }
        tracing::debug!(group = identifier.key(), "group added");
        self.groups.push(Group {
            identifier,
            title: None,
            sections,
        });
        Ok(GroupIndex::new(self.groups.len() - 1))
    }

    /// Append a non-default section to `group`
    pub fn add_section(
        &mut self,
        group: GroupIndex,
        identifier: impl Into<Identifier>,
    ) -> Result<SectionIndex, SettingsError> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;

        let unique = self.config.unique_section_identifiers;
        let entry = self.group_mut(group)?;
        if unique
            && entry
                .sections
                .iter()
                .any(|section| section.identifier.key() == identifier.key())
        {
            return Err(SettingsError::DuplicateSection {
                group: entry.identifier.key().to_string(),
                section: identifier.key().to_string(),
            });
        }

        tracing::debug!(
            group = entry.identifier.key(),
            section = identifier.key(),
            "section added"
        );
        entry.sections.push(Section::new(identifier, false));
        Ok(SectionIndex::new(group, entry.sections.len() - 1))
    }

    /// Append `property` to the default section of `group`
    ///
    /// The default section is created when the group has none. When the group's first
    /// section is not the default one, a default section is inserted in front of it and
    /// the positions of the existing sections move up by one.
    pub fn add_setting_to_group(
        &mut self,
        property: &Rc<Property>,
        group: GroupIndex,
    ) -> Result<SettingIndex, SettingsError> {
        let entry = self.group_mut(group)?;
        let shifted = match entry.sections.first().map(|first| first.is_default) {
            Some(true) => false,
            Some(false) => {
                entry
                    .sections
                    .insert(0, Section::new(Identifier::new(DEFAULT_SECTION_KEY), true));
                true
            }
            None => {
                entry
                    .sections
                    .push(Section::new(Identifier::new(DEFAULT_SECTION_KEY), true));
                false
            }
        };

        if shifted {
            tracing::debug!(
                group = entry.identifier.key(),
                "default section inserted, existing section positions shifted"
            );
            self.shift_section_bindings(group);
        }

        self.add_setting(property, SectionIndex::new(group, 0))
    }

    /// Append `property` to `section`
    pub fn add_setting(
        &mut self,
        property: &Rc<Property>,
        section: SectionIndex,
    ) -> Result<SettingIndex, SettingsError> {
        let already_registered = self.find_property(property).is_some();
        let entry = self.section_mut(section)?;
        entry.settings.push(Rc::downgrade(property));
        let index = SettingIndex::new(section, entry.settings.len() - 1);

        if !already_registered {
            let relay = Rc::downgrade(&self.observers);
            property.subscribe(move |property, event| {
                if let Some(observers) = relay.upgrade() {
                    observers.notify(property, event);
                }
            });
        }
        Ok(index)
    }

    fn shift_section_bindings(&mut self, group: GroupIndex) {
        for binding in &mut self.reset_bindings {
            if let ResetScope::Section(section) = binding.scope {
                if section.group() == group {
                    binding.scope =
                        ResetScope::Section(SectionIndex::new(group, section.get() + 1));
                }
            }
        }
    }

    // ===== Persistence =====

    /// Restore every setting from the owned store
    pub fn load(&self) {
        self.load_from(self.store.as_ref(), |_| false);
    }

    /// Restore every setting not matched by `exclude` from `source`
    ///
    /// Keys missing from `source` leave their property unchanged, and a value that fails
    /// to convert only affects its own property.
    pub fn load_from(&self, source: &dyn PersistentStore, exclude: impl Fn(&Property) -> bool) {
        let mut loaded = 0usize;
        self.for_each_setting(|path, property| {
            if !exclude(property) && self.load_property_at(source, path, property) {
                loaded += 1;
            }
        });
        tracing::debug!(loaded, "settings loaded");
    }

    /// Restore one setting from the owned store
    pub fn load_property(&self, index: SettingIndex) -> Result<(), SettingsError> {
        self.load_property_from(self.store.as_ref(), index)
    }

    pub fn load_property_from(
        &self,
        source: &dyn PersistentStore,
        index: SettingIndex,
    ) -> Result<(), SettingsError> {
        let path = self.section_path(index.section())?;
        if let Some(property) = self.property(index)? {
            self.load_property_at(source, &path, &property);
        }
        Ok(())
    }

    fn load_property_at(
        &self,
        source: &dyn PersistentStore,
        section_path: &str,
        property: &Property,
    ) -> bool {
        let key = format!("{}/{}", section_path, property.key());
        match source.value(&key) {
            Some(variant) => self.conversion.from_variant(property, &variant),
            None => false,
        }
    }

    /// Write every setting to the owned store, then flush it
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_as(self.store.as_ref(), |_| false);
        self.store.sync()?;
        Ok(())
    }

    /// Write every setting not matched by `exclude` to `target`
    ///
    /// Existing keys are overwritten. A property that cannot be converted is written as
    /// [`Variant::Null`].
    pub fn save_as(&self, target: &dyn PersistentStore, exclude: impl Fn(&Property) -> bool) {
        let mut saved = 0usize;
        self.for_each_setting(|path, property| {
            if exclude(property) {
                return;
            }
            let key = format!("{}/{}", path, property.key());
            let variant = self.conversion.to_variant(property).unwrap_or_default();
            target.set_value(&key, variant);
            saved += 1;
        });
        tracing::debug!(saved, "settings saved");
    }

    /// Raw value stored under `key` in the owned store
    pub fn find_value_from_key(&self, key: &str) -> Option<Variant> {
        self.store.value(key)
    }

    fn for_each_setting(&self, mut f: impl FnMut(&str, &Property)) {
        for group in &self.groups {
            for section in &group.sections {
                let path = section_path(group, section);
                for setting in &section.settings {
                    match setting.upgrade() {
                        Some(property) => f(&path, &property),
                        None => tracing::warn!(section = %path, "skipping dropped property"),
                    }
                }
            }
        }
    }

    // ===== Lookup =====

    /// Position of `property` in the tree, first registration wins
    pub fn find_property(&self, property: &Property) -> Option<SettingIndex> {
        let target: *const Property = property;
        self.groups.iter().enumerate().find_map(|(g, group)| {
            group.sections.iter().enumerate().find_map(|(s, section)| {
                section
                    .settings
                    .iter()
                    .position(|setting| std::ptr::eq(setting.as_ptr(), target))
                    .map(|position| {
                        SettingIndex::new(SectionIndex::new(GroupIndex::new(g), s), position)
                    })
            })
        })
    }

    /// `"<group>/<section>"` prefix of the keys of the section's settings
    pub fn section_path(&self, index: SectionIndex) -> Result<String, SettingsError> {
        let group = self.group(index.group())?;
        let section = self.section(index)?;
        Ok(section_path(group, section))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group_identifier(&self, index: GroupIndex) -> Result<&Identifier, SettingsError> {
        Ok(&self.group(index)?.identifier)
    }

    /// Overridden title, or the display text of the group identifier
    pub fn group_title(&self, index: GroupIndex) -> Result<String, SettingsError> {
        let group = self.group(index)?;
        Ok(title_or_text(group.title.as_deref(), &group.identifier))
    }

    /// Override the group title, an empty title restores the identifier text
    pub fn set_group_title(
        &mut self,
        index: GroupIndex,
        title: impl Into<String>,
    ) -> Result<(), SettingsError> {
        let title = title.into();
        self.group_mut(index)?.title = (!title.is_empty()).then_some(title);
        Ok(())
    }

    pub fn section_count(&self, index: GroupIndex) -> Result<usize, SettingsError> {
        Ok(self.group(index)?.sections.len())
    }

    pub fn section_identifier(&self, index: SectionIndex) -> Result<&Identifier, SettingsError> {
        Ok(&self.section(index)?.identifier)
    }

    pub fn section_title(&self, index: SectionIndex) -> Result<String, SettingsError> {
        let section = self.section(index)?;
        Ok(title_or_text(section.title.as_deref(), &section.identifier))
    }

    pub fn set_section_title(
        &mut self,
        index: SectionIndex,
        title: impl Into<String>,
    ) -> Result<(), SettingsError> {
        let title = title.into();
        self.section_mut(index)?.title = (!title.is_empty()).then_some(title);
        Ok(())
    }

    pub fn is_default_group_section(&self, index: SectionIndex) -> Result<bool, SettingsError> {
        Ok(self.section(index)?.is_default)
    }

    pub fn setting_count(&self, index: SectionIndex) -> Result<usize, SettingsError> {
        Ok(self.section(index)?.settings.len())
    }

    /// Property of a setting, `None` once its owner dropped it
    pub fn property(&self, index: SettingIndex) -> Result<Option<Rc<Property>>, SettingsError> {
        self.section(index.section())?
            .settings
            .get(index.get())
            .map(Weak::upgrade)
            .ok_or(SettingsError::SettingOutOfRange(index))
    }

    fn group(&self, index: GroupIndex) -> Result<&Group, SettingsError> {
        self.groups
            .get(index.get())
            .ok_or(SettingsError::GroupOutOfRange(index))
    }

    fn group_mut(&mut self, index: GroupIndex) -> Result<&mut Group, SettingsError> {
        self.groups
            .get_mut(index.get())
            .ok_or(SettingsError::GroupOutOfRange(index))
    }

    fn section(&self, index: SectionIndex) -> Result<&Section, SettingsError> {
        self.group(index.group())?
            .sections
            .get(index.get())
            .ok_or(SettingsError::SectionOutOfRange(index))
    }

    fn section_mut(&mut self, index: SectionIndex) -> Result<&mut Section, SettingsError> {
        self.group_mut(index.group())?
            .sections
            .get_mut(index.get())
            .ok_or(SettingsError::SectionOutOfRange(index))
    }

    // ===== Reset =====

    /// Register a callback run by [`reset_all`](Self::reset_all) and
    /// [`reset_group`](Self::reset_group)
    pub fn add_group_reset_function(
        &mut self,
        index: GroupIndex,
        callback: impl Fn() + 'static,
    ) -> Result<(), SettingsError> {
        self.group(index)?;
        self.reset_bindings.push(ResetBinding {
            scope: ResetScope::Group(index),
            callback: Rc::new(callback),
        });
        Ok(())
    }

    /// Register a callback run by [`reset_all`](Self::reset_all), by
    /// [`reset_group`](Self::reset_group) for the section's group and by
    /// [`reset_section`](Self::reset_section) for that section
    pub fn add_section_reset_function(
        &mut self,
        index: SectionIndex,
        callback: impl Fn() + 'static,
    ) -> Result<(), SettingsError> {
        self.section(index)?;
        self.reset_bindings.push(ResetBinding {
            scope: ResetScope::Section(index),
            callback: Rc::new(callback),
        });
        Ok(())
    }

    pub fn reset_all(&self) {
        self.run_reset(|_| true);
    }

    pub fn reset_group(&self, index: GroupIndex) {
        self.run_reset(|scope| scope.group() == index);
    }

    pub fn reset_section(&self, index: SectionIndex) {
        self.run_reset(|scope| scope == ResetScope::Section(index));
    }

    fn run_reset(&self, matches: impl Fn(ResetScope) -> bool) {
        let callbacks: Vec<ResetFunction> = self
            .reset_bindings
            .iter()
            .filter(|binding| matches(binding.scope))
            .map(|binding| Rc::clone(&binding.callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    // ===== Collaborators =====

    pub fn value_conversion(&self) -> &dyn ValueConversion {
        self.conversion.as_ref()
    }

    pub fn set_value_conversion(&mut self, conversion: impl ValueConversion + 'static) {
        self.conversion = Box::new(conversion);
    }

    pub fn store(&self) -> &dyn PersistentStore {
        self.store.as_ref()
    }

    pub fn set_store(&mut self, store: impl PersistentStore + 'static) {
        self.store = Box::new(store);
    }

    /// Register a callback for change and enable events of every registered property
    pub fn subscribe(&self, observer: impl Fn(&Property, PropertyEvent) + 'static) {
        self.observers.subscribe(observer);
    }
}
