//! Common test utilities and a shared application settings tree

#![allow(dead_code)]

use parking_lot::RwLock;
use settings_registry::domain::{EnumValue, Enumeration, Quantity};
use settings_registry::{
    GroupIndex, PersistentStore, Property, SectionIndex, Settings, Unit, Variant,
};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

/// Realistic desktop application settings
/// application → DEFAULT (language, recentFiles)
/// meshing     → DEFAULT (chordalDeflection, displayMode), quality (angularDeflection)
pub struct ApplicationSettings {
    pub settings: Settings,
    pub application: GroupIndex,
    pub meshing: GroupIndex,
    pub quality: SectionIndex,
    pub language: Rc<Property>,
    pub recent_files: Rc<Property>,
    pub chordal_deflection: Rc<Property>,
    pub display_mode: Rc<Property>,
    pub angular_deflection: Rc<Property>,
}

impl ApplicationSettings {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(mut settings: Settings) -> Self {
        let modes = Arc::new(
            Enumeration::new()
                .with_item(1, "Wireframe")
                .with_item(2, "Shaded")
                .with_item(4, "ShadedWithEdges"),
        );

        let language = Property::new("language", "en");
        let recent_files = Property::new("recentFiles", Vec::<String>::new());
        let chordal_deflection =
            Property::new("chordalDeflection", Quantity::new(0.1, Unit::Millimeter));
        let display_mode = Property::new(
            "displayMode",
            EnumValue::new(modes, 2).expect("Shaded is an item"),
        );
        let angular_deflection =
            Property::new("angularDeflection", Quantity::new(20.0, Unit::Degree));

        let application = settings.add_group("application").unwrap();
        let meshing = settings.add_group("meshing").unwrap();
        let quality = settings.add_section(meshing, "quality").unwrap();

        settings.add_setting_to_group(&language, application).unwrap();
        settings.add_setting_to_group(&recent_files, application).unwrap();
        settings.add_setting_to_group(&chordal_deflection, meshing).unwrap();
        settings.add_setting_to_group(&display_mode, meshing).unwrap();
        settings.add_setting(&angular_deflection, quality).unwrap();

        Self {
            settings,
            application,
            meshing,
            quality,
            language,
            recent_files,
            chordal_deflection,
            display_mode,
            angular_deflection,
        }
    }

    /// Print the tree structure
    pub fn print_structure(&self) {
        println!("\n📊 Settings tree:");
        for g in 0..self.settings.group_count() {
            let group = GroupIndex::new(g);
            println!("   {}", self.settings.group_identifier(group).unwrap());
            for s in 0..self.settings.section_count(group).unwrap() {
                let section = SectionIndex::new(group, s);
                println!(
                    "   ├─ {} ({} settings)",
                    self.settings.section_identifier(section).unwrap(),
                    self.settings.setting_count(section).unwrap()
                );
            }
        }
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Store recording every write, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingStore {
    values: Arc<RwLock<BTreeMap<String, Variant>>>,
    writes: Arc<RwLock<Vec<String>>>,
    syncs: Arc<RwLock<usize>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.read().clone()
    }

    pub fn sync_count(&self) -> usize {
        *self.syncs.read()
    }

    /// Print verbose information about store state
    pub fn print_state(&self, context: &str) {
        let values = self.values.read();
        println!("\n========== Store State: {} ==========", context);
        println!("Total keys: {}", values.len());
        if values.is_empty() {
            println!("  (empty)");
        } else {
            for (key, value) in values.iter() {
                println!("  {} = {:?}", key, value);
            }
        }
        println!("=====================================\n");
    }
}

impl PersistentStore for RecordingStore {
    fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    fn value(&self, key: &str) -> Option<Variant> {
        self.values.read().get(key).cloned()
    }

    fn set_value(&self, key: &str, value: Variant) {
        self.writes.write().push(key.to_string());
        self.values.write().insert(key.to_string(), value);
    }

    fn sync(&self) -> anyhow::Result<()> {
        *self.syncs.write() += 1;
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }
}
