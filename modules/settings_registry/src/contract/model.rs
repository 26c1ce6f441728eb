//! Contract models for the settings registry
//!
//! Identifiers and the integer handles used to address the group/section/setting tree.
//! Handles are plain values: they stay meaningful only until the next structural mutation
//! that shifts positions, and every accessor re-validates them against the current tree.

use std::fmt;

/// Stable key plus human-readable display text
///
/// The key is what ends up in persisted setting paths, the text is what a UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    key: String,
    text: String,
}

impl Identifier {
    /// Create an identifier whose display text is the key itself
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            text: key.clone(),
            key,
        }
    }

    /// Create an identifier with a distinct display text
    pub fn with_text(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Non-empty and not made of whitespace only
    pub fn is_valid(&self) -> bool {
        !self.key.trim().is_empty()
    }
}

impl From<&str> for Identifier {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Identifier {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Position of a group in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupIndex(usize);

impl GroupIndex {
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group #{}", self.0)
    }
}

/// Position of a section inside a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionIndex {
    group: GroupIndex,
    position: usize,
}

impl SectionIndex {
    pub fn new(group: GroupIndex, position: usize) -> Self {
        Self { group, position }
    }

    pub fn group(self) -> GroupIndex {
        self.group
    }

    pub fn get(self) -> usize {
        self.position
    }
}

impl fmt::Display for SectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section #{} of {}", self.position, self.group)
    }
}

/// Position of a setting inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingIndex {
    section: SectionIndex,
    position: usize,
}

impl SettingIndex {
    pub fn new(section: SectionIndex, position: usize) -> Self {
        Self { section, position }
    }

    pub fn section(self) -> SectionIndex {
        self.section
    }

    pub fn group(self) -> GroupIndex {
        self.section.group()
    }

    pub fn get(self) -> usize {
        self.position
    }
}

impl fmt::Display for SettingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "setting #{} in {}", self.position, self.section)
    }
}

/// Scope a reset function is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Whole group
    Group(GroupIndex),
    /// One section of a group
    Section(SectionIndex),
}

impl ResetScope {
    /// Group the scope belongs to
    pub fn group(self) -> GroupIndex {
        match self {
            Self::Group(group) => group,
            Self::Section(section) => section.group(),
        }
    }
}
