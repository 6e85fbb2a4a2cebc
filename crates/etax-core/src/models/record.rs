//! Code record: one entry of a code list, hydrated or synthesized.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single code-list entry.
///
/// Records come from the reference store (`resolved == true`) or are
/// synthesized as placeholders when a code is unknown (`resolved == false`).
/// Equality covers every field, so a placeholder never equals the stored
/// record for the same code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    /// Canonical code in the list's case.
    pub code: String,

    /// English (or only) display name.
    pub display_name: String,

    /// Thai display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name_th: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Classification tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Classification predicates, in snake_case.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub flags: BTreeSet<String>,

    /// Whether the entry is active in the code list.
    #[serde(default = "default_active")]
    pub active: bool,

    /// True when the record came from the reference store.
    #[serde(default)]
    pub(crate) resolved: bool,
}

fn default_active() -> bool {
    true
}

impl CodeRecord {
    /// Create an active, unresolved record.
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            display_name_th: None,
            description: None,
            category: None,
            flags: BTreeSet::new(),
            active: true,
            resolved: false,
        }
    }

    /// Set the Thai display name.
    pub fn with_thai_name(mut self, name: impl Into<String>) -> Self {
        self.display_name_th = Some(name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Add a flag.
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    /// Set the active marker.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// True for records returned by a successful store lookup.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// True for synthesized placeholder records.
    pub fn is_placeholder(&self) -> bool {
        !self.resolved
    }

    /// Check a classification flag.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Display name for a language code, falling back to the English name.
    pub fn localized_name(&self, language: &str) -> &str {
        match self.display_name_th.as_deref() {
            Some(thai) if language.trim().eq_ignore_ascii_case("th") => thai,
            _ => &self.display_name,
        }
    }

    pub(crate) fn mark_resolved(mut self) -> Self {
        self.resolved = true;
        self
    }
}
