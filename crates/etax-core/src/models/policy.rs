//! Code-list policies: the data that parameterizes the generic resolver.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codes::enum_names::{EnumSpec, EnumTable};
use crate::codes::structured::{StructuredSchema, UNKNOWN};
use crate::error::CatalogError;

/// Case folding applied to codes before lookup and storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseRule {
    /// Upper-case (most UN/CEFACT and ISO lists).
    #[default]
    Upper,
    /// Lower-case (ISO 639 language codes).
    Lower,
    /// Trim only.
    #[serde(rename = "none")]
    Preserve,
}

/// Templates for synthesized placeholder records.
///
/// `{code}` and `{list}` are substituted when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderTemplate {
    /// English display name.
    pub name: String,

    /// Thai display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_th: Option<String>,

    /// Description stored on the placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category used when nothing better can be derived from the code.
    pub category: String,
}

const DEFAULT_PLACEHOLDER_NAME: &str = "Unknown {list}: {code}";

impl Default for PlaceholderTemplate {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLACEHOLDER_NAME.to_string(),
            name_th: None,
            description: None,
            category: UNKNOWN.to_string(),
        }
    }
}

impl PlaceholderTemplate {
    /// Render the English name; an empty template falls back to the default.
    pub fn render_name(&self, list: &str, code: &str) -> String {
        let rendered = render(&self.name, list, code);
        if rendered.trim().is_empty() {
            render(DEFAULT_PLACEHOLDER_NAME, list, code)
        } else {
            rendered
        }
    }

    pub fn render_name_th(&self, list: &str, code: &str) -> Option<String> {
        self.name_th.as_deref().map(|t| render(t, list, code))
    }

    pub fn render_description(&self, list: &str, code: &str) -> Option<String> {
        self.description.as_deref().map(|t| render(t, list, code))
    }
}

fn render(template: &str, list: &str, code: &str) -> String {
    template.replace("{list}", list).replace("{code}", code)
}

/// Publication metadata of a code list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeListVersion {
    /// Maintaining agency, e.g. `ISO`, `UNECE`, `ETDA`.
    pub agency: String,

    /// Code list identifier as used in schema names.
    pub list_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,

    /// XML namespace of the list's schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Expected shape of a normalized code, matched against the whole code.
#[derive(Clone)]
pub struct CodeFormat {
    pattern: String,
    regex: Regex,
}

impl CodeFormat {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, code: &str) -> bool {
        self.regex.is_match(code)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Debug for CodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodeFormat").field(&self.pattern).finish()
    }
}

impl PartialEq for CodeFormat {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for CodeFormat {}

impl Serialize for CodeFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

impl<'de> Deserialize<'de> for CodeFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        CodeFormat::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// Which codes a flag rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeMatcher {
    OneOf(Vec<String>),
    Prefix(String),
    Suffix(String),
}

impl CodeMatcher {
    pub fn matches(&self, code: &str) -> bool {
        match self {
            Self::OneOf(codes) => codes.iter().any(|c| c == code),
            Self::Prefix(prefix) => code.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => code.ends_with(suffix.as_str()),
        }
    }
}

/// Derives a flag from the code alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRule {
    pub flag: String,
    pub when: CodeMatcher,
}

/// Everything that distinguishes one code list from another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeListPolicy {
    /// Stable identifier, e.g. `country`.
    pub id: String,

    /// Human-readable list name used in placeholders and diagnostics.
    pub name: String,

    #[serde(default)]
    pub case_rule: CaseRule,

    #[serde(default)]
    pub placeholder: PlaceholderTemplate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<CodeListVersion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<CodeFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<StructuredSchema>,

    /// Present when the XML form is an enumerated constant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<EnumSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flag_rules: Vec<FlagRule>,

    /// Treat inactive store rows as unknown.
    #[serde(default)]
    pub active_only: bool,
}

impl CodeListPolicy {
    /// A policy with default placeholder template and upper-case codes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            case_rule: CaseRule::default(),
            placeholder: PlaceholderTemplate::default(),
            version: None,
            format: None,
            structure: None,
            enumeration: None,
            flag_rules: Vec::new(),
            active_only: false,
        }
    }

    pub fn with_case_rule(mut self, rule: CaseRule) -> Self {
        self.case_rule = rule;
        self
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderTemplate) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_format(mut self, format: CodeFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_structure(mut self, schema: StructuredSchema) -> Self {
        self.structure = Some(schema);
        self
    }

    pub fn with_enumeration(mut self, spec: EnumSpec) -> Self {
        self.enumeration = Some(spec);
        self
    }

    pub fn with_flag_rule(mut self, flag: impl Into<String>, when: CodeMatcher) -> Self {
        self.flag_rules.push(FlagRule {
            flag: flag.into(),
            when,
        });
        self
    }

    pub fn with_active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    /// True when the list has no format or the code matches it.
    pub fn accepts_format(&self, code: &str) -> bool {
        self.format.as_ref().is_none_or(|f| f.is_match(code))
    }

    /// True when the XML form is an enumerated constant.
    pub fn uses_enum_constants(&self) -> bool {
        self.enumeration.is_some()
    }

    /// Flags derivable from the normalized code without a store hit.
    pub fn derived_flags(&self, code: &str) -> BTreeSet<String> {
        let mut flags: BTreeSet<String> = self
            .flag_rules
            .iter()
            .filter(|rule| rule.when.matches(code))
            .map(|rule| rule.flag.clone())
            .collect();
        if let Some(schema) = &self.structure {
            flags.extend(schema.classify_code(code).flags());
        }
        flags
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidPolicy {
            list: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        if let Some(schema) = &self.structure {
            schema.validate().map_err(invalid)?;
        }
        if let Some(spec) = &self.enumeration {
            EnumTable::build(spec).map_err(invalid)?;
        }
        if let Some(rule) = self.flag_rules.iter().find(|r| r.flag.trim().is_empty()) {
            return Err(invalid(format!("flag rule {:?} has an empty flag", rule.when)));
        }
        Ok(())
    }
}
