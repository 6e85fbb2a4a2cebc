//! Translation between canonical codes and XML-binding enum constant names.
//!
//! Lists whose schema type is an enumeration expose constants such as `TH`
//! or `DBNG_01`. Each list gets a small bidirectional table built
//! from its known codes and a naming rule.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a canonical code is spelled as an enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum EnumNaming {
    /// Constant equals the code (`TH`).
    Identity,
    /// Separator inserted after `at` characters (`DBNG01` -> `DBNG_01`).
    Separator { at: usize, separator: String },
}

impl EnumNaming {
    /// Apply the rule to a code.
    pub fn to_constant(&self, code: &str) -> String {
        match self {
            Self::Identity => code.to_string(),
            Self::Separator { at, separator } => match code.char_indices().nth(*at) {
                Some((split, _)) => format!("{}{}{}", &code[..split], separator, &code[split..]),
                None => code.to_string(),
            },
        }
    }

    /// Reverse the rule.
    pub fn to_code(&self, constant: &str) -> String {
        match self {
            Self::Identity => constant.to_string(),
            Self::Separator { at, separator } => match constant.char_indices().nth(*at) {
                Some((split, _)) if constant[split..].starts_with(separator.as_str()) => {
                    format!("{}{}", &constant[..split], &constant[split + separator.len()..])
                }
                _ => constant.to_string(),
            },
        }
    }
}

/// Enum description as it appears in a code-list policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSpec {
    /// Naming rule for constants.
    pub naming: EnumNaming,

    /// Codes that have a constant. Empty means every code does.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codes: Vec<String>,

    /// Explicit code -> constant pairs that bypass the naming rule.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, String>,
}

/// Bidirectional code <-> constant table.
#[derive(Debug, Clone)]
pub struct EnumTable {
    naming: EnumNaming,
    open: bool,
    constants: BTreeMap<String, String>,
    codes: BTreeMap<String, String>,
}

impl EnumTable {
    /// Build the table, rejecting two codes that map to the same constant.
    pub fn build(spec: &EnumSpec) -> Result<Self, String> {
        let mut constants = BTreeMap::new();
        let mut codes = BTreeMap::new();

        let listed = spec.codes.iter().map(|code| {
            let constant = spec
                .overrides
                .get(code)
                .cloned()
                .unwrap_or_else(|| spec.naming.to_constant(code));
            (code.clone(), constant)
        });
        let overrides = spec.overrides.iter().map(|(c, k)| (c.clone(), k.clone()));

        for (code, constant) in listed.chain(overrides) {
            if let Some(existing) = codes.get(&constant) {
                if existing != &code {
                    return Err(format!(
                        "codes '{existing}' and '{code}' both map to constant '{constant}'"
                    ));
                }
            }
            codes.insert(constant.clone(), code.clone());
            constants.insert(code, constant);
        }

        Ok(Self {
            naming: spec.naming.clone(),
            open: spec.codes.is_empty(),
            constants,
            codes,
        })
    }

    /// Constant for a canonical code, if one exists.
    pub fn to_constant(&self, code: &str) -> Option<String> {
        if let Some(constant) = self.constants.get(code) {
            return Some(constant.clone());
        }
        self.open.then(|| self.naming.to_constant(code))
    }

    /// Canonical code for a constant, if the constant is known.
    pub fn to_code(&self, constant: &str) -> Option<String> {
        if let Some(code) = self.codes.get(constant) {
            return Some(code.clone());
        }
        self.open.then(|| self.naming.to_code(constant))
    }

    /// Number of explicitly known constants.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// True when codes outside the listed set are translated by rule.
    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separator() -> EnumNaming {
        EnumNaming::Separator {
            at: 4,
            separator: "_".to_string(),
        }
    }

    #[test]
    fn test_separator_naming() {
        let naming = separator();
        assert_eq!(naming.to_constant("DBNG01"), "DBNG_01");
        assert_eq!(naming.to_code("DBNG_01"), "DBNG01");
        assert_eq!(naming.to_code("DBNG01"), "DBNG01");
    }

    #[test]
    fn test_naming_rules_from_json() {
        let naming: EnumNaming =
            serde_json::from_str(r#"{"rule": "separator", "at": 4, "separator": "_"}"#).unwrap();
        assert_eq!(naming, separator());

        let unknown = serde_json::from_str::<EnumNaming>(r#"{"rule": "digit_prefixed", "prefix": "VALUE_"}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn test_closed_table() {
        let table = EnumTable::build(&EnumSpec {
            naming: separator(),
            codes: vec!["DBNG01".to_string(), "TIVC01".to_string()],
            overrides: BTreeMap::new(),
        })
        .unwrap();

        assert_eq!(table.to_constant("DBNG01").as_deref(), Some("DBNG_01"));
        assert_eq!(table.to_code("TIVC_01").as_deref(), Some("TIVC01"));
        assert_eq!(table.to_constant("DBNS02"), None);
        assert_eq!(table.to_code("DBNS_02"), None);
        assert!(!table.is_open());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_open_table() {
        let table = EnumTable::build(&EnumSpec {
            naming: EnumNaming::Identity,
            codes: Vec::new(),
            overrides: BTreeMap::new(),
        })
        .unwrap();

        assert!(table.is_open());
        assert_eq!(table.to_constant("TH").as_deref(), Some("TH"));
        assert_eq!(table.to_code("US").as_deref(), Some("US"));
    }

    #[test]
    fn test_overrides_win() {
        let table = EnumTable::build(&EnumSpec {
            naming: EnumNaming::Identity,
            codes: vec!["1A".to_string()],
            overrides: BTreeMap::from([("1A".to_string(), "ONE_A".to_string())]),
        })
        .unwrap();

        assert_eq!(table.to_constant("1A").as_deref(), Some("ONE_A"));
        assert_eq!(table.to_code("ONE_A").as_deref(), Some("1A"));
    }

    #[test]
    fn test_collision_is_rejected() {
        let result = EnumTable::build(&EnumSpec {
            naming: EnumNaming::Identity,
            codes: vec!["AB".to_string()],
            overrides: BTreeMap::from([("CD".to_string(), "AB".to_string())]),
        });
        assert!(result.is_err());
    }
}
