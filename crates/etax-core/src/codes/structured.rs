//! Fixed-width composite codes such as `DBNG01`.
//!
//! A structured code is a category prefix followed by a function suffix.
//! The schema holds the split point plus the tables that map each facet to a
//! name, so classification never needs a store round-trip.

use std::collections::{BTreeMap, BTreeSet};

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

use crate::error::StructuredCodeError;

/// Name used for any facet that is not in the schema tables.
pub const UNKNOWN: &str = "Unknown";

/// Classification attached to a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixClass {
    /// Category, e.g. `Goods`.
    pub category: String,

    /// Document type, e.g. `DebitNote`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
}

/// Split points and lookup tables for one structured code list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSchema {
    /// Number of characters in the prefix.
    pub prefix_len: usize,

    /// Fixed suffix width, if the list has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix_len: Option<usize>,

    /// Prefix -> category/document type.
    #[serde(default)]
    pub prefixes: BTreeMap<String, PrefixClass>,

    /// Suffix -> function name.
    #[serde(default)]
    pub suffixes: BTreeMap<String, String>,
}

/// Prefix and suffix of a decomposed code.
///
/// Both parts are empty when the code is too short to split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeParts {
    pub prefix: String,
    pub suffix: String,
}

impl CodeParts {
    /// The sentinel returned for codes shorter than the prefix.
    pub fn unclassified() -> Self {
        Self::default()
    }

    pub fn is_unclassified(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

/// Facets derived from a code's prefix and suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl Classification {
    pub fn category_name(&self) -> &str {
        self.category.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn function_name(&self) -> &str {
        self.function.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn document_type_name(&self) -> &str {
        self.document_type.as_deref().unwrap_or(UNKNOWN)
    }

    /// True when at least one facet was found in the tables.
    pub fn is_classified(&self) -> bool {
        self.category.is_some() || self.function.is_some() || self.document_type.is_some()
    }

    /// Known facets as snake_case flags: `DebitNote` becomes `debit_note`.
    pub fn flags(&self) -> BTreeSet<String> {
        [&self.document_type, &self.category, &self.function]
            .into_iter()
            .flatten()
            .map(|name| name.to_snake_case())
            .collect()
    }
}

impl StructuredSchema {
    /// Split a code into prefix and suffix.
    pub fn decompose(&self, code: &str) -> CodeParts {
        // Split on a char boundary: codes are not guaranteed to be ASCII.
        match code.char_indices().nth(self.prefix_len) {
            Some((split, _)) => CodeParts {
                prefix: code[..split].to_string(),
                suffix: code[split..].to_string(),
            },
            None if code.chars().count() == self.prefix_len && self.prefix_len > 0 => CodeParts {
                prefix: code.to_string(),
                suffix: String::new(),
            },
            None => CodeParts::unclassified(),
        }
    }

    /// Join a prefix and a suffix into a code.
    pub fn compose(&self, prefix: &str, suffix: &str) -> Result<String, StructuredCodeError> {
        if prefix.chars().count() != self.prefix_len {
            return Err(StructuredCodeError::PrefixLength {
                prefix: prefix.to_string(),
                expected: self.prefix_len,
            });
        }
        if suffix.is_empty() {
            return Err(StructuredCodeError::EmptySuffix);
        }
        if let Some(expected) = self.suffix_len {
            if suffix.chars().count() != expected {
                return Err(StructuredCodeError::SuffixLength {
                    suffix: suffix.to_string(),
                    expected,
                });
            }
        }
        Ok(format!("{prefix}{suffix}"))
    }

    /// Look up the prefix and suffix in the schema tables.
    pub fn classify(&self, prefix: &str, suffix: &str) -> Classification {
        let class = self.prefixes.get(prefix);
        Classification {
            document_type: class.and_then(|c| c.document_type.clone()),
            category: class.map(|c| c.category.clone()),
            function: self.suffixes.get(suffix).cloned(),
        }
    }

    /// Decompose and classify in one step.
    pub fn classify_code(&self, code: &str) -> Classification {
        let parts = self.decompose(code);
        if parts.is_unclassified() {
            return Classification::default();
        }
        self.classify(&parts.prefix, &parts.suffix)
    }

    /// Check table keys against the fixed widths.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.prefix_len == 0 {
            return Err("prefix_len must be positive".to_string());
        }
        if let Some(bad) = self
            .prefixes
            .keys()
            .find(|p| p.chars().count() != self.prefix_len)
        {
            return Err(format!("prefix '{bad}' does not match prefix_len {}", self.prefix_len));
        }
        if let Some(width) = self.suffix_len {
            if let Some(bad) = self.suffixes.keys().find(|s| s.chars().count() != width) {
                return Err(format!("suffix '{bad}' does not match suffix_len {width}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message_function_schema() -> StructuredSchema {
        let prefix = |category: &str, document_type: &str| PrefixClass {
            category: category.to_string(),
            document_type: Some(document_type.to_string()),
        };
        StructuredSchema {
            prefix_len: 4,
            suffix_len: Some(2),
            prefixes: BTreeMap::from([
                ("DBNG".to_string(), prefix("Goods", "DebitNote")),
                ("CDNS".to_string(), prefix("Service", "CreditNote")),
                ("TIVC".to_string(), prefix("Invoice", "TaxInvoice")),
            ]),
            suffixes: BTreeMap::from([
                ("01".to_string(), "Original".to_string()),
                ("03".to_string(), "Cancellation".to_string()),
                ("99".to_string(), "Other".to_string()),
            ]),
        }
    }

    #[test]
    fn test_decompose_debit_note_goods() {
        let schema = message_function_schema();
        let parts = schema.decompose("DBNG01");
        assert_eq!(parts.prefix, "DBNG");
        assert_eq!(parts.suffix, "01");

        let class = schema.classify(&parts.prefix, &parts.suffix);
        assert_eq!(class.category_name(), "Goods");
        assert_eq!(class.function_name(), "Original");
        assert_eq!(class.document_type_name(), "DebitNote");
    }

    #[test]
    fn test_short_code_is_unclassified() {
        let schema = message_function_schema();
        let parts = schema.decompose("DBN");
        assert!(parts.is_unclassified());

        let class = schema.classify_code("DBN");
        assert!(!class.is_classified());
        assert_eq!(class.category_name(), UNKNOWN);
        assert!(class.flags().is_empty());
    }

    #[test]
    fn test_unknown_facets_map_to_unknown() {
        let schema = message_function_schema();
        let class = schema.classify_code("ABSC05");
        assert_eq!(class.category_name(), UNKNOWN);
        assert_eq!(class.function_name(), UNKNOWN);

        let partial = schema.classify_code("TIVC42");
        assert_eq!(partial.category_name(), "Invoice");
        assert_eq!(partial.function_name(), UNKNOWN);
    }

    #[test]
    fn test_compose_decompose_round_trip() {
        let schema = message_function_schema();
        for prefix in schema.prefixes.keys() {
            for suffix in schema.suffixes.keys() {
                let code = schema.compose(prefix, suffix).unwrap();
                let parts = schema.decompose(&code);
                assert_eq!((parts.prefix.as_str(), parts.suffix.as_str()), (prefix.as_str(), suffix.as_str()));
            }
        }
    }

    #[test]
    fn test_compose_rejects_bad_widths() {
        let schema = message_function_schema();
        assert!(matches!(
            schema.compose("DBN", "01"),
            Err(StructuredCodeError::PrefixLength { expected: 4, .. })
        ));
        assert!(matches!(
            schema.compose("DBNG", "1"),
            Err(StructuredCodeError::SuffixLength { expected: 2, .. })
        ));
        assert_eq!(schema.compose("DBNG", ""), Err(StructuredCodeError::EmptySuffix));
    }

    #[test]
    fn test_flags_are_snake_case() {
        let schema = message_function_schema();
        let flags = schema.classify_code("CDNS03").flags();
        let expected: BTreeSet<String> = ["credit_note", "service", "cancellation"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(flags, expected);
    }

    #[test]
    fn test_decompose_non_ascii() {
        let schema = StructuredSchema {
            prefix_len: 2,
            suffix_len: None,
            prefixes: BTreeMap::new(),
            suffixes: BTreeMap::new(),
        };
        let parts = schema.decompose("กข01");
        assert_eq!(parts.prefix, "กข");
        assert_eq!(parts.suffix, "01");
    }

    #[test]
    fn test_validate_table_widths() {
        let mut schema = message_function_schema();
        assert!(schema.validate().is_ok());

        schema.suffixes.insert("100".to_string(), "Bad".to_string());
        assert!(schema.validate().is_err());
    }
}
