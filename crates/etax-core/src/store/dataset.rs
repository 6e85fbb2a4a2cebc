//! JSON reference datasets.
//!
//! ```json
//! { "lists": { "country": [ { "code": "TH", "display_name": "THAILAND" } ] } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{embedded, Catalog};
use crate::codes::normalize::normalize;
use crate::error::Result;
use crate::models::record::CodeRecord;

/// Records grouped by list id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<CodeRecord>>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a dataset from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dataset = Self::from_json(&content)?;
        info!("Loaded dataset {} ({} records)", path.display(), dataset.len());
        Ok(dataset)
    }

    /// The ETDA-local lists shipped with the crate: Thai document names,
    /// Thai category codes and Thai message function codes.
    pub fn builtin() -> Result<Self> {
        Self::from_json(embedded::ETDA_DATASET)
    }

    /// Append the lists of another dataset.
    pub fn merge(&mut self, other: Dataset) {
        for (list, records) in other.lists {
            self.lists.entry(list).or_default().extend(records);
        }
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewrite every code in its list's canonical case and drop blank codes.
    ///
    /// Lists without a policy in `catalog` are only trimmed.
    pub fn canonicalize(&mut self, catalog: &Catalog) {
        for (list, records) in &mut self.lists {
            let rule = match catalog.get(list) {
                Some(policy) => policy.case_rule,
                None => {
                    warn!("Dataset list '{}' has no policy, codes kept as trimmed", list);
                    crate::models::policy::CaseRule::Preserve
                }
            };

            let before = records.len();
            records.retain(|r| !r.code.trim().is_empty());
            if records.len() != before {
                warn!("Dropped {} blank codes from list '{}'", before - records.len(), list);
            }
            for record in records.iter_mut() {
                record.code = normalize(&record.code, rule);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::policy::{CaseRule, CodeListPolicy};

    #[test]
    fn test_from_json() {
        let dataset = Dataset::from_json(
            r#"{"lists": {"country": [{"code": "TH", "display_name": "THAILAND"}]}}"#,
        )
        .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.lists["country"][0].code, "TH");
    }

    #[test]
    fn test_builtin_dataset_parses() {
        let dataset = Dataset::builtin().unwrap();
        assert!(dataset.lists.contains_key("thai_document_name"));
        assert!(dataset.lists.contains_key("thai_category"));
        assert!(dataset.lists.contains_key("thai_message_function"));
        assert!(dataset.lists["thai_message_function"].iter().any(|r| r.code == "DBNG01"));
    }

    #[test]
    fn test_canonicalize() {
        let mut catalog = Catalog::new();
        catalog
            .insert(CodeListPolicy::new("language", "Language").with_case_rule(CaseRule::Lower))
            .unwrap();

        let mut dataset = Dataset::default();
        dataset.lists.insert(
            "language".to_string(),
            vec![
                CodeRecord::new(" TH ", "Thai"),
                CodeRecord::new("  ", "Blank"),
            ],
        );
        dataset
            .lists
            .insert("other".to_string(), vec![CodeRecord::new(" Ab ", "Other")]);

        dataset.canonicalize(&catalog);
        assert_eq!(dataset.lists["language"].len(), 1);
        assert_eq!(dataset.lists["language"][0].code, "th");
        assert_eq!(dataset.lists["other"][0].code, "Ab");
    }

    #[test]
    fn test_merge() {
        let mut a = Dataset::default();
        a.lists.insert("country".into(), vec![CodeRecord::new("TH", "THAILAND")]);
        let mut b = Dataset::default();
        b.lists.insert("country".into(), vec![CodeRecord::new("US", "UNITED STATES")]);
        a.merge(b);
        assert_eq!(a.lists["country"].len(), 2);
    }
}
