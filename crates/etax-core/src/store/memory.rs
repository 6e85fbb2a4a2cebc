//! In-memory reference store.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{Dataset, ReferenceStore, Result};
use crate::models::record::CodeRecord;

/// Reference store holding every list in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    lists: HashMap<String, BTreeMap<String, CodeRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a dataset. Codes are taken as-is; canonicalize the
    /// dataset first if it may contain non-canonical spellings.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut store = Self::new();
        store.load(dataset);
        store
    }

    /// Add every record of a dataset, replacing existing codes.
    pub fn load(&mut self, dataset: &Dataset) {
        for (list, records) in &dataset.lists {
            self.extend(list, records.iter().cloned());
        }
        debug!("Loaded {} records into memory store", dataset.len());
    }

    /// Insert one record, returning the record it replaced.
    pub fn insert(&mut self, list: &str, record: CodeRecord) -> Option<CodeRecord> {
        self.lists
            .entry(list.to_string())
            .or_default()
            .insert(record.code.clone(), record)
    }

    pub fn extend(&mut self, list: &str, records: impl IntoIterator<Item = CodeRecord>) {
        let entries = self.lists.entry(list.to_string()).or_default();
        for record in records {
            entries.insert(record.code.clone(), record);
        }
    }

    /// Total number of records across all lists.
    pub fn len(&self) -> usize {
        self.lists.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records in one list.
    pub fn list_len(&self, list: &str) -> usize {
        self.lists.get(list).map_or(0, BTreeMap::len)
    }

    /// List ids with at least one record, sorted.
    pub fn lists(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.lists.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Codes of one list in order.
    pub fn codes(&self, list: &str) -> Vec<&str> {
        self.lists
            .get(list)
            .map(|records| records.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl ReferenceStore for MemoryStore {
    fn find_by_code(&self, list: &str, code: &str) -> Result<Option<CodeRecord>> {
        Ok(self.lists.get(list).and_then(|records| records.get(code)).cloned())
    }

    fn exists(&self, list: &str, code: &str) -> Result<bool> {
        Ok(self
            .lists
            .get(list)
            .is_some_and(|records| records.contains_key(code)))
    }
}
