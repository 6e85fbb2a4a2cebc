//! Catalog of code-list policies.

pub mod embedded;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::models::policy::CodeListPolicy;

/// On-disk layout of a policy file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policies: Vec<CodeListPolicy>,
}

/// Policies keyed by list id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    policies: BTreeMap<String, Arc<CodeListPolicy>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the library.
    pub fn builtin() -> Result<Self> {
        Self::from_json(embedded::CATALOG)
    }

    /// Parse a policy file of the form `{"policies": [...]}`.
    ///
    /// Every policy is validated; a list id appearing twice is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PolicyFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for policy in file.policies {
            if catalog.policies.contains_key(&policy.id) {
                return Err(CatalogError::DuplicateList(policy.id).into());
            }
            catalog.insert(policy)?;
        }
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!("Loaded {} code-list policies from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Serialize to the policy-file layout.
    pub fn to_json(&self) -> Result<String> {
        let file = PolicyFile {
            policies: self.policies.values().map(|p| p.as_ref().clone()).collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Add or replace a policy after validating it.
    pub fn insert(&mut self, policy: CodeListPolicy) -> std::result::Result<(), CatalogError> {
        policy.validate()?;
        if self.policies.contains_key(&policy.id) {
            debug!("Replacing policy for {}", policy.id);
        }
        self.policies.insert(policy.id.clone(), Arc::new(policy));
        Ok(())
    }

    /// Add every policy of `other`, replacing policies with the same id.
    pub fn merge(&mut self, other: Catalog) {
        for (id, policy) in other.policies {
            if self.policies.insert(id.clone(), policy).is_some() {
                debug!("Policy {} overridden", id);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<CodeListPolicy>> {
        self.policies.get(id).cloned()
    }

    /// Like [`Catalog::get`], failing with [`CatalogError::UnknownList`].
    pub fn require(&self, id: &str) -> std::result::Result<Arc<CodeListPolicy>, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownList(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.policies.contains_key(id)
    }

    /// List ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodeListPolicy> {
        self.policies.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
