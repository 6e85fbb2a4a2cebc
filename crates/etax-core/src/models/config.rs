//! Configuration structures for code resolution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Main configuration for etax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtaxConfig {
    /// Code-list policy sources.
    pub catalog: CatalogConfig,

    /// Reference store configuration.
    pub store: StoreConfig,

    /// Diagnostic output.
    pub diagnostics: DiagnosticsConfig,

    /// XML element to code-list mapping used when scanning documents.
    pub scan: ScanConfig,
}

/// Where code-list policies come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Start from the built-in catalog.
    pub include_builtin: bool,

    /// Extra policy files, applied in order. Later files override earlier
    /// policies with the same id.
    pub policy_files: Vec<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            policy_files: Vec::new(),
        }
    }
}

/// In-memory reference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Attach a store at all. When false every code resolves to a
    /// placeholder.
    pub enabled: bool,

    /// Load the built-in ETDA dataset.
    pub include_builtin_dataset: bool,

    /// JSON datasets to load.
    pub datasets: Vec<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_builtin_dataset: true,
            datasets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Log a warning for every placeholder and translation miss.
    pub emit_warnings: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            emit_warnings: true,
        }
    }
}

/// Element paths mapped to code-list ids.
///
/// Keys are `/`-separated local element names matched against the end of
/// the element's path, so `TypeCode` matches any `TypeCode` while
/// `ApplicableTradeTax/TypeCode` only matches inside `ApplicableTradeTax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub elements: BTreeMap<String, String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let elements = [
            ("ExchangedDocument/TypeCode", "thai_document_name"),
            ("ExchangedDocument/PurposeCode", "thai_message_function"),
            ("ExchangedDocument/LanguageID", "language"),
            ("ApplicableTradeTax/TypeCode", "duty_tax_fee"),
            ("SpecifiedTradeAllowanceCharge/ReasonCode", "allowance_charge_reason"),
            ("CountryID", "country"),
            ("InvoiceCurrencyCode", "currency"),
            ("TaxCurrencyCode", "currency"),
            ("CountrySubDivisionID", "province"),
            ("CityName", "city"),
            ("CitySubDivisionName", "subdistrict"),
            ("ReferenceTypeCode", "reference_type"),
            ("DeliveryTypeCode", "delivery_terms"),
        ]
        .into_iter()
        .map(|(path, list)| (path.to_string(), list.to_string()))
        .collect();
        Self { elements }
    }
}

impl ScanConfig {
    /// Code list for an element path, preferring the most specific key.
    pub fn list_for<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        self.elements
            .iter()
            .filter(|(key, _)| path_ends_with(path, key))
            .max_by_key(|(key, _)| key.split('/').count())
            .map(|(_, list)| list.as_str())
    }
}

fn path_ends_with<S: AsRef<str>>(path: &[S], key: &str) -> bool {
    let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() || segments.len() > path.len() {
        return false;
    }
    path[path.len() - segments.len()..]
        .iter()
        .zip(&segments)
        .all(|(element, segment)| element.as_ref() == *segment)
}

impl EtaxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
