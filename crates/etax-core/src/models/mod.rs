//! Data models.

pub mod config;
pub mod policy;
pub mod record;

pub use config::{CatalogConfig, DiagnosticsConfig, EtaxConfig, ScanConfig, StoreConfig};
pub use policy::{
    CaseRule, CodeFormat, CodeListPolicy, CodeListVersion, CodeMatcher, FlagRule,
    PlaceholderTemplate,
};
pub use record::CodeRecord;
