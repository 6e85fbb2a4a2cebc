//! Core library for Thai e-Tax Invoice code-list resolution.
//!
//! This crate provides:
//! - Code normalization per code-list case rule
//! - Lookup-or-placeholder resolution against a pluggable reference store
//! - Structured code decomposition (`DBNG01` -> `DBNG` + `01`)
//! - Bridging between XML lexical values and enum constants
//! - A built-in catalog of ISO, UNECE, ETDA and TISI code-list policies
//!
//! ```
//! use etax_core::{CodeRegistry, EtaxConfig};
//!
//! let registry = CodeRegistry::from_config(&EtaxConfig::default()).unwrap();
//! let record = registry.resolve("thai_document_name", " 388 ").unwrap().unwrap();
//! assert!(record.is_resolved());
//! assert_eq!(record.code, "388");
//! ```

pub mod catalog;
pub mod codes;
pub mod error;
pub mod models;
pub mod registry;
pub mod store;

pub use catalog::Catalog;
pub use codes::{
    Classification, CodeAdapter, CodeBridge, CodeParts, CollectingSink, Diagnostic,
    DiagnosticReason, DiagnosticSink, LexicalValue, NullSink, Resolver, StructuredSchema,
    TracingSink,
};
pub use error::{CatalogError, EtaxError, Result, StoreError, StructuredCodeError};
pub use models::{CaseRule, CodeListPolicy, CodeRecord, EtaxConfig};
pub use registry::CodeRegistry;
pub use store::{Dataset, MemoryStore, ReferenceStore};
