//! Reference store gateway.
//!
//! The resolver depends only on [`ReferenceStore`]; where the rows live is
//! up to the implementation. [`MemoryStore`] is the in-process backend fed
//! from JSON datasets.

mod dataset;
mod memory;

pub use dataset::Dataset;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::record::CodeRecord;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Query surface the resolver needs from a reference-data backend.
///
/// Codes arrive already normalized; implementations match them exactly.
/// The store is shared across threads after start-up and only read.
pub trait ReferenceStore: Send + Sync {
    /// Find the record for `code` in code list `list`.
    fn find_by_code(&self, list: &str, code: &str) -> Result<Option<CodeRecord>>;

    /// Check whether `code` exists in code list `list`.
    fn exists(&self, list: &str, code: &str) -> Result<bool> {
        Ok(self.find_by_code(list, code)?.is_some())
    }
}
