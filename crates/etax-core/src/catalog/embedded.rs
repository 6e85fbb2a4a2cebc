//! Reference data compiled into the library.
//!
//! Both files are plain JSON so they can be copied, edited and loaded back
//! through `policy_files` / `datasets` in the configuration.

/// Policies of every code list used in Thai e-Tax documents.
pub static CATALOG: &str = include_str!("../../data/catalog.json");

/// ETDA-maintained Thai lists: document names, category codes and message
/// function codes.
pub static ETDA_DATASET: &str = include_str!("../../data/etda.json");
