//! Lookup-or-placeholder resolution of raw codes.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::diagnostics::{Diagnostic, DiagnosticReason, DiagnosticSink, TracingSink};
use super::normalize::{is_blank, normalize};
use super::structured::{Classification, CodeParts};
use crate::error::StoreError;
use crate::models::policy::CodeListPolicy;
use crate::models::record::CodeRecord;
use crate::store::ReferenceStore;

/// Resolves raw codes of one code list into records.
///
/// Blank input resolves to `None`. Any other input resolves to a record:
/// the stored one on a hit, a placeholder otherwise. Resolution never fails;
/// misses and store errors are reported to the diagnostic sink instead.
///
/// A resolver is cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct Resolver {
    policy: Arc<CodeListPolicy>,
    store: Option<Arc<dyn ReferenceStore>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Resolver {
    /// Create a resolver without a store. Every code becomes a placeholder
    /// until a store is attached.
    pub fn new(policy: Arc<CodeListPolicy>) -> Self {
        Self {
            policy,
            store: None,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ReferenceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn policy(&self) -> &CodeListPolicy {
        &self.policy
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Canonical form of a raw code for this list.
    pub fn normalize(&self, raw: &str) -> String {
        normalize(raw, self.policy.case_rule)
    }

    /// Resolve a raw code.
    pub fn resolve(&self, raw: &str) -> Option<CodeRecord> {
        self.resolve_inner(raw, true)
    }

    /// Resolve an optional raw code; `None` stays `None`.
    pub fn resolve_opt(&self, raw: Option<&str>) -> Option<CodeRecord> {
        raw.and_then(|r| self.resolve(r))
    }

    /// The stored record for a code, without placeholder fallback or
    /// diagnostics.
    pub fn lookup(&self, raw: &str) -> Option<CodeRecord> {
        if is_blank(raw) {
            return None;
        }
        self.fetch(&self.normalize(raw)).ok()
    }

    /// True when the store knows the code.
    ///
    /// False for blank input, when no store is attached, and when the store
    /// fails. On active-only lists inactive rows are not valid.
    pub fn is_valid(&self, raw: &str) -> bool {
        if is_blank(raw) {
            return false;
        }
        if self.policy.active_only {
            return self.lookup(raw).is_some();
        }
        let Some(store) = &self.store else {
            return false;
        };
        let code = self.normalize(raw);
        store.exists(&self.policy.id, &code).unwrap_or_else(|e| {
            debug!("Existence check for {} '{}' failed: {}", self.policy.id, code, e);
            false
        })
    }

    /// Display name of the stored record; `None` on a miss.
    pub fn display_name(&self, raw: &str) -> Option<String> {
        self.lookup(raw).map(|r| r.display_name)
    }

    /// Thai display name of the stored record, if it has one.
    pub fn thai_name(&self, raw: &str) -> Option<String> {
        self.lookup(raw).and_then(|r| r.display_name_th)
    }

    pub fn has_flag(&self, raw: &str, flag: &str) -> bool {
        self.resolve_inner(raw, false).is_some_and(|r| r.has_flag(flag))
    }

    /// Prefix and suffix of a structured code.
    ///
    /// `None` for blank input or lists without a structure.
    pub fn decompose(&self, raw: &str) -> Option<CodeParts> {
        let schema = self.policy.structure.as_ref()?;
        if is_blank(raw) {
            return None;
        }
        Some(schema.decompose(&self.normalize(raw)))
    }

    /// Classification of a structured code from the schema tables alone.
    pub fn classify(&self, raw: &str) -> Option<Classification> {
        let schema = self.policy.structure.as_ref()?;
        if is_blank(raw) {
            return None;
        }
        Some(schema.classify_code(&self.normalize(raw)))
    }

    /// Build the placeholder record for a code.
    pub fn placeholder(&self, raw: &str) -> CodeRecord {
        let code = self.normalize(raw);
        let list = self.policy.name.as_str();
        let template = &self.policy.placeholder;

        let category = self
            .policy
            .structure
            .as_ref()
            .and_then(|schema| schema.classify_code(&code).category)
            .unwrap_or_else(|| template.category.clone());

        CodeRecord {
            display_name: template.render_name(list, &code),
            display_name_th: template.render_name_th(list, &code),
            description: template.render_description(list, &code),
            category: Some(category),
            flags: self.policy.derived_flags(&code),
            active: false,
            resolved: false,
            code,
        }
    }

    /// Send a diagnostic for this list to the sink.
    pub(crate) fn report(&self, raw: &str, reason: DiagnosticReason) {
        self.sink
            .report(&Diagnostic::new(self.policy.id.as_str(), raw, reason));
    }

    fn resolve_inner(&self, raw: &str, report: bool) -> Option<CodeRecord> {
        if is_blank(raw) {
            return None;
        }

        let code = self.normalize(raw);
        match self.fetch(&code) {
            Ok(record) => {
                debug!("Resolved {} '{}'", self.policy.id, code);
                Some(record)
            }
            Err(reason) => {
                if report {
                    self.report(raw, reason);
                }
                Some(self.placeholder(&code))
            }
        }
    }

    /// Query the store for a normalized code.
    fn fetch(&self, code: &str) -> Result<CodeRecord, DiagnosticReason> {
        let Some(store) = &self.store else {
            return Err(DiagnosticReason::GatewayUnavailable);
        };

        match store.find_by_code(&self.policy.id, code) {
            Ok(Some(record)) if self.policy.active_only && !record.active => {
                Err(DiagnosticReason::Inactive)
            }
            Ok(Some(record)) => Ok(self.hydrate(record)),
            Ok(None) if !self.policy.accepts_format(code) => Err(DiagnosticReason::Malformed),
            Ok(None) => Err(DiagnosticReason::NotFound),
            Err(StoreError::Unavailable) => Err(DiagnosticReason::GatewayUnavailable),
            Err(e) => Err(DiagnosticReason::LookupFailed(e.to_string())),
        }
    }

    fn hydrate(&self, mut record: CodeRecord) -> CodeRecord {
        let derived = self.policy.derived_flags(&record.code);
        record.flags.extend(derived);
        record.mark_resolved()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("list", &self.policy.id)
            .field("has_store", &self.has_store())
            .finish()
    }
}
