//! Diagnostic events for codes that could not be resolved or translated.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;
use tracing::warn;

/// Why a conversion fell back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// Code is well-formed but not in the store.
    NotFound,
    /// Code does not match the list's format and is not in the store.
    Malformed,
    /// Store row exists but is inactive on an active-only list.
    Inactive,
    /// No store is configured or it reported itself unreachable.
    GatewayUnavailable,
    /// Store returned an error; treated as a miss.
    LookupFailed(String),
    /// Canonical code has no enum constant.
    NoEnumConstant,
    /// Enum constant is not in the list's table.
    UnknownEnumConstant,
}

impl fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Malformed => write!(f, "malformed code"),
            Self::Inactive => write!(f, "inactive"),
            Self::GatewayUnavailable => write!(f, "gateway unavailable"),
            Self::LookupFailed(cause) => write!(f, "lookup failed: {cause}"),
            Self::NoEnumConstant => write!(f, "no enum constant"),
            Self::UnknownEnumConstant => write!(f, "unknown enum constant"),
        }
    }
}

/// A structured warning `{list, raw_code, reason}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// List id.
    pub list: String,
    /// Value as received, before normalization.
    pub raw_code: String,
    pub reason: DiagnosticReason,
}

impl Diagnostic {
    pub fn new(list: impl Into<String>, raw_code: impl Into<String>, reason: DiagnosticReason) -> Self {
        Self {
            list: list.into(),
            raw_code: raw_code.into(),
            reason,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': {}", self.list, self.raw_code, self.reason)
    }
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Emits each diagnostic as a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        warn!(
            list = %diagnostic.list,
            raw_code = %diagnostic.raw_code,
            reason = %diagnostic.reason,
            "code fell back to placeholder or absent value"
        );
    }
}

/// Discards diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Keeps diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // Only whole pushes happen under the lock, so a poisoned vector is intact.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.lock().push(diagnostic.clone());
    }
}
