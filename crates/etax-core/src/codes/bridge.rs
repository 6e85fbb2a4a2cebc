//! Conversion between XML lexical values and code records.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::diagnostics::DiagnosticReason;
use super::enum_names::EnumTable;
use super::normalize::is_blank;
use super::resolver::Resolver;
use super::CodeAdapter;
use crate::error::CatalogError;
use crate::models::record::CodeRecord;

/// A code as it appears in an XML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LexicalValue {
    /// Free-text element content.
    Text(String),
    /// Enum constant decoded by the binding layer, e.g. `DBNG_01`.
    Constant(String),
}

impl LexicalValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Constant(s) => s,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

/// Bidirectional adapter for one code list.
///
/// Lists with an enumeration in their policy marshal to
/// [`LexicalValue::Constant`]; all others marshal to
/// [`LexicalValue::Text`].
#[derive(Debug, Clone)]
pub struct CodeBridge {
    resolver: Resolver,
    constants: Option<EnumTable>,
}

impl CodeBridge {
    /// Wrap a resolver, building the list's constant table if it has one.
    pub fn new(resolver: Resolver) -> Result<Self, CatalogError> {
        let constants = match &resolver.policy().enumeration {
            Some(spec) => Some(EnumTable::build(spec).map_err(|reason| {
                CatalogError::InvalidPolicy {
                    list: resolver.policy().id.clone(),
                    reason,
                }
            })?),
            None => None,
        };
        Ok(Self {
            resolver,
            constants,
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn uses_constants(&self) -> bool {
        self.constants.is_some()
    }

    /// Enum constant for a raw code, without diagnostics.
    pub fn to_constant(&self, raw: &str) -> Option<String> {
        self.constants
            .as_ref()?
            .to_constant(&self.resolver.normalize(raw))
    }

    /// Canonical code for an enum constant, without diagnostics.
    pub fn from_constant(&self, constant: &str) -> Option<String> {
        self.constants.as_ref()?.to_code(constant.trim())
    }

    /// External form of a raw code.
    ///
    /// Blank input and codes without a constant give `None`; the latter is
    /// reported as `no enum constant`.
    pub fn encode(&self, raw: &str) -> Option<LexicalValue> {
        if is_blank(raw) {
            return None;
        }
        let code = self.resolver.normalize(raw);

        let Some(table) = &self.constants else {
            return Some(LexicalValue::Text(code));
        };
        match table.to_constant(&code) {
            Some(constant) => Some(LexicalValue::Constant(constant)),
            None => {
                self.resolver.report(raw, DiagnosticReason::NoEnumConstant);
                None
            }
        }
    }

    /// Record for an external value.
    ///
    /// An unknown constant is reported and then resolved as if it were the
    /// code itself, which yields a placeholder on any sane store.
    pub fn decode(&self, value: &LexicalValue) -> Option<CodeRecord> {
        match (value, &self.constants) {
            (LexicalValue::Constant(constant), Some(table)) => {
                if is_blank(constant) {
                    return None;
                }
                match table.to_code(constant.trim()) {
                    Some(code) => self.resolver.resolve(&code),
                    None => {
                        self.resolver
                            .report(constant, DiagnosticReason::UnknownEnumConstant);
                        self.resolver.resolve(constant)
                    }
                }
            }
            (value, _) => self.resolver.resolve(value.as_str()),
        }
    }
}

impl CodeAdapter for CodeBridge {
    fn to_external(&self, record: Option<&CodeRecord>) -> Option<LexicalValue> {
        let record = record?;
        debug!("Marshalling {} '{}'", self.resolver.policy().id, record.code);
        self.encode(&record.code)
    }

    fn to_internal(&self, value: Option<&LexicalValue>) -> Option<CodeRecord> {
        let value = value?;
        debug!("Unmarshalling {} {:?}", self.resolver.policy().id, value);
        self.decode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::diagnostics::CollectingSink;
    use crate::codes::enum_names::{EnumNaming, EnumSpec};
    use crate::models::policy::{CaseRule, CodeListPolicy};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn message_function_bridge() -> (CodeBridge, Arc<CollectingSink>) {
        let policy = CodeListPolicy::new("thai_message_function", "Message Function")
            .with_case_rule(CaseRule::Preserve)
            .with_enumeration(EnumSpec {
                naming: EnumNaming::Separator {
                    at: 4,
                    separator: "_".to_string(),
                },
                codes: vec!["DBNG01".into(), "TIVC01".into()],
                overrides: Default::default(),
            });

        let mut store = MemoryStore::new();
        store.insert("thai_message_function", CodeRecord::new("DBNG01", "Debit note goods"));
        store.insert("thai_message_function", CodeRecord::new("TIVC01", "Tax invoice"));

        let sink = Arc::new(CollectingSink::new());
        let resolver = Resolver::new(Arc::new(policy))
            .with_store(Arc::new(store))
            .with_sink(sink.clone());
        (CodeBridge::new(resolver).unwrap(), sink)
    }

    fn language_bridge() -> CodeBridge {
        let policy = CodeListPolicy::new("language", "Language").with_case_rule(CaseRule::Lower);
        let mut store = MemoryStore::new();
        store.insert("language", CodeRecord::new("th", "Thai"));
        let resolver = Resolver::new(Arc::new(policy))
            .with_store(Arc::new(store))
            .with_sink(Arc::new(CollectingSink::new()));
        CodeBridge::new(resolver).unwrap()
    }

    #[test]
    fn test_text_round_trip() {
        let bridge = language_bridge();
        let record = bridge.resolver().resolve("TH").unwrap();
        let external = bridge.to_external(Some(&record)).unwrap();
        assert_eq!(external, LexicalValue::Text("th".to_string()));

        let back = bridge.to_internal(Some(&external)).unwrap();
        assert_eq!(back.code, record.code);
        assert!(back.is_resolved());
    }

    #[test]
    fn test_constant_round_trip() {
        let (bridge, sink) = message_function_bridge();
        let record = bridge.resolver().resolve("DBNG01").unwrap();
        let external = bridge.to_external(Some(&record)).unwrap();
        assert_eq!(external, LexicalValue::Constant("DBNG_01".to_string()));

        let back = bridge.to_internal(Some(&external)).unwrap();
        assert_eq!(back, record);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_absent_values() {
        let (bridge, sink) = message_function_bridge();
        assert_eq!(bridge.to_external(None), None);
        assert_eq!(bridge.to_internal(None), None);
        assert_eq!(bridge.to_internal(Some(&LexicalValue::Constant(" ".into()))), None);
        assert_eq!(bridge.to_external(Some(&CodeRecord::new("  ", "blank"))), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_constant_fails_soft() {
        let (bridge, sink) = message_function_bridge();
        let placeholder = bridge.resolver().resolve("ABCD42").unwrap();
        sink.take();

        assert_eq!(bridge.to_external(Some(&placeholder)), None);
        let events = sink.take();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].reason, DiagnosticReason::NoEnumConstant);
    }

    #[test]
    fn test_unknown_constant_becomes_placeholder() {
        let (bridge, sink) = message_function_bridge();
        let record = bridge
            .to_internal(Some(&LexicalValue::Constant("XXXX_01".into())))
            .unwrap();
        assert!(record.is_placeholder());
        assert_eq!(record.code, "XXXX_01");

        let reasons: Vec<_> = sink.take().into_iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![DiagnosticReason::UnknownEnumConstant, DiagnosticReason::NotFound]
        );
    }

    #[test]
    fn test_text_accepted_by_enum_list() {
        let (bridge, _) = message_function_bridge();
        let record = bridge
            .to_internal(Some(&LexicalValue::Text("DBNG01".into())))
            .unwrap();
        assert!(record.is_resolved());
    }

    #[test]
    fn test_constant_helpers() {
        let (bridge, _) = message_function_bridge();
        assert_eq!(bridge.to_constant("TIVC01").as_deref(), Some("TIVC_01"));
        assert_eq!(bridge.from_constant("TIVC_01").as_deref(), Some("TIVC01"));
        assert_eq!(bridge.to_constant("ZZZZ01"), None);
        assert_eq!(language_bridge().to_constant("th"), None);
    }

    #[test]
    fn test_lexical_value_serde() {
        let json = serde_json::to_string(&LexicalValue::Constant("TH".into())).unwrap();
        assert_eq!(json, r#"{"kind":"constant","value":"TH"}"#);
    }
}
