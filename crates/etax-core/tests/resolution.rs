//! End-to-end resolution against the built-in catalog and dataset.

use std::sync::Arc;

use etax_core::codes::normalize::normalize;
use etax_core::{
    CaseRule, CodeAdapter, CodeRecord, CodeRegistry, CollectingSink, DiagnosticReason,
    EtaxConfig, LexicalValue, MemoryStore,
};
use pretty_assertions::assert_eq;

fn registry() -> (CodeRegistry, Arc<CollectingSink>) {
    let mut store = MemoryStore::new();
    store.insert("language", CodeRecord::new("th", "Thai").with_thai_name("ไทย"));
    store.insert("language", CodeRecord::new("en", "English"));
    store.insert("country", CodeRecord::new("TH", "THAILAND"));
    store.insert("country", CodeRecord::new("US", "UNITED STATES"));
    store.insert("currency", CodeRecord::new("THB", "Baht"));
    store.load(&etax_core::Dataset::builtin().unwrap());

    let sink = Arc::new(CollectingSink::new());
    let registry = CodeRegistry::new(etax_core::Catalog::builtin().unwrap())
        .with_store(Arc::new(store))
        .with_sink(sink.clone());
    (registry, sink)
}

#[test]
fn lower_case_language_resolves() {
    let (registry, sink) = registry();
    let record = registry.resolve("language", "th").unwrap().unwrap();
    assert_eq!(record.code, "th");
    assert!(record.is_resolved());
    assert!(record.has_flag("thai"));
    assert!(sink.is_empty());
}

#[test]
fn unknown_country_becomes_placeholder() {
    let (registry, sink) = registry();
    let record = registry.resolve("country", "XX").unwrap().unwrap();
    assert_eq!(record.code, "XX");
    assert!(!record.is_resolved());
    assert!(record.display_name.contains("XX"));
    assert_eq!(record.display_name, "Unknown Country: XX");

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reason, DiagnosticReason::NotFound);
}

#[test]
fn blank_input_is_absent_everywhere() {
    let (registry, sink) = registry();
    for list in registry.catalog().ids() {
        assert_eq!(registry.resolve(list, "").unwrap(), None, "list {list}");
        assert_eq!(registry.resolve(list, " \t ").unwrap(), None, "list {list}");
    }
    assert!(sink.is_empty());
}

#[test]
fn structured_message_function_code() {
    let (registry, _) = registry();
    let resolver = registry.resolver("thai_message_function").unwrap();

    let parts = resolver.decompose("DBNG01").unwrap();
    assert_eq!((parts.prefix.as_str(), parts.suffix.as_str()), ("DBNG", "01"));

    let class = resolver.classify("DBNG01").unwrap();
    assert_eq!(class.category_name(), "Goods");
    assert_eq!(class.function_name(), "Original");
    assert_eq!(class.document_type_name(), "DebitNote");

    let short = resolver.classify("DBN").unwrap();
    assert_eq!(short.category_name(), "Unknown");
    assert!(short.flags().is_empty());
}

#[test]
fn missing_gateway_reports_gateway_unavailable() {
    let mut config = EtaxConfig::default();
    config.store.enabled = false;
    let sink = Arc::new(CollectingSink::new());
    let registry = CodeRegistry::from_config(&config)
        .unwrap()
        .with_sink(sink.clone());

    let record = registry.resolve("country", "US").unwrap().unwrap();
    assert!(!record.is_resolved());

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reason, DiagnosticReason::GatewayUnavailable);
    assert_eq!(events[0].reason.to_string(), "gateway unavailable");
    assert_eq!(events[0].raw_code, "US");
}

#[test]
fn non_blank_input_is_never_absent() {
    let (registry, _) = registry();
    let samples = ["th", "TH", "XX", "zzz", "DBNG01", "ไม่มี", " 1 ", "T07", "_"];
    for list in registry.catalog().ids() {
        for sample in samples {
            let record = registry.resolve(list, sample).unwrap();
            let record = record.unwrap_or_else(|| panic!("{list} '{sample}' was absent"));
            if record.is_placeholder() {
                assert!(!record.display_name.trim().is_empty());
                assert!(!record.active);
            }
            assert!(!record.code.is_empty());
        }
    }
}

#[test]
fn case_policy_is_enforced() {
    let (registry, _) = registry();
    let lower = registry.resolve("country", "th").unwrap().unwrap();
    let upper = registry.resolve("country", "TH").unwrap().unwrap();
    assert_eq!(lower.code, upper.code);
    assert_eq!(lower, upper);

    let lang = registry.resolve("language", " EN ").unwrap().unwrap();
    assert_eq!(lang.code, "en");
}

#[test]
fn normalization_is_idempotent_for_every_policy() {
    let (registry, _) = registry();
    for policy in registry.catalog().iter() {
        for sample in [" th ", "DbNg01", "ใบกำกับ", "", "  X  "] {
            let once = normalize(sample, policy.case_rule);
            assert_eq!(normalize(&once, policy.case_rule), once);
        }
    }
    assert_eq!(
        registry.catalog().require("thai_category").unwrap().case_rule,
        CaseRule::Preserve
    );
}

#[test]
fn resolved_records_round_trip_through_bridges() {
    let (registry, sink) = registry();
    let cases = [
        ("country", "TH"),
        ("currency", "THB"),
        ("language", "th"),
        ("thai_document_name", "T05"),
        ("thai_category", "02"),
        ("thai_message_function", "TIVC01"),
        ("thai_message_function", "RCTC04"),
    ];
    for (list, code) in cases {
        let bridge = registry.bridge(list).unwrap();
        let record = bridge.resolver().resolve(code).unwrap();
        assert!(record.is_resolved(), "{list} {code}");

        let external = bridge.to_external(Some(&record)).unwrap();
        let back = bridge.to_internal(Some(&external)).unwrap();
        assert_eq!(back.code, record.code);
        assert!(back.is_resolved());
    }
    assert!(sink.is_empty());
}

#[test]
fn enum_lists_use_constants() {
    let (registry, _) = registry();
    let country = registry.bridge("country").unwrap();
    assert_eq!(country.encode("th"), Some(LexicalValue::Constant("TH".into())));

    let function = registry.bridge("thai_message_function").unwrap();
    assert_eq!(
        function.encode("CDNS05"),
        Some(LexicalValue::Constant("CDNS_05".into()))
    );

    let language = registry.bridge("language").unwrap();
    assert_eq!(language.encode("TH"), Some(LexicalValue::Text("th".into())));
}

#[test]
fn placeholder_without_constant_marshals_to_absent() {
    let (registry, sink) = registry();
    let bridge = registry.bridge("currency").unwrap();
    let placeholder = bridge.resolver().resolve("QQQ").unwrap();
    assert!(placeholder.is_placeholder());

    assert_eq!(bridge.to_external(Some(&placeholder)), None);
    let reasons: Vec<_> = sink.take().into_iter().map(|d| d.reason).collect();
    assert_eq!(
        reasons,
        vec![DiagnosticReason::NotFound, DiagnosticReason::NoEnumConstant]
    );
}

#[test]
fn thai_placeholders_are_bilingual() {
    let (registry, _) = registry();
    let record = registry.resolve("thai_document_name", "T99").unwrap().unwrap();
    assert_eq!(record.display_name, "Unknown Document Type: T99");
    assert_eq!(
        record.display_name_th.as_deref(),
        Some("ประเภทเอกสารไม่ทราบ: T99")
    );
    assert!(record.has_flag("thai_extension"));
    assert_eq!(record.localized_name("th"), "ประเภทเอกสารไม่ทราบ: T99");
}

#[test]
fn malformed_codes_are_reported_as_such() {
    let (registry, sink) = registry();
    let record = registry.resolve("currency", "TH").unwrap().unwrap();
    assert!(record.is_placeholder());
    assert_eq!(sink.take()[0].reason, DiagnosticReason::Malformed);
}

#[test]
fn inactive_tax_and_reference_rows_become_placeholders() {
    let mut store = MemoryStore::new();
    store.insert("duty_tax_fee", CodeRecord::new("VAT", "Value added tax").with_active(false));
    store.insert("duty_tax_fee", CodeRecord::new("EXC", "Excise duty"));
    store.insert("reference_type", CodeRecord::new("ON", "Order number").with_active(false));
    let sink = Arc::new(CollectingSink::new());
    let registry = CodeRegistry::new(etax_core::Catalog::builtin().unwrap())
        .with_store(Arc::new(store))
        .with_sink(sink.clone());

    let vat = registry.resolve("duty_tax_fee", "vat").unwrap().unwrap();
    assert!(vat.is_placeholder());
    assert_eq!(vat.display_name, "Unknown Duty Tax Fee Type: VAT");
    assert_eq!(
        vat.description.as_deref(),
        Some("Placeholder for unknown duty tax fee type code")
    );

    let on = registry.resolve("reference_type", "ON").unwrap().unwrap();
    assert!(on.is_placeholder());
    assert_eq!(
        on.description.as_deref(),
        Some("Placeholder for unknown reference type code")
    );

    let reasons: Vec<_> = sink.take().into_iter().map(|d| d.reason).collect();
    assert_eq!(reasons, vec![DiagnosticReason::Inactive, DiagnosticReason::Inactive]);

    let excise = registry.resolve("duty_tax_fee", "EXC").unwrap().unwrap();
    assert!(excise.is_resolved());
    assert!(!registry.resolver("duty_tax_fee").unwrap().is_valid("VAT"));
}

#[test]
fn name_helpers_are_absent_on_a_miss() {
    let (registry, sink) = registry();
    let language = registry.resolver("language").unwrap();
    assert_eq!(language.display_name("TH").as_deref(), Some("Thai"));
    assert_eq!(language.thai_name("th").as_deref(), Some("ไทย"));
    assert_eq!(language.display_name("zz"), None);
    assert_eq!(language.thai_name("en"), None);
    assert!(sink.is_empty());
}
