//! Code resolution and bridging.

mod bridge;
pub mod diagnostics;
pub mod enum_names;
pub mod normalize;
mod resolver;
pub mod structured;

pub use bridge::{CodeBridge, LexicalValue};
pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticReason, DiagnosticSink, NullSink, TracingSink,
};
pub use enum_names::{EnumNaming, EnumSpec, EnumTable};
pub use normalize::normalize;
pub use resolver::Resolver;
pub use structured::{Classification, CodeParts, PrefixClass, StructuredSchema};

use crate::models::record::CodeRecord;

/// Entry points used by an XML binding layer.
///
/// Neither direction fails: absent input gives absent output, and unknown
/// codes come back as placeholders or as absent external values.
pub trait CodeAdapter {
    /// Record to lexical value, for marshalling.
    fn to_external(&self, record: Option<&CodeRecord>) -> Option<LexicalValue>;

    /// Lexical value to record, for unmarshalling.
    fn to_internal(&self, value: Option<&LexicalValue>) -> Option<CodeRecord>;
}
