//! Lexical code normalization.

use crate::models::policy::CaseRule;

/// Trim a raw code and apply the list's case rule.
///
/// Blank input comes back empty; callers treat that as "no value".
pub fn normalize(raw: &str, rule: CaseRule) -> String {
    let trimmed = raw.trim();
    match rule {
        CaseRule::Upper => trimmed.to_uppercase(),
        CaseRule::Lower => trimmed.to_lowercase(),
        CaseRule::Preserve => trimmed.to_string(),
    }
}

/// True for empty or whitespace-only input.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Normalize an optional raw code, mapping blank input to `None`.
pub fn normalize_opt(raw: Option<&str>, rule: CaseRule) -> Option<String> {
    raw.filter(|r| !is_blank(r)).map(|r| normalize(r, rule))
}
