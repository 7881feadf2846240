//! Localized field resolution.
//!
//! Localized fields are objects keyed by language code. Resolution walks an
//! explicit chain: the requested language, then English. A value that is
//! null, an empty string, or an empty array counts as missing.

use serde_json::Value;

use taxon_core::LanguageCode;

/// Languages to try, in order, for a request in `language`.
pub fn fallback_chain(language: &LanguageCode) -> impl Iterator<Item = &str> {
    let english = (!language.is_english()).then_some(LanguageCode::ENGLISH);
    std::iter::once(language.as_str()).chain(english)
}

/// Resolve a localized field to the first present value along the chain.
pub fn resolve<'a>(field: Option<&'a Value>, language: &LanguageCode) -> Option<&'a Value> {
    let map = field?.as_object()?;
    fallback_chain(language)
        .filter_map(|code| map.get(code))
        .find(|value| !is_blank(value))
}

/// Resolve a localized string field.
///
/// Only string values count: a present but non-string value for the
/// requested language still falls through to English.
pub fn text<'a>(field: Option<&'a Value>, language: &LanguageCode) -> Option<&'a str> {
    let map = field?.as_object()?;
    fallback_chain(language)
        .filter_map(|code| map.get(code).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// Resolve a localized string field, or fall back to `default`.
pub fn text_or(field: Option<&Value>, language: &LanguageCode, default: &str) -> String {
    text(field, language).unwrap_or(default).to_string()
}

/// Resolve a localized long-form field into paragraphs.
///
/// A bare string becomes one paragraph, an array keeps its string
/// entries, and anything else yields no paragraphs.
pub fn paragraphs(field: Option<&Value>, language: &LanguageCode) -> Vec<String> {
    match resolve(field, language) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
