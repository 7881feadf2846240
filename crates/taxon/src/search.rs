//! Free-text search terms and the in-memory match filter.
//!
//! The store can only test exact array membership, so a query is split into
//! tokens here and re-checked against each fetched document with substring
//! semantics.

use taxon_core::query::MAX_MEMBERSHIP_VALUES;
use taxon_core::{Document, FieldFilter, LanguageCode};

use crate::localize;
use crate::record::{SpeciesView, fields};

/// Tokens parsed from a free-text query.
///
/// The last token is the one the user may still be typing; it is matched
/// as a substring of the displayed names. Every earlier token is required
/// to appear inside some search token of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    required: Vec<String>,
    partial: Option<String>,
}

impl SearchTerms {
    /// Tokenize a query: lowercase, trim, split on runs of whitespace,
    /// commas and hyphens, drop empties.
    pub fn parse(query: &str) -> Self {
        let lowered = query.trim().to_lowercase();
        let mut tokens: Vec<String> = lowered
            .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let partial = tokens.pop();

        Self {
            required: tokens,
            partial,
        }
    }

    /// Tokenize an optional query.
    pub fn from_query(query: Option<&str>) -> Self {
        query.map(Self::parse).unwrap_or_default()
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn partial(&self) -> Option<&str> {
        self.partial.as_deref()
    }

    /// True when the query produced no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.partial.is_none()
    }

    /// The required tokens the store is asked to pre-filter on.
    pub fn store_tokens(&self) -> &[String] {
        let n = self.required.len().min(MAX_MEMBERSHIP_VALUES);
        &self.required[..n]
    }

    /// Store-side pre-filter: any of the first ten required tokens is a
    /// member of the language's name tokens or the scientific tokens.
    pub fn store_filter(&self, language: &LanguageCode) -> Option<FieldFilter> {
        let tokens = self.store_tokens();
        if tokens.is_empty() {
            return None;
        }

        Some(FieldFilter::or(vec![
            FieldFilter::array_contains_any(
                fields::name_tokens(language.as_str()),
                tokens.to_vec(),
            ),
            FieldFilter::array_contains_any(fields::SCIENTIFIC_TOKENS, tokens.to_vec()),
        ]))
    }

    /// Application-side filter.
    ///
    /// Every required token must be a substring of some token in the union
    /// of the language's name tokens and the scientific tokens, and the
    /// partial token must be a substring of the localized or scientific
    /// name. Comparisons are case-insensitive.
    pub fn matches(&self, doc: &Document, language: &LanguageCode) -> bool {
        if self.is_empty() {
            return true;
        }

        let view = SpeciesView::new(doc);

        if !self.required.is_empty() {
            let record_tokens: Vec<String> = view
                .name_tokens(language)
                .chain(view.scientific_tokens())
                .map(str::to_lowercase)
                .collect();

            let all_found = self
                .required
                .iter()
                .all(|wanted| record_tokens.iter().any(|t| t.contains(wanted.as_str())));

            if !all_found {
                return false;
            }
        }

        match &self.partial {
            Some(partial) => {
                let name = localize::text(view.field(fields::NAME), language).unwrap_or("");
                let scientific = view.scientific_name().unwrap_or("");
                name.to_lowercase().contains(partial.as_str())
                    || scientific.to_lowercase().contains(partial.as_str())
            }
            None => true,
        }
    }
}
