//! Typed view over raw species documents.

use serde_json::{Map, Value};

use taxon_core::{Document, LanguageCode};

/// Field names of species documents.
pub mod fields {
    pub const CLASS_ID: &str = "classId";
    pub const NAME: &str = "name";
    pub const FAMILY: &str = "family";
    pub const SCIENTIFIC_NAME: &str = "scientificName";
    pub const NAME_TOKENS: &str = "nameTokens";
    pub const SCIENTIFIC_TOKENS: &str = "scientificNameToken";
    pub const IMAGE_URL: &str = "imageURL";
    pub const SUMMARY: &str = "summary";
    pub const PHYSICAL: &str = "physicalDescription";
    pub const HABITAT: &str = "habitat";
    pub const DISTRIBUTION: &str = "distribution";
    pub const BEHAVIOR: &str = "behavior";
    pub const INFO: &str = "info";
    pub const CONSERVATION: &str = "conservation";

    /// Key of the unlocalized scientific family inside `family`.
    pub const SCIENTIFIC_FAMILY: &str = "scientific";

    /// Fields needed to filter and project list entries.
    pub const LIST_PROJECTION: [&str; 7] = [
        CLASS_ID,
        NAME,
        FAMILY,
        SCIENTIFIC_NAME,
        NAME_TOKENS,
        SCIENTIFIC_TOKENS,
        IMAGE_URL,
    ];

    /// Localized name field for a language, used as the sort field.
    pub fn localized_name(language: &str) -> String {
        format!("{}.{}", NAME, language)
    }

    /// Per-language search token array.
    pub fn name_tokens(language: &str) -> String {
        format!("{}.{}", NAME_TOKENS, language)
    }
}

/// Read-only accessors over a species document.
///
/// Every accessor tolerates missing or wrong-typed fields.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesView<'a> {
    doc: &'a Document,
}

impl<'a> SpeciesView<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    pub fn id(&self) -> &'a str {
        self.doc.id.as_str()
    }

    pub fn field(&self, name: &str) -> Option<&'a Value> {
        self.doc.get(name)
    }

    pub fn class_id(&self) -> Option<&'a str> {
        self.str_field(fields::CLASS_ID)
    }

    pub fn scientific_name(&self) -> Option<&'a str> {
        self.str_field(fields::SCIENTIFIC_NAME)
    }

    pub fn conservation(&self) -> Option<&'a str> {
        self.str_field(fields::CONSERVATION)
    }

    pub fn info(&self) -> Option<&'a Map<String, Value>> {
        self.field(fields::INFO).and_then(Value::as_object)
    }

    /// The unlocalized family name kept under `family.scientific`.
    pub fn scientific_family(&self) -> Option<&'a str> {
        self.field(fields::FAMILY)
            .and_then(|f| f.get(fields::SCIENTIFIC_FAMILY))
            .and_then(Value::as_str)
    }

    /// Search tokens for one language. No fallback to other languages.
    pub fn name_tokens(
        &self,
        language: &LanguageCode,
    ) -> impl Iterator<Item = &'a str> + use<'a> {
        let tokens = self
            .field(fields::NAME_TOKENS)
            .and_then(|t| t.get(language.as_str()));
        string_items(tokens)
    }

    pub fn scientific_tokens(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        string_items(self.field(fields::SCIENTIFIC_TOKENS))
    }

    /// Image references in stored order, skipping blanks and non-strings.
    pub fn image_refs(&self) -> Vec<&'a str> {
        string_items(self.field(fields::IMAGE_URL))
            .filter(|r| !r.trim().is_empty())
            .collect()
    }

    fn str_field(&self, name: &str) -> Option<&'a str> {
        self.field(name).and_then(Value::as_str)
    }
}

fn string_items(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}
