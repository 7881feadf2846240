//! Projection of raw species documents into their display shape.

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};

use taxon_core::{Document, DocumentStore, LanguageCode};

use crate::classes::ClassNames;
use crate::config::CatalogConfig;
use crate::images::ImageUrls;
use crate::localize;
use crate::observation::{ObservationStatus, first_observation};
use crate::record::{SpeciesView, fields};

/// Unlocalized names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScientificNames {
    pub name: String,
    pub family: String,
    pub class: String,
}

/// A species as shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesSummary {
    pub id: String,
    pub localized_name: String,
    pub localized_family: String,
    pub localized_class: String,
    pub scientific: ScientificNames,
    #[serde(rename = "thumbnailImageURL", skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Vec<String>,
    #[serde(flatten)]
    pub observation: ObservationStatus,
}

/// A species with its long-form content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDetail {
    #[serde(flatten)]
    pub summary: SpeciesSummary,
    pub info: Option<Map<String, Value>>,
    pub conservation: Option<String>,
    pub localized_summary: Vec<String>,
    pub localized_physical: Vec<String>,
    pub localized_habitat: Vec<String>,
    pub localized_distribution: Vec<String>,
    pub localized_behavior: Vec<String>,
}

/// Capitalize a class id for display as a scientific class: `AVES` becomes `Aves`.
pub fn scientific_class(class_id: &str) -> String {
    let mut chars = class_id.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Build the list shape of a document. Observation fields stay at their defaults.
pub fn summarize(
    doc: &Document,
    language: &LanguageCode,
    classes: &ClassNames,
    images: &dyn ImageUrls,
) -> SpeciesSummary {
    let view = SpeciesView::new(doc);
    let class_id = view.class_id().unwrap_or("");
    let image_refs = view.image_refs();

    SpeciesSummary {
        id: view.id().to_string(),
        localized_name: localize::text_or(view.field(fields::NAME), language, ""),
        localized_family: localize::text_or(view.field(fields::FAMILY), language, ""),
        localized_class: classes
            .label(class_id, language)
            .unwrap_or(class_id)
            .to_string(),
        scientific: ScientificNames {
            name: view.scientific_name().unwrap_or("").to_string(),
            family: view.scientific_family().unwrap_or("").to_string(),
            class: scientific_class(class_id),
        },
        thumbnail_image_url: image_refs.first().and_then(|r| images.thumbnail(r)),
        image_url: image_refs.iter().filter_map(|r| images.full(r)).collect(),
        observation: ObservationStatus::default(),
    }
}

/// Build the detailed shape of a document. Observation fields stay at their defaults.
pub fn describe(
    doc: &Document,
    language: &LanguageCode,
    classes: &ClassNames,
    images: &dyn ImageUrls,
) -> SpeciesDetail {
    let view = SpeciesView::new(doc);
    let paragraphs = |field: &str| localize::paragraphs(view.field(field), language);

    SpeciesDetail {
        summary: summarize(doc, language, classes, images),
        info: view.info().cloned(),
        conservation: view.conservation().map(str::to_string),
        localized_summary: paragraphs(fields::SUMMARY),
        localized_physical: paragraphs(fields::PHYSICAL),
        localized_habitat: paragraphs(fields::HABITAT),
        localized_distribution: paragraphs(fields::DISTRIBUTION),
        localized_behavior: paragraphs(fields::BEHAVIOR),
    }
}

/// Everything one request needs to project its records.
pub(crate) struct Projector<'a, S: ?Sized> {
    pub store: &'a S,
    pub config: &'a CatalogConfig,
    pub images: &'a dyn ImageUrls,
    pub classes: &'a ClassNames,
    pub language: &'a LanguageCode,
    pub uid: Option<&'a str>,
}

impl<S: DocumentStore + ?Sized> Projector<'_, S> {
    async fn observation(&self, doc: &Document) -> ObservationStatus {
        match self.uid {
            Some(uid) => {
                first_observation(
                    self.store,
                    &self.config.collections.observations,
                    &self.config.observations,
                    uid,
                    &doc.id,
                )
                .await
            }
            None => ObservationStatus::default(),
        }
    }

    async fn summary(&self, doc: &Document) -> SpeciesSummary {
        let mut summary = summarize(doc, self.language, self.classes, self.images);
        summary.observation = self.observation(doc).await;
        summary
    }

    /// Project a page concurrently, keeping input order.
    pub async fn summaries(&self, docs: &[Document]) -> Vec<SpeciesSummary> {
        join_all(docs.iter().map(|doc| self.summary(doc))).await
    }

    pub async fn detail(&self, doc: &Document) -> SpeciesDetail {
        let mut detail = describe(doc, self.language, self.classes, self.images);
        detail.summary.observation = self.observation(doc).await;
        detail
    }
}
