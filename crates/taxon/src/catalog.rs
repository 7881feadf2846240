//! The catalog facade.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use taxon_core::error::InvalidInputError;
use taxon_core::query::MAX_IDS_PER_LOOKUP;
use taxon_core::{
    Clock, Document, DocumentId, DocumentStore, FieldFilter, LanguageCode, Query, Result,
    SystemClock,
};

use crate::classes::{ClassEntry, ClassNameCache, ClassNames, fetch_classes};
use crate::config::{CatalogConfig, ConfigError};
use crate::images::{CdnImageUrls, ImageUrls};
use crate::pagination::{PageRequest, PageScan, Pagination, PaginationResult, total_pages};
use crate::projector::{Projector, SpeciesDetail, SpeciesSummary};
use crate::record::fields;
use crate::search::SearchTerms;

/// Read access to the species catalog.
///
/// Cheap operations share one [`ClassNameCache`]; wrap the catalog in an
/// `Arc` to share it between tasks.
#[derive(Debug)]
pub struct Catalog<S> {
    store: Arc<S>,
    config: CatalogConfig,
    images: Arc<dyn ImageUrls>,
    classes: ClassNameCache,
}

impl<S: DocumentStore> Catalog<S> {
    /// Create a catalog using the system clock and CDN image templating.
    pub fn new(store: Arc<S>, config: CatalogConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create a catalog with an explicit clock for the class name cache.
    pub fn with_clock(
        store: Arc<S>,
        config: CatalogConfig,
        clock: Arc<dyn Clock>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let images = Arc::new(CdnImageUrls::new(&config.images)?);
        let classes = ClassNameCache::new(config.class_cache_ttl(), clock);

        Ok(Self {
            store,
            config,
            images,
            classes,
        })
    }

    /// Replace the image URL templating.
    pub fn with_image_urls(mut self, images: Arc<dyn ImageUrls>) -> Self {
        self.images = images;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Class names through the shared cache.
    pub async fn class_names(&self) -> Arc<ClassNames> {
        self.classes
            .get(self.store.as_ref(), &self.config.collections.classes)
            .await
    }

    fn projector<'a>(
        &'a self,
        classes: &'a ClassNames,
        language: &'a LanguageCode,
        uid: Option<&'a str>,
    ) -> Projector<'a, S> {
        Projector {
            store: self.store.as_ref(),
            config: &self.config,
            images: self.images.as_ref(),
            classes,
            language,
            uid,
        }
    }

    fn check_request(&self, req: &PageRequest) -> Result<()> {
        if req.page == 0 {
            return Err(InvalidInputError::Other {
                message: "page must be at least 1".to_string(),
            }
            .into());
        }

        if req.page_size == 0 || req.page_size > self.config.max_page_size {
            return Err(InvalidInputError::Other {
                message: format!(
                    "page size must be between 1 and {}",
                    self.config.max_page_size
                ),
            }
            .into());
        }

        Ok(())
    }

    /// List one page of species.
    ///
    /// Filters by class and free text, sorted by the localized name. The
    /// cursor is the id of the previous page's last record; an unknown
    /// cursor restarts from the beginning.
    #[instrument(
        skip(self, req),
        fields(page = req.page, page_size = req.page_size, language = %req.language)
    )]
    pub async fn list_species(
        &self,
        req: &PageRequest,
    ) -> Result<PaginationResult<SpeciesSummary>> {
        self.check_request(req)?;

        let species = &self.config.collections.species;
        let language = &req.language;
        let terms = SearchTerms::from_query(req.search_query.as_deref());

        let mut query = Query::collection(species.as_str())
            .order_by(fields::localized_name(language.as_str()))
            .select(fields::LIST_PROJECTION);
        if let Some(class_id) = req.class_filter() {
            query = query.filter(FieldFilter::eq(fields::CLASS_ID, class_id));
        }
        if let Some(filter) = terms.store_filter(language) {
            query = query.filter(filter);
        }

        let start = match &req.cursor {
            Some(id) => {
                let anchor = self.store.get(species, id).await?;
                if anchor.is_none() {
                    debug!(cursor = %id, "Cursor does not resolve, starting from the beginning");
                }
                anchor
            }
            None => None,
        };

        let outcome = PageScan {
            store: self.store.as_ref(),
            query: &query,
            terms: &terms,
            language,
            page_size: req.page_size as usize,
        }
        .run(start, req.cursor.as_ref())
        .await?;

        let total_items = self.store.count(&query).await?;

        debug!(
            rounds = outcome.rounds,
            items = outcome.page.len(),
            total_items,
            has_next_page = outcome.has_next_page,
            "Assembled page"
        );

        let classes = self.class_names().await;
        let items = self
            .projector(&classes, language, req.uid.as_deref())
            .summaries(&outcome.page)
            .await;

        Ok(PaginationResult {
            items,
            pagination: Pagination {
                total_items,
                current_page: req.page,
                page_size: req.page_size,
                total_pages: total_pages(total_items, req.page_size),
                last_visible_doc_id: outcome.next_cursor.map(String::from),
                has_next_page: outcome.has_next_page,
            },
        })
    }

    /// Fetch species by id, in the order requested.
    ///
    /// Only the first 30 distinct ids are looked up. Unknown ids are
    /// skipped. The result is a single, unpaginated page; when nothing
    /// resolves its page size is the length of `ids` as given.
    #[instrument(skip(self, ids, language), fields(requested = ids.len(), language = %language))]
    pub async fn species_by_ids(
        &self,
        ids: &[DocumentId],
        language: &LanguageCode,
        uid: Option<&str>,
    ) -> Result<PaginationResult<SpeciesSummary>> {
        if ids.is_empty() {
            return Ok(PaginationResult {
                items: Vec::new(),
                pagination: single_page(0, 0, None),
            });
        }

        let mut requested: Vec<DocumentId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !requested.contains(id) {
                requested.push(id.clone());
            }
        }
        if requested.len() > MAX_IDS_PER_LOOKUP {
            warn!(
                requested = requested.len(),
                limit = MAX_IDS_PER_LOOKUP,
                "Too many ids requested, truncating"
            );
            requested.truncate(MAX_IDS_PER_LOOKUP);
        }

        let mut by_id: HashMap<DocumentId, Document> = self
            .store
            .get_many(&self.config.collections.species, &requested)
            .await?
            .into_iter()
            .map(|doc| (doc.id.clone(), doc))
            .collect();

        let found: Vec<Document> = requested
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        if found.is_empty() {
            return Ok(PaginationResult {
                items: Vec::new(),
                pagination: single_page(0, ids.len() as u32, None),
            });
        }

        let classes = self.class_names().await;
        let items = self
            .projector(&classes, language, uid)
            .summaries(&found)
            .await;

        let last = items.last().map(|item| item.id.clone());
        let count = items.len();

        Ok(PaginationResult {
            items,
            pagination: single_page(count as u64, count as u32, last),
        })
    }

    /// Fetch one species with its long-form content, or `None` if the id
    /// does not resolve.
    #[instrument(skip(self, language), fields(language = %language))]
    pub async fn species_detail(
        &self,
        id: &DocumentId,
        language: &LanguageCode,
        uid: Option<&str>,
    ) -> Result<Option<SpeciesDetail>> {
        let Some(doc) = self
            .store
            .get(&self.config.collections.species, id)
            .await?
        else {
            return Ok(None);
        };

        let classes = self.class_names().await;
        let detail = self.projector(&classes, language, uid).detail(&doc).await;

        Ok(Some(detail))
    }

    /// The full class table, ordered by id. Store failures propagate.
    #[instrument(skip(self))]
    pub async fn list_classes(&self) -> Result<Vec<ClassEntry>> {
        fetch_classes(self.store.as_ref(), &self.config.collections.classes).await
    }
}

fn single_page(total_items: u64, page_size: u32, last: Option<String>) -> Pagination {
    Pagination {
        total_items,
        current_page: 1,
        page_size,
        total_pages: u64::from(total_items > 0),
        last_visible_doc_id: last,
        has_next_page: false,
    }
}
