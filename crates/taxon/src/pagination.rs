//! Cursor-driven pagination over a store with limited query support.
//!
//! The store can filter by class and by exact token membership, and sort
//! by the localized name. Substring matching happens here, after each
//! fetch. A page is assembled by a bounded loop of fetch rounds:
//!
//! 1. fetch `page_size + 1` documents after the current anchor;
//! 2. keep the ones that pass [`SearchTerms::matches`];
//! 3. move the anchor to the last fetched document;
//! 4. stop when the store runs dry, when a round kept anything, or after
//!    [`MAX_FETCH_ROUNDS`] rounds.
//!
//! The extra document in each fetch tells whether more data may follow the
//! page. Totals come from a separate count over the store-side filters
//! only, so they overestimate whenever free text is in play.

use serde::Serialize;
use tracing::debug;

use taxon_core::{Document, DocumentId, DocumentStore, LanguageCode, Query, Result};

use crate::search::SearchTerms;

/// Fetch rounds per page: the first attempt plus two retries.
pub const MAX_FETCH_ROUNDS: usize = 3;

/// Class filter value meaning "every class".
pub const ALL_CLASSES: &str = "0";

/// Parameters of one list request, already validated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, echoed back. Offsets come from the cursor.
    pub page: u32,
    pub page_size: u32,
    pub search_query: Option<String>,
    /// Class to filter on; `"0"` or blank means no filter.
    pub class_id: Option<String>,
    pub language: LanguageCode,
    /// Id of the last record of the previous page.
    pub cursor: Option<DocumentId>,
    /// Requesting user; enables observation lookup.
    pub uid: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 5,
            search_query: None,
            class_id: None,
            language: LanguageCode::default(),
            cursor: None,
            uid: None,
        }
    }
}

impl PageRequest {
    /// The class filter to apply, if any.
    pub fn class_filter(&self) -> Option<&str> {
        self.class_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CLASSES)
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Approximate: counts store-side matches only.
    pub total_items: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    /// Cursor for the next page.
    pub last_visible_doc_id: Option<String>,
    /// Estimate. A search page stops at the first round with a match, so it
    /// can come back short with this false while later documents still
    /// match; resuming from `last_visible_doc_id` reaches them.
    pub has_next_page: bool,
}

/// A page of projected records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Result of the fetch loop, before projection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScanOutcome {
    pub page: Vec<Document>,
    pub has_next_page: bool,
    pub next_cursor: Option<DocumentId>,
    pub rounds: usize,
}

/// Why the fetch loop stopped or continued after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundExit {
    /// The store returned fewer documents than asked for.
    Exhausted,
    /// The round produced at least one survivor.
    Satisfied,
    /// Nothing survived; try the next slice if rounds remain.
    Retry,
}

impl RoundExit {
    fn classify(fetched: usize, requested: usize, kept: usize) -> Self {
        if fetched < requested {
            RoundExit::Exhausted
        } else if kept > 0 {
            RoundExit::Satisfied
        } else {
            RoundExit::Retry
        }
    }
}

/// One page worth of fetch rounds.
pub(crate) struct PageScan<'a, S: ?Sized> {
    pub store: &'a S,
    /// Collection, store-side filters, sort and projection.
    pub query: &'a Query,
    pub terms: &'a SearchTerms,
    pub language: &'a LanguageCode,
    pub page_size: usize,
}

impl<S: DocumentStore + ?Sized> PageScan<'_, S> {
    /// Run the fetch loop starting after `start`.
    ///
    /// `requested_cursor` is echoed as the next cursor when nothing at all
    /// was fetched and no anchor resolved.
    ///
    /// The loop ends after the first round with a survivor, so a filtered
    /// page may hold fewer than `page_size` documents. `has_next_page` is
    /// then false unless the page is full, even if the store has more.
    pub async fn run(
        &self,
        start: Option<Document>,
        requested_cursor: Option<&DocumentId>,
    ) -> Result<ScanOutcome> {
        let requested = self.page_size + 1;
        let mut anchor = start;
        let mut survivors: Vec<Document> = Vec::new();
        let mut exhausted = false;
        let mut rounds = 0;

        while rounds < MAX_FETCH_ROUNDS {
            let query = self
                .query
                .clone()
                .start_after(anchor.clone())
                .limit(requested);
            let batch = self.store.query(&query).await?;
            rounds += 1;

            let fetched = batch.len();
            if let Some(last) = batch.last() {
                anchor = Some(last.clone());
            }

            let before = survivors.len();
            survivors.extend(
                batch
                    .into_iter()
                    .filter(|doc| self.terms.matches(doc, self.language)),
            );
            let kept = survivors.len() - before;

            let exit = RoundExit::classify(fetched, requested, kept);
            debug!(round = rounds, fetched, kept, ?exit, "Fetch round finished");

            match exit {
                RoundExit::Exhausted => {
                    exhausted = true;
                    break;
                }
                RoundExit::Satisfied => break,
                RoundExit::Retry => continue,
            }
        }

        let has_next_page = survivors.len() > self.page_size
            || (survivors.len() == self.page_size && !exhausted);
        survivors.truncate(self.page_size);

        let next_cursor = survivors
            .last()
            .map(|doc| doc.id.clone())
            .or_else(|| anchor.map(|doc| doc.id))
            .or_else(|| requested_cursor.cloned());

        Ok(ScanOutcome {
            page: survivors,
            has_next_page,
            next_cursor,
            rounds,
        })
    }
}

/// `ceil(total / page_size)`.
pub fn total_pages(total_items: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(page_size))
}
