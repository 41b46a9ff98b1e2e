use chrono::{DateTime, Utc};

use super::cache::{CacheEntry, PageCache};
use super::filter::{self, FilterState};
use crate::catalog_client::{CatalogPage, CatalogSource, FetchError, api_page_count};
use crate::domain::Book;

/// Permission to perform one remote fetch, handed out by `begin_refresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    page: u32,
    generation: u64,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStart {
    /// The page came from the cache and has already been applied
    Served,
    /// The caller must fetch the page and hand the result to `complete_refresh`
    Fetch(FetchTicket),
    /// Another fetch is outstanding
    Busy,
    /// Every remote page has been loaded
    NothingToLoad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// The store was busy, nothing happened
    Skipped,
    /// The response belonged to a superseded request
    Discarded,
}

/// Owns the books fetched so far, the active filter and the filtered view.
#[derive(Debug, Default)]
pub struct CatalogStore {
    books: Vec<Book>,
    filter: FilterState,
    filtered: Vec<Book>,
    cache: PageCache,
    current_api_page: u32,
    total_api_pages: u32,
    in_flight: Option<FetchTicket>,
    generation: u64,
}

impl CatalogStore {
    pub fn new(cache: PageCache, filter: FilterState) -> Self {
        Self {
            cache,
            filter,
            ..Self::default()
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn filtered(&self) -> &[Book] {
        &self.filtered
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn current_api_page(&self) -> u32 {
        self.current_api_page
    }

    pub fn total_api_pages(&self) -> u32 {
        self.total_api_pages
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_more(&self) -> bool {
        self.current_api_page < self.total_api_pages
    }

    pub fn find(&self, id: u64) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn available_genres(&self) -> Vec<String> {
        filter::available_genres(&self.books)
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.recompute();
    }

    /// Resolve `page` from the cache if possible, otherwise hand out a ticket
    /// for a remote fetch. Only one ticket is outstanding at a time.
    #[tracing::instrument(level = "debug", skip(self, now))]
    pub fn begin_refresh(&mut self, page: u32, now: DateTime<Utc>) -> RefreshStart {
        if self.in_flight.is_some() {
            tracing::debug!(page, "refresh already in flight, ignoring");
            return RefreshStart::Busy;
        }

        if let Some(entry) = self.cache.get(page, now) {
            tracing::debug!(page, "using cached page");
            let (books, total_count) = (entry.books.clone(), entry.total_count);
            self.apply_page(page, books, total_count, false);
            return RefreshStart::Served;
        }

        let ticket = FetchTicket {
            page,
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        RefreshStart::Fetch(ticket)
    }

    /// Apply the result of the fetch authorised by `ticket`. Failures leave the
    /// catalog and the cache untouched and are handed back to the caller.
    #[tracing::instrument(level = "debug", skip(self, result, now), fields(page = ticket.page))]
    pub fn complete_refresh(
        &mut self,
        ticket: FetchTicket,
        result: Result<CatalogPage, FetchError>,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome, FetchError> {
        if self.in_flight != Some(ticket) {
            tracing::info!(
                generation = ticket.generation,
                current = self.generation,
                "discarding response for superseded request"
            );
            return Ok(RefreshOutcome::Discarded);
        }
        self.in_flight = None;

        let page = result?;
        self.cache.put(CacheEntry {
            page: ticket.page,
            books: page.books.clone(),
            total_count: page.total_count,
            fetched_at: now,
        });
        self.apply_page(ticket.page, page.books, page.total_count, true);
        tracing::debug!(
            accumulated = self.books.len(),
            total_api_pages = self.total_api_pages,
            "applied catalog page"
        );
        Ok(RefreshOutcome::Applied)
    }

    /// Resolve `page` end to end against `source`.
    pub async fn refresh(
        &mut self,
        source: &dyn CatalogSource,
        page: u32,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome, FetchError> {
        match self.begin_refresh(page, now) {
            RefreshStart::Served => Ok(RefreshOutcome::Applied),
            RefreshStart::Busy | RefreshStart::NothingToLoad => Ok(RefreshOutcome::Skipped),
            RefreshStart::Fetch(ticket) => {
                let result = source.fetch_page(ticket.page).await;
                self.complete_refresh(ticket, result, now)
            }
        }
    }

    /// Start loading the next remote page, if there is one and nothing is in flight.
    pub fn load_more(&mut self, now: DateTime<Utc>) -> RefreshStart {
        if self.in_flight.is_some() {
            return RefreshStart::Busy;
        }
        if !self.has_more() {
            return RefreshStart::NothingToLoad;
        }
        self.begin_refresh(self.current_api_page + 1, now)
    }

    /// Forget cached pages and any outstanding request, then start over from page 1.
    pub fn reload(&mut self, now: DateTime<Utc>) -> RefreshStart {
        tracing::info!(cached_pages = self.cache.cached_pages(), "reloading catalog");
        self.cache.clear();
        self.generation += 1;
        self.in_flight = None;
        self.begin_refresh(1, now)
    }

    fn apply_page(&mut self, page: u32, books: Vec<Book>, total_count: u64, fresh: bool) {
        self.total_api_pages = api_page_count(total_count);
        if page == 1 {
            // A cached first page is already at the head of a populated catalog.
            if fresh || self.books.is_empty() {
                self.books = books;
                self.current_api_page = 1;
            }
        } else {
            self.books.extend(books);
            self.current_api_page = page;
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = self.filter.apply(&self.books);
        tracing::debug!(
            filtered = self.filtered.len(),
            total = self.books.len(),
            "recomputed filtered result"
        );
    }
}
