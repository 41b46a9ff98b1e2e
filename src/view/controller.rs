use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::navigation::{Navigation, View};
use crate::catalog::{
    CatalogStore, FetchTicket, FilterState, PageCache, RefreshOutcome, RefreshStart,
};
use crate::catalog_client::{CatalogPage, FetchError};
use crate::domain::Book;
use crate::pagination::{self, Cursor, PageSize};
use crate::preferences::PreferencesStore;
use crate::storage::KeyValueStore;
use crate::wishlist::WishlistStore;

pub const LOAD_ERROR_MESSAGE: &str =
    "Failed to load books. Please check your connection and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Leave a detail view
    Escape,
    /// Put the caret in the search box
    FocusSearch,
}

impl Shortcut {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "escape" => Some(Shortcut::Escape),
            "focus-search" => Some(Shortcut::FocusSearch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A keystroke in the search box; applied only after the debounce delay
    SearchInput(String),
    ApplySearch(String),
    /// A debounced keystroke coming due; dropped if another search came since
    DebouncedSearch { text: String, generation: u64 },
    SelectGenre(String),
    SelectPageSize(PageSize),
    GoToPage(usize),
    ToggleWishlist(u64),
    OpenDetail(u64),
    Back,
    Show(View),
    Shortcut(Shortcut),
    LoadMore,
    Reload,
}

/// Work the caller has to carry out after `handle` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    None,
    /// Schedule `Action::DebouncedSearch` with these fields after the debounce delay
    Debounce { text: String, generation: u64 },
    /// Fetch the ticket's page and pass the result to `complete_fetch`
    Fetch(FetchTicket),
}

/// All browser state: the stores, the pagination cursor and navigation.
///
/// State transitions happen in `handle` / `complete_fetch`; rendering reads
/// the state through the accessors and never mutates it.
#[derive(Debug)]
pub struct ViewController {
    catalog: CatalogStore,
    wishlist: WishlistStore,
    preferences: PreferencesStore,
    cursor: Cursor,
    nav: Navigation,
    search_draft: String,
    search_generation: u64,
    focus_search: bool,
    error: Option<String>,
}

impl ViewController {
    /// Restore persisted preferences and wishlist.
    pub async fn init(storage: Arc<dyn KeyValueStore>, cache: PageCache) -> Self {
        let preferences = PreferencesStore::new(Arc::clone(&storage));
        let prefs = preferences.load().await;
        let wishlist = WishlistStore::load(storage).await;
        tracing::info!(
            search = %prefs.filter.search,
            genre = %prefs.filter.genre,
            page_size = %prefs.page_size,
            "restored browser state"
        );
        Self {
            search_draft: prefs.filter.search.clone(),
            catalog: CatalogStore::new(cache, prefs.filter),
            wishlist,
            preferences,
            cursor: Cursor::new(prefs.page_size),
            nav: Navigation::default(),
            search_generation: 0,
            focus_search: false,
            error: None,
        }
    }

    /// Begin loading the first catalog page.
    pub fn start(&mut self, now: DateTime<Utc>) -> Followup {
        let start = self.catalog.begin_refresh(1, now);
        self.after_refresh_start(start)
    }

    #[tracing::instrument(level = "debug", skip(self, now))]
    pub async fn handle(&mut self, action: Action, now: DateTime<Utc>) -> Followup {
        if !matches!(
            action,
            Action::SearchInput(_)
                | Action::ApplySearch(_)
                | Action::DebouncedSearch { .. }
                | Action::Shortcut(_)
        ) {
            self.focus_search = false;
        }

        match action {
            Action::SearchInput(text) => {
                self.search_draft = text.clone();
                self.focus_search = true;
                self.search_generation += 1;
                return Followup::Debounce {
                    text,
                    generation: self.search_generation,
                };
            }
            Action::ApplySearch(text) => {
                self.search_generation += 1;
                self.apply_search(text).await;
            }
            Action::DebouncedSearch { text, generation } => {
                if generation == self.search_generation {
                    self.apply_search(text).await;
                } else {
                    tracing::debug!(%text, generation, "dropping superseded search");
                }
            }
            Action::SelectGenre(genre) => {
                let search = self.catalog.filter().search.clone();
                self.set_filter(FilterState::new(search, genre)).await;
                tracing::info!(genre = %self.catalog.filter().genre, "genre filter changed");
            }
            Action::SelectPageSize(size) => {
                self.cursor.set_page_size(size);
                self.save_preferences().await;
                tracing::info!(page_size = %size, "page size changed");
            }
            Action::GoToPage(page) => {
                let total = self.total_pages();
                if self.cursor.change_page(page, total) {
                    tracing::debug!(page, "changed page");
                }
            }
            Action::ToggleWishlist(id) => match self.lookup(id).cloned() {
                Some(book) => {
                    self.wishlist.toggle(&book).await;
                }
                None => tracing::warn!(id, "book not found, ignoring wishlist toggle"),
            },
            Action::OpenDetail(id) => self.open_detail(id),
            Action::Back => {
                self.nav.back();
            }
            Action::Show(View::Detail(id)) => self.open_detail(id),
            Action::Show(view) => {
                self.nav.show(view);
                tracing::debug!(view = view.name(), "showing view");
            }
            Action::Shortcut(Shortcut::Escape) => {
                if self.nav.back() {
                    tracing::debug!("escape: left detail view");
                }
            }
            Action::Shortcut(Shortcut::FocusSearch) => {
                self.nav.show(View::List);
                self.focus_search = true;
            }
            Action::LoadMore => {
                let start = self.catalog.load_more(now);
                return self.after_refresh_start(start);
            }
            Action::Reload => {
                self.error = None;
                let start = self.catalog.reload(now);
                return self.after_refresh_start(start);
            }
        }
        Followup::None
    }

    /// Apply the outcome of a fetch requested through `Followup::Fetch`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<CatalogPage, FetchError>,
        now: DateTime<Utc>,
    ) {
        match self.catalog.complete_refresh(ticket, result, now) {
            Ok(RefreshOutcome::Applied) => {
                self.error = None;
                self.cursor.reset();
            }
            Ok(RefreshOutcome::Skipped | RefreshOutcome::Discarded) => {}
            Err(e) => {
                tracing::error!(error = %e, page = ticket.page(), "error fetching books");
                self.error = Some(LOAD_ERROR_MESSAGE.to_owned());
            }
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn navigation(&self) -> &Navigation {
        &self.nav
    }

    pub fn search_draft(&self) -> &str {
        &self.search_draft
    }

    pub fn focus_search(&self) -> bool {
        self.focus_search
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total_pages(&self) -> usize {
        self.cursor.total_pages(self.catalog.filtered().len())
    }

    pub fn visible_books(&self) -> &[Book] {
        pagination::visible_slice(self.catalog.filtered(), &self.cursor)
    }

    /// A book from the catalog, or failing that a wishlist snapshot.
    pub fn lookup(&self, id: u64) -> Option<&Book> {
        self.catalog.find(id).or_else(|| self.wishlist.get(id))
    }

    fn open_detail(&mut self, id: u64) {
        if self.lookup(id).is_none() {
            tracing::warn!(id, "book not found, staying on current view");
            return;
        }
        self.nav.open_detail(id);
        tracing::debug!(id, "showing book detail");
    }

    async fn apply_search(&mut self, text: String) {
        self.search_draft = text.clone();
        let genre = self.catalog.filter().genre.clone();
        self.set_filter(FilterState::new(text, genre)).await;
        tracing::info!(search = %self.catalog.filter().search, "search performed");
    }

    async fn set_filter(&mut self, filter: FilterState) {
        self.catalog.set_filter(filter);
        self.cursor.reset();
        self.save_preferences().await;
    }

    async fn save_preferences(&self) {
        self.preferences
            .save(self.catalog.filter(), self.cursor.page_size())
            .await;
    }

    fn after_refresh_start(&mut self, start: RefreshStart) -> Followup {
        match start {
            RefreshStart::Fetch(ticket) => Followup::Fetch(ticket),
            RefreshStart::Served => {
                self.error = None;
                self.cursor.reset();
                Followup::None
            }
            RefreshStart::Busy | RefreshStart::NothingToLoad => Followup::None,
        }
    }
}
