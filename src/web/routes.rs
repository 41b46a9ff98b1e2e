use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::{Html, PlainText},
};

use super::models::{ActionResponse, BooksPageResponse, WishlistResponse};
use super::services::{actions::ActionService, catalog::CatalogService, health::HealthService};
use super::session::Session;
use crate::view::Action;

pub struct ShelfApi {
    pub session: Arc<Session>,
}

#[OpenApi]
impl ShelfApi {
    /// The current view as a full HTML page
    #[oai(path = "/", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn index(&self) -> Html<String> {
        CatalogService::new(&self.session).page().await
    }

    #[oai(path = "/health", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn health(&self) -> PlainText<String> {
        HealthService::new(&self.session).status_text().await
    }

    // ===== JSON =====

    /// The page of filtered books the list view is showing
    #[oai(path = "/api/books", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn books(&self) -> BooksPageResponse {
        CatalogService::new(&self.session).books_page().await
    }

    #[oai(path = "/api/wishlist", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn wishlist(&self) -> WishlistResponse {
        CatalogService::new(&self.session).wishlist().await
    }

    // ===== view actions =====

    /// One keystroke in the search box; applied after the debounce delay
    #[oai(path = "/actions/search", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn search_keystroke(&self, Query(q): Query<Option<String>>) -> ActionResponse {
        ActionService::new(&self.session)
            .search_keystroke(q.unwrap_or_default())
            .await
    }

    /// Apply a search immediately
    #[oai(path = "/actions/search/submit", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn submit_search(&self, Query(q): Query<Option<String>>) -> ActionResponse {
        ActionService::new(&self.session)
            .apply(Action::ApplySearch(q.unwrap_or_default()))
            .await
    }

    /// Filter by genre prefix; empty selects all genres
    #[oai(path = "/actions/genre", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn select_genre(&self, Query(genre): Query<Option<String>>) -> ActionResponse {
        ActionService::new(&self.session)
            .apply(Action::SelectGenre(genre.unwrap_or_default()))
            .await
    }

    /// One of 16, 32, 48 or 64
    #[oai(path = "/actions/page-size", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn select_page_size(&self, Query(size): Query<String>) -> ActionResponse {
        ActionService::new(&self.session).select_page_size(&size).await
    }

    #[oai(path = "/actions/page/:page", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, page))]
    async fn go_to_page(&self, page: Path<u32>) -> ActionResponse {
        ActionService::new(&self.session)
            .apply(Action::GoToPage(page.0 as usize))
            .await
    }

    #[oai(path = "/actions/wishlist/:book_id/toggle", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, book_id))]
    async fn toggle_wishlist(&self, book_id: Path<u64>) -> ActionResponse {
        ActionService::new(&self.session)
            .apply(Action::ToggleWishlist(book_id.0))
            .await
    }

    #[oai(path = "/actions/books/:book_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, book_id))]
    async fn open_detail(&self, book_id: Path<u64>) -> ActionResponse {
        ActionService::new(&self.session)
            .apply(Action::OpenDetail(book_id.0))
            .await
    }

    #[oai(path = "/actions/back", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn back(&self) -> ActionResponse {
        ActionService::new(&self.session).apply(Action::Back).await
    }

    /// Switch to the "list" or "wishlist" view
    #[oai(path = "/actions/show/:view", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, view))]
    async fn show(&self, view: Path<String>) -> ActionResponse {
        ActionService::new(&self.session).show(&view.0).await
    }

    /// Keyboard shortcuts: "escape" or "focus-search"
    #[oai(path = "/actions/key/:key", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, key))]
    async fn shortcut(&self, key: Path<String>) -> ActionResponse {
        ActionService::new(&self.session).shortcut(&key.0).await
    }

    /// Fetch the next catalog page
    #[oai(path = "/actions/load-more", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn load_more(&self) -> ActionResponse {
        ActionService::new(&self.session).apply(Action::LoadMore).await
    }

    /// Drop the page cache and start over from the first catalog page
    #[oai(path = "/actions/reload", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn reload(&self) -> ActionResponse {
        ActionService::new(&self.session).apply(Action::Reload).await
    }
}
