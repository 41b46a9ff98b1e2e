use poem_openapi::payload::{Html, Json};

use crate::web::models::{BookSummaryDto, BooksPageDto, BooksPageResponse, WishlistResponse};
use crate::web::session::Session;

pub struct CatalogService<'a> {
    pub session: &'a Session,
}

impl<'a> CatalogService<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn page(&self) -> Html<String> {
        Html(self.session.render().await)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn books_page(&self) -> BooksPageResponse {
        let ctrl = self.session.controller().await;
        let catalog = ctrl.catalog();
        let books = ctrl
            .visible_books()
            .iter()
            .map(|b| BookSummaryDto::from_book(b, ctrl.wishlist().contains(b.id)))
            .collect();
        BooksPageResponse::Ok(Json(BooksPageDto {
            page: ctrl.cursor().current_page() as u64,
            total_pages: ctrl.total_pages() as u64,
            page_size: ctrl.cursor().page_size().get() as u64,
            total_matching: catalog.filtered().len() as u64,
            total_loaded: catalog.books().len() as u64,
            search: catalog.filter().search.clone(),
            genre: catalog.filter().genre.clone(),
            has_more: catalog.has_more(),
            error: ctrl.error().map(str::to_owned),
            books,
        }))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn wishlist(&self) -> WishlistResponse {
        let ctrl = self.session.controller().await;
        let books = ctrl
            .wishlist()
            .all()
            .iter()
            .map(|b| BookSummaryDto::from_book(b, true))
            .collect();
        WishlistResponse::Ok(Json(books))
    }
}
