use poem_openapi::{
    ApiResponse, Object,
    payload::{Json, PlainText},
};

use crate::domain::Book;
use crate::domain::mapping::{cover_url, primary_author, primary_genre};

#[derive(Debug, Clone, Object)]
pub struct BookSummaryDto {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub cover_url: String,
    pub download_count: u64,
    pub wishlisted: bool,
}

impl BookSummaryDto {
    pub fn from_book(book: &Book, wishlisted: bool) -> Self {
        BookSummaryDto {
            id: book.id,
            title: book.title.clone(),
            author: primary_author(book).to_owned(),
            genre: primary_genre(book).to_owned(),
            cover_url: cover_url(book).to_owned(),
            download_count: book.download_count,
            wishlisted,
        }
    }
}

/// The slice of the filtered catalog the list view is showing.
#[derive(Debug, Clone, Object)]
pub struct BooksPageDto {
    pub page: u64,
    pub total_pages: u64,
    pub page_size: u64,
    /// Books matching the current filter across all pages
    pub total_matching: u64,
    /// Books fetched from the catalog so far
    pub total_loaded: u64,
    pub search: String,
    pub genre: String,
    pub has_more: bool,
    pub error: Option<String>,
    pub books: Vec<BookSummaryDto>,
}

#[derive(ApiResponse)]
pub enum ActionResponse {
    /// Action applied, continue at the current view
    #[oai(status = 303)]
    SeeOther(#[oai(header = "Location")] String),

    /// Keystroke recorded, the search applies once typing pauses
    #[oai(status = 202)]
    Accepted,

    /// Unrecognised parameter value
    #[oai(status = 400)]
    BadRequest(PlainText<String>),
}

impl ActionResponse {
    pub fn home() -> Self {
        ActionResponse::SeeOther("/".to_owned())
    }
}

#[derive(ApiResponse)]
pub enum BooksPageResponse {
    #[oai(status = 200)]
    Ok(Json<BooksPageDto>),
}

#[derive(ApiResponse)]
pub enum WishlistResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<BookSummaryDto>>),
}
