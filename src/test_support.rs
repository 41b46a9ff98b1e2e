// Shared fixtures for unit tests

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::catalog_client::{BooksResponse, CatalogPage, CatalogSource, FetchError};
use crate::domain::Book;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
}

pub fn book(id: u64, title: &str, author: &str, subjects: &[&str]) -> Book {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "authors": [{ "name": author, "birth_year": 1800, "death_year": 1870 }],
        "subjects": subjects,
        "languages": ["en"],
        "copyright": false,
        "formats": {
            "text/html": format!("https://www.gutenberg.org/ebooks/{id}.html.images"),
            "application/epub+zip": format!("https://www.gutenberg.org/ebooks/{id}.epub3.images"),
            "image/jpeg": format!("https://www.gutenberg.org/cache/epub/{id}/pg{id}.cover.medium.jpg")
        },
        "download_count": id * 10
    }))
    .unwrap()
}

pub fn numbered_books(ids: RangeInclusive<u64>) -> Vec<Book> {
    ids.map(|n| {
        book(
            n,
            &format!("Book {n}"),
            &format!("Author {n}"),
            &["Fiction -- Test"],
        )
    })
    .collect()
}

/// Canned listing pages. Unknown pages fail with a decode error.
pub struct StubSource {
    total_count: u64,
    pages: HashMap<u32, Vec<Book>>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(total_count: u64) -> Self {
        Self {
            total_count,
            pages: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_page(mut self, page: u32, books: Vec<Book>) -> Self {
        self.pages.insert(page, books);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StubSource {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(&page) {
            Some(books) => Ok(CatalogPage {
                books: books.clone(),
                total_count: self.total_count,
            }),
            None => Err(serde_json::from_str::<BooksResponse>("<html>oops</html>")
                .unwrap_err()
                .into()),
        }
    }
}
