// Client for the Gutendex book listing API

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::Book;

/// Gutendex always pages its listing by 32 results.
pub const SERVER_PAGE_SIZE: u64 = 32;
pub const DEFAULT_BASE_URL: &str = "https://gutendex.com/books/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure or a non-success HTTP status
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The body was not the expected JSON envelope
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One decoded listing page.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub books: Vec<Book>,
    /// Items across all pages, not just this one
    pub total_count: u64,
}

/// Anything that can serve listing pages. The HTTP client is the only
/// production implementation; tests plug in canned pages.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, FetchError>;
}

#[derive(Clone, Debug)]
pub struct GutendexClient {
    base_url: String,
    client: reqwest::Client,
}

impl GutendexClient {
    /// Create a new client for the given listing endpoint (e.g. "https://gutendex.com/books/").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        let base_url = base_url.into();
        tracing::debug!(%base_url, "creating GutendexClient");
        Ok(GutendexClient { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET <base>?page=<n>
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_books(&self, page: u32) -> Result<BooksResponse, FetchError> {
        tracing::debug!(url = %self.base_url, page, "GET books");
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("page", page)])
            .send()
            .await?;
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        match serde_json::from_str::<BooksResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet: String = body.chars().take(2000).collect();
                tracing::error!(error = %e, body_snippet = %snippet, "failed to parse BooksResponse");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl CatalogSource for GutendexClient {
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage, FetchError> {
        let resp = self.get_books(page).await?;
        tracing::info!(
            page,
            received = resp.results.len(),
            total = resp.count,
            "fetched catalog page"
        );
        Ok(CatalogPage {
            books: resp.results,
            total_count: resp.count,
        })
    }
}

/// Number of listing pages needed for `total_count` items.
pub fn api_page_count(total_count: u64) -> u32 {
    total_count.div_ceil(SERVER_PAGE_SIZE) as u32
}

#[derive(Debug, Deserialize)]
pub struct BooksResponse {
    pub count: u64,
    pub results: Vec<Book>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn books_response_deserialize_example() {
        let json = r#"{
            "count": 76543,
            "next": "https://gutendex.com/books/?page=2",
            "previous": null,
            "results": [
                {
                    "id": 84,
                    "title": "Frankenstein; Or, The Modern Prometheus",
                    "authors": [{ "name": "Shelley, Mary Wollstonecraft", "birth_year": 1797, "death_year": 1851 }],
                    "summaries": [],
                    "translators": [],
                    "subjects": ["Frankenstein's monster (Fictitious character) -- Fiction", "Gothic fiction"],
                    "bookshelves": ["Gothic Fiction", "Movie Books"],
                    "languages": ["en"],
                    "copyright": false,
                    "media_type": "Text",
                    "formats": { "application/epub+zip": "https://www.gutenberg.org/ebooks/84.epub3.images" },
                    "download_count": 104413
                }
            ]
        }"#;

        let parsed: BooksResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.count, 76543);
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].id, 84);
        assert_eq!(parsed.results[0].bookshelves.len(), 2);
    }

    #[test]
    fn envelope_without_results_is_rejected() {
        let err = serde_json::from_str::<BooksResponse>(r#"{ "count": 3 }"#).unwrap_err();
        assert!(err.to_string().contains("results"));
    }

    #[test]
    fn api_page_count_rounds_up() {
        assert_eq!(api_page_count(0), 0);
        assert_eq!(api_page_count(1), 1);
        assert_eq!(api_page_count(32), 1);
        assert_eq!(api_page_count(64), 2);
        assert_eq!(api_page_count(65), 3);
    }

    #[test]
    fn client_keeps_base_url_verbatim() {
        let c = GutendexClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(c.base_url(), "https://gutendex.com/books/");
    }
}
