use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::Book;
use crate::storage::{KeyValueStore, StorageError};

pub const WISHLIST_KEY: &str = "wishlist";

/// Bookmarked books, kept as full snapshots in insertion order.
///
/// Every mutation is written through to storage. Write failures are logged
/// and otherwise ignored; the in-memory list stays authoritative.
pub struct WishlistStore {
    books: Vec<Book>,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("books", &self.books.len())
            .finish()
    }
}

impl WishlistStore {
    /// Restore the persisted wishlist; unreadable data yields an empty one.
    #[tracing::instrument(level = "debug", skip(storage))]
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let books = match storage.get(WISHLIST_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Book>>(&raw) {
                Ok(books) => dedup_by_id(books),
                Err(e) => {
                    tracing::error!(error = %e, "stored wishlist is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "failed to load wishlist");
                Vec::new()
            }
        };
        tracing::info!(count = books.len(), "loaded wishlist");
        Self { books, storage }
    }

    pub fn all(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.books.iter().any(|b| b.id == id)
    }

    pub fn get(&self, id: u64) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Remove the book if present, otherwise append a snapshot of it.
    /// Returns whether the book is wishlisted afterwards.
    pub async fn toggle(&mut self, book: &Book) -> bool {
        let added = match self.books.iter().position(|b| b.id == book.id) {
            Some(index) => {
                self.books.remove(index);
                tracing::info!(id = book.id, title = %book.title, "removed from wishlist");
                false
            }
            None => {
                self.books.push(book.clone());
                tracing::info!(id = book.id, title = %book.title, "added to wishlist");
                true
            }
        };
        if let Err(e) = self.persist().await {
            tracing::error!(error = %e, "failed to save wishlist");
        }
        added
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.books).map_err(|source| StorageError::Encode {
            key: WISHLIST_KEY.into(),
            source,
        })?;
        self.storage.set(WISHLIST_KEY, &raw).await
    }
}

fn dedup_by_id(books: Vec<Book>) -> Vec<Book> {
    let mut seen = HashSet::new();
    books.into_iter().filter(|b| seen.insert(b.id)).collect()
}
