use std::sync::Arc;

use crate::catalog::FilterState;
use crate::pagination::PageSize;
use crate::storage::{KeyValueStore, StorageError};

pub const SEARCH_KEY: &str = "lastSearch";
pub const GENRE_KEY: &str = "lastGenre";
pub const PAGE_SIZE_KEY: &str = "booksPerPage";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub filter: FilterState,
    pub page_size: PageSize,
}

/// Last search, genre and page size. Best effort: failures are logged, never returned.
pub struct PreferencesStore {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PreferencesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PreferencesStore")
    }
}

impl PreferencesStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub async fn load(&self) -> Preferences {
        let search = self.read(SEARCH_KEY).await.unwrap_or_default();
        let genre = self.read(GENRE_KEY).await.unwrap_or_default();
        let page_size = match self.read(PAGE_SIZE_KEY).await {
            Some(raw) => PageSize::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "ignoring unsupported stored page size");
                PageSize::DEFAULT
            }),
            None => PageSize::DEFAULT,
        };
        tracing::debug!(%search, %genre, %page_size, "preferences loaded");
        Preferences {
            filter: FilterState { search, genre },
            page_size,
        }
    }

    pub async fn save(&self, filter: &FilterState, page_size: PageSize) {
        if let Err(e) = self.write_all(filter, page_size).await {
            tracing::error!(error = %e, "failed to save preferences");
        }
    }

    async fn write_all(&self, filter: &FilterState, page_size: PageSize) -> Result<(), StorageError> {
        self.storage.set(SEARCH_KEY, &filter.search).await?;
        self.storage.set(GENRE_KEY, &filter.genre).await?;
        self.storage
            .set(PAGE_SIZE_KEY, &page_size.to_string())
            .await
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, key, "failed to load preference");
                None
            }
        }
    }
}
