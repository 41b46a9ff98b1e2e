use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::Book;

pub const DEFAULT_CACHE_TTL: TimeDelta = TimeDelta::minutes(5);

/// A listing page exactly as it was received.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub page: u32,
    pub books: Vec<Book>,
    pub total_count: u64,
    pub fetched_at: DateTime<Utc>,
}

/// Listing pages keyed by page number, valid for a fixed time window.
///
/// Entries are never evicted except by age; an expired entry is simply
/// ignored until the next `put` for the same page replaces it.
#[derive(Debug)]
pub struct PageCache {
    ttl: TimeDelta,
    entries: HashMap<u32, CacheEntry>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl PageCache {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, page: u32, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries
            .get(&page)
            .filter(|entry| now - entry.fetched_at < self.ttl)
    }

    pub fn put(&mut self, entry: CacheEntry) {
        self.entries.insert(entry.page, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn cached_pages(&self) -> usize {
        self.entries.len()
    }
}
