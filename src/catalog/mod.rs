pub mod cache;
pub mod filter;
pub mod store;

pub use cache::{CacheEntry, DEFAULT_CACHE_TTL, PageCache};
pub use filter::FilterState;
pub use store::{CatalogStore, FetchTicket, RefreshOutcome, RefreshStart};
