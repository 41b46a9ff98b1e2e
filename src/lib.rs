pub mod catalog;
pub mod catalog_client;
pub mod config;
pub mod domain;
pub mod pagination;
pub mod preferences;
pub mod storage;
pub mod view;
pub mod web;
pub mod wishlist;

#[cfg(test)]
mod test_support;
