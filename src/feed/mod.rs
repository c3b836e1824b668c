//! Feed module for feedrelay.
//!
//! This module provides syndication feed fetching and parsing.

pub mod fetcher;
pub mod types;

pub use fetcher::FeedFetcher;
pub use types::{FeedEntry, MISSING_SUMMARY, MISSING_TITLE};
