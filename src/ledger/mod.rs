//! Ledger module for feedrelay.
//!
//! This module records delivered articles so restarts never repost
//! old ones.

pub mod repository;
pub mod types;

pub use repository::LedgerRepository;
pub use types::PostedArticle;
