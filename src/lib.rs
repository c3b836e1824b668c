//! feedrelay - relays new syndication feed entries to a chat webhook.
//!
//! Polls an RSS/Atom feed, delivers entries that have not been posted
//! before, and records deliveries in a SQLite ledger so restarts never
//! repost old articles.

pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod logging;
pub mod relay;
pub mod webhook;

pub use config::{Config, RunMode};
pub use db::Database;
pub use error::{RelayError, Result};
pub use feed::{FeedEntry, FeedFetcher};
pub use ledger::{LedgerRepository, PostedArticle};
pub use relay::{CycleSummary, EntryOutcome, Relay};
pub use webhook::WebhookClient;
