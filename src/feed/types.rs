//! Feed entry types.

use chrono::{DateTime, Utc};

/// Placeholder title for entries that carry none.
pub const MISSING_TITLE: &str = "No title";

/// Placeholder summary for entries that carry none.
pub const MISSING_SUMMARY: &str = "No summary available";

/// A single entry parsed out of a syndication feed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    /// Stable identifier used for deduplication. GUID when the feed
    /// provides one, otherwise the entry link, otherwise a positional
    /// fallback.
    pub id: String,
    /// Entry title.
    pub title: String,
    /// Link to the full article.
    pub link: String,
    /// Plain-text summary.
    pub summary: String,
    /// Publication timestamp, if the feed provided one.
    pub published: Option<DateTime<Utc>>,
}

impl FeedEntry {
    /// Publication timestamp, falling back to the current time.
    pub fn published_or_now(&self) -> DateTime<Utc> {
        self.published.unwrap_or_else(Utc::now)
    }
}
