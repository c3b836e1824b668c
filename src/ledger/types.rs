//! Ledger record types.

use chrono::{DateTime, Utc};

/// A delivered article as recorded in the ledger.
#[derive(Debug, Clone)]
pub struct PostedArticle {
    /// Feed entry identifier.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Link to the full article.
    pub link: String,
    /// Publication timestamp.
    pub published: DateTime<Utc>,
}

impl PostedArticle {
    /// Create a new posted article record.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        published: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: link.into(),
            published,
        }
    }
}
