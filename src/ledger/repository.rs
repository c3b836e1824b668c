//! Ledger persistence.

use chrono::{DateTime, Utc};

use crate::db::DbPool;
use crate::{RelayError, Result};

use super::types::PostedArticle;

/// Row type for a posted article from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct PostedArticleRow {
    id: String,
    title: Option<String>,
    link: Option<String>,
    published: Option<String>,
}

impl From<PostedArticleRow> for PostedArticle {
    fn from(row: PostedArticleRow) -> Self {
        PostedArticle {
            id: row.id,
            title: row.title.unwrap_or_default(),
            link: row.link.unwrap_or_default(),
            published: row
                .published
                .and_then(|s| parse_datetime(&s))
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for the delivered-article ledger.
pub struct LedgerRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> LedgerRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Check whether an entry id has already been recorded.
    pub async fn contains(&self, id: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posted_articles WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await
                .map_err(|e| RelayError::Database(e.to_string()))?;

        Ok(exists)
    }

    /// Record a delivered article. Returns `Ok(true)` if a row was
    /// inserted, `Ok(false)` if the id was already recorded.
    pub async fn record(&self, article: &PostedArticle) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO posted_articles (id, title, link, published)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&article.id)
        .bind(&article.title)
        .bind(&article.link)
        .bind(article.published.to_rfc3339())
        .execute(self.pool)
        .await
        .map_err(|e| RelayError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Look up a recorded article by id.
    pub async fn get(&self, id: &str) -> Result<Option<PostedArticle>> {
        let row: Option<PostedArticleRow> = sqlx::query_as(
            "SELECT id, title, link, published FROM posted_articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RelayError::Database(e.to_string()))?;

        Ok(row.map(PostedArticle::from))
    }

    /// Number of recorded articles.
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posted_articles")
            .fetch_one(self.pool)
            .await
            .map_err(|e| RelayError::Database(e.to_string()))?;

        Ok(row.0)
    }
}

/// Parse a datetime string to DateTime<Utc>.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    None
}
