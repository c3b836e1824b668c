//! Database schema and migrations for feedrelay.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - posted articles ledger
    r#"
-- Ledger of feed entries that have already been delivered to the webhook
CREATE TABLE IF NOT EXISTS posted_articles (
    id          TEXT PRIMARY KEY,
    title       TEXT,
    link        TEXT,
    published   TIMESTAMP
);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_first_migration_contains_posted_articles_table() {
        let first = MIGRATIONS[0];
        assert!(first.contains("CREATE TABLE IF NOT EXISTS posted_articles"));
        assert!(first.contains("id"));
        assert!(first.contains("title"));
        assert!(first.contains("link"));
        assert!(first.contains("published"));
    }

    #[test]
    fn test_migrations_are_valid_sql() {
        // Each migration should be non-empty and contain SQL keywords
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
            assert!(migration.contains("CREATE TABLE") || migration.contains("ALTER TABLE"));
        }
    }
}
