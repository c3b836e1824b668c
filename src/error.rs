//! Error types for feedrelay.

use thiserror::Error;

/// Common error type for feedrelay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Database error.
    ///
    /// Wraps any storage-layer failure from sqlx; duplicate-key inserts are
    /// not errors (the ledger folds them into a no-op result).
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed retrieval or parse error.
    #[error("feed error: {0}")]
    Feed(String),

    /// Webhook delivery error (transport fault or non-200 response).
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Validation error for configuration values.
    #[error("validation error: {0}")]
    Validation(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for RelayError {
    fn from(e: sqlx::Error) -> Self {
        RelayError::Database(e.to_string())
    }
}

/// Result type alias for feedrelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_display() {
        let err = RelayError::Database("table is locked".to_string());
        assert_eq!(err.to_string(), "database error: table is locked");
    }

    #[test]
    fn test_feed_error_display() {
        let err = RelayError::Feed("connection refused".to_string());
        assert_eq!(err.to_string(), "feed error: connection refused");
    }

    #[test]
    fn test_delivery_error_display() {
        let err = RelayError::Delivery("webhook returned status 404".to_string());
        assert_eq!(
            err.to_string(),
            "delivery error: webhook returned status 404"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = RelayError::Validation("feed url is not set".to_string());
        assert_eq!(err.to_string(), "validation error: feed url is not set");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RelayError = io_err.into();
        assert!(matches!(err, RelayError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(RelayError::Feed("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
