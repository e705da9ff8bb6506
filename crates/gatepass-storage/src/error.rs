use thiserror::Error;

/// Storage-specific error types for the visitor directory.
///
/// These represent failures in database operations, migrations, and the
/// mapping between stored rows and domain records.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Row not found in database
    #[error("Not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: String },

    /// A stored row no longer maps onto a valid domain record
    #[error("Corrupt row in {entity}: {reason}")]
    CorruptRow { entity: &'static str, reason: String },

    /// Emergency details JSON could not be read or written
    #[error("Details serialization error: {0}")]
    Details(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    pub(crate) fn corrupt(entity: &'static str, error: impl std::fmt::Display) -> Self {
        StorageError::CorruptRow {
            entity,
            reason: error.to_string(),
        }
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
