//! Error types for the record store.

/// Errors that can occur when working with the record store.
///
/// A miss on lookup is not an error; [`RecordStore::get`] returns `None` for
/// unknown ids, wrong fingerprints, and expired records alike. Everything
/// here is a real storage-layer failure and is surfaced verbatim.
///
/// [`RecordStore::get`]: crate::RecordStore::get
#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for record store operations.
pub type Result<T> = std::result::Result<T, RecordStoreError>;
