//! SQLite-backed persistence for note records.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
    Row,
};

use crate::error::Result;
use crate::record::Record;

/// How long a record outlives its unlock instant before it is purged.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Store for time-locked note records.
///
/// Records are addressed by the composite `(id, fingerprint)` key and become
/// unreadable at `unlock_at + retention`. A lookup that misses on either key
/// component, or hits an expired row, is the same `None`; an attacker holding
/// an id but not the fingerprint learns nothing from the store's answers.
#[derive(Debug, Clone)]
pub struct RecordStore {
    pool: SqlitePool,
    retention: Duration,
}

impl RecordStore {
    /// Open (or create) a store backed by the database file at `path`.
    pub async fn new(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Create an in-memory store.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self {
            pool,
            retention: DEFAULT_RETENTION,
        };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Override the retention window (default [`DEFAULT_RETENTION`]).
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Persist a record. The expiry deadline is fixed at save time.
    ///
    /// Ids are drawn fresh per record, so two saves never race on the same
    /// key; a conflict surfaces as a database error rather than an overwrite.
    pub async fn save(&self, record: &Record) -> Result<()> {
        let now = Utc::now().timestamp();
        let expires_at = record
            .unlock_at
            .timestamp()
            .saturating_add(self.retention.as_secs() as i64);

        sqlx::query(
            r#"
            INSERT INTO records (id, fingerprint, blob, round, unlock_at, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.fingerprint)
        .bind(&record.blob)
        .bind(record.round as i64)
        .bind(record.unlock_at.timestamp())
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %record.id, round = record.round, expires_at, "saved record");
        Ok(())
    }

    /// Fetch a record by its full composite key.
    ///
    /// Returns `None` for an unknown id, a wrong fingerprint, or a record
    /// past its retention deadline, with no way to tell which.
    pub async fn get(&self, id: &str, fingerprint: &str) -> Result<Option<Record>> {
        self.get_at(id, fingerprint, Utc::now()).await
    }

    async fn get_at(
        &self,
        id: &str,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Record>> {
        let row = sqlx::query(
            r#"
            SELECT id, fingerprint, blob, round, unlock_at
            FROM records
            WHERE id = ? AND fingerprint = ? AND expires_at > ?
            "#,
        )
        .bind(id)
        .bind(fingerprint)
        .bind(now.timestamp())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Record {
            id: r.get("id"),
            fingerprint: r.get("fingerprint"),
            blob: r.get("blob"),
            round: r.get::<i64, _>("round") as u64,
            unlock_at: Utc
                .timestamp_opt(r.get::<i64, _>("unlock_at"), 0)
                .single()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }))
    }

    /// Delete a record explicitly. Returns whether a row was removed.
    pub async fn delete(&self, id: &str, fingerprint: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM records WHERE id = ? AND fingerprint = ?
            "#,
        )
        .bind(id)
        .bind(fingerprint)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Sweep rows past their retention deadline. Returns the number removed.
    ///
    /// The read path already filters on `expires_at`, so this only reclaims
    /// space; the `get` contract holds with or without the sweep.
    pub async fn purge_expired(&self) -> Result<u64> {
        self.purge_expired_at(Utc::now()).await
    }

    async fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM records WHERE expires_at <= ?
            "#,
        )
        .bind(now.timestamp())
        .execute(&self.pool)
        .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            tracing::debug!(purged, "purged expired records");
        }
        Ok(purged)
    }
}

#[cfg(test)]
impl RecordStore {
    /// Count live rows, ignoring expiry.
    async fn count_rows(&self) -> Result<i64> {
        let row = sqlx::query(r#"SELECT COUNT(*) as count FROM records"#)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }
}
