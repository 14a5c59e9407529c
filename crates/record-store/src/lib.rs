//! SQLite-backed record store for Capsule
//!
//! Persists sealed note records under the composite `(id, fingerprint)`
//! access token and retires them a fixed window after their unlock instant.
//! The store knows nothing about the time-lock codec; the two compose at the
//! caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use record_store::{Record, RecordStore};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), record_store::RecordStoreError> {
//! # let (sealed_blob, fingerprint_hex) = (vec![0u8; 60], "0".repeat(64));
//! # let (round, unlock_at) = (4_000_000u64, chrono::Utc::now());
//! let store = RecordStore::new(Path::new("/var/lib/capsule/records.db")).await?;
//!
//! let record = Record::new(sealed_blob, fingerprint_hex, round, unlock_at);
//! store.save(&record).await?;
//!
//! // Only the exact (id, fingerprint) pair reads it back
//! let found = store.get(&record.id, &record.fingerprint).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod record;
mod store;

pub use error::{RecordStoreError, Result};
pub use record::Record;
pub use store::{RecordStore, DEFAULT_RETENTION};
