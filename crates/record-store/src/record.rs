//! The persisted note record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored time-locked note.
///
/// `(id, fingerprint)` together form the access token; neither half is
/// useful alone. `unlock_at` is stored verbatim because it cannot be
/// re-derived from `round` without the chain's genesis/period constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Fresh UUIDv4, never reused
    pub id: String,
    /// Hex SHA-256 of `blob`
    pub fingerprint: String,
    /// Sealed bytes: `local_key || nonce || ciphertext+tag`
    pub blob: Vec<u8>,
    /// Beacon round whose randomness opens the blob
    pub round: u64,
    /// Instant before which decryption refuses
    pub unlock_at: DateTime<Utc>,
}

impl Record {
    /// Build a record around a sealed blob, drawing a fresh id.
    pub fn new(
        blob: Vec<u8>,
        fingerprint: impl Into<String>,
        round: u64,
        unlock_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fingerprint: fingerprint.into(),
            blob,
            round,
            unlock_at,
        }
    }
}
