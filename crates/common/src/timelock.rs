//! Time-lock codec
//!
//! Seals a plaintext so it cannot be opened before a chosen beacon round.
//! The sealed blob carries a locally drawn AES-256-GCM key in the clear; the
//! key that actually opens the ciphertext is that local key XORed with the
//! beacon randomness for the unlock round. Until the beacon publishes the
//! round, that value does not exist anywhere, including on the machine that
//! did the sealing.
//!
//! Blob layout (fixed offsets): `local_key (32) || nonce (12) || ciphertext+tag`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::beacon::{Beacon, BeaconError};
use crate::chain::ChainInfo;

/// Size of the local AES-256-GCM key in bytes
pub const KEY_SIZE: usize = 32;
/// Size of the AES-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the SHA-256 fingerprint in bytes
pub const FINGERPRINT_SIZE: usize = 32;
/// Minimum length of a well-formed blob (key + nonce, before any ciphertext)
pub const BLOB_HEADER_SIZE: usize = KEY_SIZE + NONCE_SIZE;

/// Errors from sealing or opening a time-locked blob.
#[derive(Debug, thiserror::Error)]
pub enum TimeLockError {
    /// Unlock instant does not map to a strictly future round
    #[error("unlock time {unlock_at} does not reach a future beacon round")]
    InvalidUnlockTime { unlock_at: DateTime<Utc> },
    /// Local clock has not reached the round's publish instant; retry later
    #[error("too early to decrypt, unlocks at {unlock_at}")]
    TooEarly { unlock_at: DateTime<Utc> },
    /// Beacon randomness could not be fetched; transient, retryable
    #[error("beacon unavailable: {0}")]
    BeaconUnavailable(#[from] BeaconError),
    /// Blob too short to contain the key/nonce header
    #[error("malformed ciphertext: {len} bytes, need at least 44")]
    MalformedCiphertext { len: usize },
    /// Beacon returned a zero-length randomness value
    #[error("beacon returned empty randomness")]
    InvalidRandomness,
    /// Authentication failed: wrong randomness, corrupted blob, or tampering
    #[error("decryption failed")]
    DecryptionFailed,
    /// OS random source failed to produce key material
    #[error("failed to draw random bytes: {0}")]
    Rng(String),
    /// AEAD seal failed (plaintext exceeds the scheme's limits)
    #[error("encryption failed")]
    EncryptionFailed,
}

/// Output of a successful [`TimeLock::encrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// `local_key || nonce || ciphertext+tag`, the unit to persist
    pub blob: Vec<u8>,
    /// SHA-256 of `blob`; binds the access token to the exact stored bytes
    pub fingerprint: [u8; FINGERPRINT_SIZE],
    /// Beacon round whose randomness is needed to open the blob
    pub round: u64,
}

impl Sealed {
    /// Hex form of the fingerprint, as used in access tokens and store keys.
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint)
    }
}

/// The time-lock codec for one beacon chain.
///
/// Pure and stateless; safe to share and call concurrently. The beacon is a
/// capability handed into [`decrypt`](Self::decrypt), never ambient state.
#[derive(Debug, Clone, Default)]
pub struct TimeLock {
    chain: ChainInfo,
}

impl TimeLock {
    pub fn new(chain: ChainInfo) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ChainInfo {
        &self.chain
    }

    /// Seal `plaintext` so it cannot be opened before `unlock_at`.
    pub fn encrypt(&self, plaintext: &[u8], unlock_at: DateTime<Utc>) -> Result<Sealed, TimeLockError> {
        self.encrypt_at(plaintext, unlock_at, Utc::now())
    }

    /// [`encrypt`](Self::encrypt) with an explicit clock.
    ///
    /// The unlock round must be strictly greater than the round at `now`;
    /// under floor arithmetic an instant later in the same round still maps
    /// to the current round and is rejected.
    pub fn encrypt_at(
        &self,
        plaintext: &[u8],
        unlock_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Sealed, TimeLockError> {
        let now_round = self.chain.round_at(now);
        let unlock_round = self.chain.round_at(unlock_at);
        if unlock_round <= now_round {
            return Err(TimeLockError::InvalidUnlockTime { unlock_at });
        }

        // Fresh key material per call, never reused across blobs
        let mut local_key = [0u8; KEY_SIZE];
        getrandom::getrandom(&mut local_key).map_err(|e| TimeLockError::Rng(e.to_string()))?;
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes).map_err(|e| TimeLockError::Rng(e.to_string()))?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&local_key));
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| TimeLockError::EncryptionFailed)?;

        let mut blob = Vec::with_capacity(BLOB_HEADER_SIZE + ciphertext.len());
        blob.extend_from_slice(&local_key);
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);

        let fingerprint: [u8; FINGERPRINT_SIZE] = Sha256::digest(&blob).into();

        Ok(Sealed {
            blob,
            fingerprint,
            round: unlock_round,
        })
    }

    /// Open a sealed blob, provided `round` has been published.
    pub async fn decrypt(
        &self,
        blob: &[u8],
        round: u64,
        beacon: &dyn Beacon,
    ) -> Result<Vec<u8>, TimeLockError> {
        self.decrypt_at(blob, round, beacon, Utc::now()).await
    }

    /// [`decrypt`](Self::decrypt) with an explicit clock.
    ///
    /// The clock gate runs before any beacon call. It is a fast-path guard;
    /// the actual lock is that the beacon has not published `round` yet.
    pub async fn decrypt_at(
        &self,
        blob: &[u8],
        round: u64,
        beacon: &dyn Beacon,
        now: DateTime<Utc>,
    ) -> Result<Vec<u8>, TimeLockError> {
        let unlock_at = self.chain.unlock_time(round);
        if now < unlock_at {
            return Err(TimeLockError::TooEarly { unlock_at });
        }

        let randomness = beacon.fetch_randomness(round).await?;

        if blob.len() < BLOB_HEADER_SIZE {
            return Err(TimeLockError::MalformedCiphertext { len: blob.len() });
        }
        let local_key = &blob[..KEY_SIZE];
        let nonce = &blob[KEY_SIZE..BLOB_HEADER_SIZE];
        let ciphertext = &blob[BLOB_HEADER_SIZE..];

        if randomness.is_empty() {
            return Err(TimeLockError::InvalidRandomness);
        }

        // The opening key exists only once the round randomness does
        let mut actual_key = [0u8; KEY_SIZE];
        for (i, byte) in actual_key.iter_mut().enumerate() {
            *byte = local_key[i] ^ randomness[i % randomness.len()];
        }

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&actual_key));
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| TimeLockError::DecryptionFailed)
    }
}
