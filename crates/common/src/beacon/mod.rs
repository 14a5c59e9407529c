//! Randomness beacon capability.
//!
//! The codec never talks to a process-wide client. Whoever calls
//! [`decrypt`](crate::timelock::TimeLock::decrypt) hands in a [`Beacon`],
//! which makes the external dependency explicit and lets tests substitute a
//! deterministic fake (see [`crate::testkit`]).

use async_trait::async_trait;

mod http;

pub use http::{HttpBeacon, HttpBeaconConfig};

/// Errors from fetching beacon randomness.
#[derive(Debug, thiserror::Error)]
pub enum BeaconError {
    /// HTTP transport failure, including request timeouts
    #[error("beacon request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Beacon answered with a non-success status (e.g. round not yet published)
    #[error("beacon returned HTTP {0}: {1}")]
    Status(reqwest::StatusCode, String),
    /// Response body did not parse as a beacon round payload
    #[error("invalid beacon payload: {0}")]
    InvalidPayload(String),
    /// No configured endpoint produced a usable answer
    #[error("beacon unavailable: {0}")]
    Unavailable(String),
}

/// A source of published beacon randomness.
///
/// `fetch_randomness` must return the network's randomness for a round that
/// has already been published; asking for an unpublished round errors within
/// the transport timeout rather than blocking.
#[async_trait]
pub trait Beacon: Send + Sync {
    async fn fetch_randomness(&self, round: u64) -> Result<Vec<u8>, BeaconError>;
}
