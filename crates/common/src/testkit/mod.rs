//! Deterministic beacon fakes for tests.
//!
//! The codec takes the beacon as an explicit capability, so substituting one
//! of these never touches shared state.

use async_trait::async_trait;

use crate::beacon::{Beacon, BeaconError};

/// Beacon returning the same randomness for every round.
///
/// An all-zero value is the XOR identity for the codec's key derivation and
/// plays the role of "the value this blob was locked against" in round-trip
/// tests.
#[derive(Debug, Clone)]
pub struct FixedBeacon {
    randomness: Vec<u8>,
}

impl FixedBeacon {
    pub fn new(randomness: Vec<u8>) -> Self {
        Self { randomness }
    }
}

#[async_trait]
impl Beacon for FixedBeacon {
    async fn fetch_randomness(&self, _round: u64) -> Result<Vec<u8>, BeaconError> {
        Ok(self.randomness.clone())
    }
}

/// Beacon that is always down.
#[derive(Debug, Clone, Copy)]
pub struct FailingBeacon;

#[async_trait]
impl Beacon for FailingBeacon {
    async fn fetch_randomness(&self, round: u64) -> Result<Vec<u8>, BeaconError> {
        Err(BeaconError::Unavailable(format!(
            "no endpoint could serve round {}",
            round
        )))
    }
}
