//! HTTP adapter for the public drand API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Beacon, BeaconError};

/// Chain hash of the League of Entropy mainnet
pub const DEFAULT_CHAIN_HASH: &str =
    "8990e7a9aaed2ffed73dbd7092123d6f289930540d7651336225dc172e51b2ce";

/// Timeout applied to each round fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for [`HttpBeacon`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpBeaconConfig {
    /// Public API endpoints, tried in order
    pub endpoints: Vec<Url>,
    /// Hex chain hash identifying the beacon chain on those endpoints
    pub chain_hash: String,
}

impl Default for HttpBeaconConfig {
    fn default() -> Self {
        let endpoints = ["https://api.drand.sh", "https://drand.cloudflare.com"]
            .iter()
            .filter_map(|u| Url::parse(u).ok())
            .collect();
        Self {
            endpoints,
            chain_hash: DEFAULT_CHAIN_HASH.to_string(),
        }
    }
}

/// One round as served by `GET /{chain_hash}/public/{round}`.
#[derive(Debug, Deserialize)]
struct RoundPayload {
    round: u64,
    /// Hex-encoded randomness value
    randomness: String,
}

/// [`Beacon`] over the public drand HTTP endpoints.
///
/// Endpoints are tried in order; the first parsed answer wins and the last
/// failure is reported if none do.
#[derive(Debug, Clone)]
pub struct HttpBeacon {
    config: HttpBeaconConfig,
    client: Client,
}

impl HttpBeacon {
    pub fn new(config: HttpBeaconConfig) -> Result<Self, BeaconError> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { config, client })
    }

    async fn fetch_from(&self, endpoint: &Url, round: u64) -> Result<Vec<u8>, BeaconError> {
        let url = endpoint
            .join(&format!("{}/public/{}", self.config.chain_hash, round))
            .map_err(|e| BeaconError::InvalidPayload(e.to_string()))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(BeaconError::Status(
                response.status(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let payload: RoundPayload = response
            .json()
            .await
            .map_err(|e| BeaconError::InvalidPayload(e.to_string()))?;
        if payload.round != round {
            return Err(BeaconError::InvalidPayload(format!(
                "asked for round {}, got {}",
                round, payload.round
            )));
        }
        hex::decode(&payload.randomness)
            .map_err(|e| BeaconError::InvalidPayload(format!("bad randomness hex: {}", e)))
    }
}

#[async_trait]
impl Beacon for HttpBeacon {
    async fn fetch_randomness(&self, round: u64) -> Result<Vec<u8>, BeaconError> {
        let mut last_err = None;
        for endpoint in &self.config.endpoints {
            match self.fetch_from(endpoint, round).await {
                Ok(randomness) => {
                    tracing::debug!(round, endpoint = %endpoint, "fetched beacon randomness");
                    return Ok(randomness);
                }
                Err(e) => {
                    tracing::warn!(round, endpoint = %endpoint, error = %e, "beacon endpoint failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            BeaconError::Unavailable("no beacon endpoints configured".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_payload_parses_drand_response() {
        let body = r#"{
            "round": 1234,
            "randomness": "deadbeef00112233",
            "signature": "aabb",
            "previous_signature": "ccdd"
        }"#;
        let payload: RoundPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.round, 1234);
        assert_eq!(
            hex::decode(&payload.randomness).unwrap(),
            vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x11, 0x22, 0x33]
        );
    }

    #[test]
    fn round_payload_rejects_missing_fields() {
        let body = r#"{"signature": "aabb"}"#;
        assert!(serde_json::from_str::<RoundPayload>(body).is_err());
    }

    #[test]
    fn default_config_points_at_loe_mainnet() {
        let config = HttpBeaconConfig::default();
        assert_eq!(config.chain_hash, DEFAULT_CHAIN_HASH);
        assert_eq!(config.endpoints.len(), 2);
    }
}
