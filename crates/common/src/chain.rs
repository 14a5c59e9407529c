//! Round schedule of a drand beacon network.
//!
//! A beacon chain publishes one randomness value per round. Round `r` becomes
//! available at `genesis + r * period`. Both constants are fixed per chain and
//! are carried as configuration so the codec can be pointed at a different
//! chain without touching the arithmetic.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Genesis of the League of Entropy mainnet chain (2020-07-22T14:37:30Z)
pub const LOE_MAINNET_GENESIS_UNIX: i64 = 1_595_431_050;
/// Round period of the League of Entropy mainnet chain
pub const LOE_MAINNET_PERIOD_SECS: u64 = 30;

/// Fixed constants of one beacon chain instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Unix timestamp (seconds) at which round 0 of the chain was published
    pub genesis_unix: i64,
    /// Seconds between consecutive rounds
    pub period_secs: u64,
}

impl Default for ChainInfo {
    fn default() -> Self {
        Self {
            genesis_unix: LOE_MAINNET_GENESIS_UNIX,
            period_secs: LOE_MAINNET_PERIOD_SECS,
        }
    }
}

impl ChainInfo {
    /// The round in effect at `instant`.
    ///
    /// Unsigned floor division over the schedule; instants at or before
    /// genesis clamp to round 0.
    pub fn round_at(&self, instant: DateTime<Utc>) -> u64 {
        let elapsed = instant.timestamp().saturating_sub(self.genesis_unix);
        if elapsed <= 0 {
            return 0;
        }
        (elapsed as u64) / self.period_secs
    }

    /// The instant at which the randomness for `round` is published.
    ///
    /// Rounds far enough out to overflow the timestamp range saturate to the
    /// maximum representable instant; callers treat that as "not yet".
    pub fn unlock_time(&self, round: u64) -> DateTime<Utc> {
        let offset = round.checked_mul(self.period_secs).and_then(|secs| {
            let secs = i64::try_from(secs).ok()?;
            self.genesis_unix.checked_add(secs)
        });
        match offset.and_then(|ts| Utc.timestamp_opt(ts, 0).single()) {
            Some(t) => t,
            None => DateTime::<Utc>::MAX_UTC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_chain() -> ChainInfo {
        ChainInfo {
            genesis_unix: 1_000_000,
            period_secs: 30,
        }
    }

    #[test]
    fn round_at_floors_within_period() {
        let chain = test_chain();
        let genesis = Utc.timestamp_opt(chain.genesis_unix, 0).single().unwrap();

        assert_eq!(chain.round_at(genesis), 0);
        assert_eq!(chain.round_at(genesis + Duration::seconds(29)), 0);
        assert_eq!(chain.round_at(genesis + Duration::seconds(30)), 1);
        assert_eq!(chain.round_at(genesis + Duration::seconds(89)), 2);
    }

    #[test]
    fn round_at_clamps_before_genesis() {
        let chain = test_chain();
        let before = Utc.timestamp_opt(chain.genesis_unix - 500, 0).single().unwrap();
        assert_eq!(chain.round_at(before), 0);
    }

    #[test]
    fn unlock_time_inverts_round_at_on_boundaries() {
        let chain = test_chain();
        for round in [0u64, 1, 7, 12_345] {
            let unlock = chain.unlock_time(round);
            assert_eq!(chain.round_at(unlock), round);
            assert_eq!(
                unlock.timestamp(),
                chain.genesis_unix + (round * chain.period_secs) as i64
            );
        }
    }

    #[test]
    fn unlock_time_saturates_on_overflow() {
        let chain = test_chain();
        assert_eq!(chain.unlock_time(u64::MAX), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn default_is_loe_mainnet() {
        let chain = ChainInfo::default();
        assert_eq!(chain.genesis_unix, LOE_MAINNET_GENESIS_UNIX);
        assert_eq!(chain.period_secs, LOE_MAINNET_PERIOD_SECS);
    }
}
