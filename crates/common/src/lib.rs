/**
 * Randomness beacon capability.
 *  - `Beacon` trait, passed explicitly into
 *    the codec (no global client state)
 *  - HTTP adapter for the public drand
 *    endpoints
 */
pub mod beacon;
/**
 * Beacon network round schedule.
 *  Maps wall-clock instants to drand round
 *  numbers and back. Genesis/period are
 *  configuration, never recomputed.
 */
pub mod chain;
/**
 * Deterministic beacon fakes for tests.
 */
pub mod testkit;
/**
 * The time-lock codec itself.
 * Seals a plaintext so it cannot be opened
 *  before a chosen round's randomness has
 *  been published.
 */
pub mod timelock;

pub mod prelude {
    pub use crate::beacon::{Beacon, BeaconError, HttpBeacon, HttpBeaconConfig};
    pub use crate::chain::ChainInfo;
    pub use crate::timelock::{Sealed, TimeLock, TimeLockError};
}
