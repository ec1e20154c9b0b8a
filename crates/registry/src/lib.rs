//! # Relection Registry
//!
//! Parties post a stake to join a pool of relayers that are eligible for periodic election. The
//! registry keeps the stake of every relayer together with the heights at which it becomes, and
//! stops being, eligible.
//!
//! Joining and leaving never take effect immediately. A request made at height `h` takes effect at
//! the start of the next period, unless `h` falls within the last `activation_buffer` heights of
//! its period, in which case it takes effect one period later still. The seed that decides the
//! elect of a period is pinned to the height right before that period begins; the buffer makes
//! sure that nobody can observe that seed and still change the set of relayers it selects from.
//!
//! Relayers are kept in a dense array so that the election can map a seed to a slot, and removed
//! by swapping the last slot into the freed one.

pub mod errors;
pub mod ledger;
pub mod lifecycle;
pub mod record;


pub use errors::{RegistryError, RegistryResult};
pub use ledger::{RegistrySnapshot, RelayerRegistry};
pub use lifecycle::Schedule;
pub use record::RelayerRecord;
