//! # Relection
//!
//! A staked relayer registry with periodic, seed-driven leader election.
//!
//! [`Relection`] is the boundary exposed to callers. Every operation identifies its caller
//! explicitly and reads the current height from a [`HeightSource`] once, so the operation is
//! applied at a single, well-defined height. Stake moves through a [`StakeVault`] only after the
//! registry has accepted the operation, and seeds come from an injected [`EntropyOracle`].
//!
//! [`SharedRelection`] serializes concurrent callers so that operations are atomic and totally
//! ordered.

pub mod errors;
pub mod host;
pub mod service;
pub mod shared;

#[cfg(test)]
mod tests;

pub use errors::{RelectionError, RelectionResult, VaultError};
pub use host::{AtomicHeight, HeightSource, InMemoryVault, StakeVault};
pub use relection_election::{
    BlockHashEntropy, Election, ElectionEngine, EntropyOracle, PinnedEntropy,
};
pub use relection_params::prelude::RegistryParams;
pub use relection_primitives::{BlockHeight, RelayerAddress, Seed, SelectionKey, Stake};
pub use relection_registry::{RegistrySnapshot, RelayerRecord, RelayerRegistry};
pub use service::Relection;
pub use shared::SharedRelection;
