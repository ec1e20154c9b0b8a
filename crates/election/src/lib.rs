//! # Relection Election
//!
//! For every period, and for every [`SelectionKey`](relection_primitives::SelectionKey), exactly
//! one of the relayers that are active in that period is the elect. The elect is derived from a
//! seed that an [`EntropyOracle`] answers for the last height of the previous period; the seed is
//! reduced modulo the number of active relayers and indexes into them in slot order.
//!
//! The engine never mutates the registry. Two evaluators holding the same registry state and the
//! same oracle answers always agree on the elect.

pub mod engine;
pub mod entropy;
pub mod errors;

#[cfg(test)]
mod tests;

pub use engine::{Election, ElectionEngine};
pub use entropy::{BlockHashEntropy, EntropyOracle, PinnedEntropy};
pub use errors::{ElectionError, ElectionResult, EntropyError};
