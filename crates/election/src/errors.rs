//! Errors that can occur while computing an election.

use relection_primitives::BlockHeight;
use thiserror::Error;

/// Errors returned by an [`EntropyOracle`](crate::EntropyOracle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntropyError {
    /// The oracle has no entropy for the height yet.
    #[error("no entropy available for height {height}")]
    Unavailable {
        /// The height that was queried.
        height: BlockHeight,
    },
}

/// Errors that can occur while computing an election.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElectionError {
    /// The registry has no relayers at all, active or not.
    #[error("no relayers are registered")]
    NoRelayers,

    /// The entropy oracle could not provide a seed.
    #[error("entropy oracle failed: {0}")]
    Entropy(#[from] EntropyError),
}

/// The result type for election queries.
pub type ElectionResult<T> = Result<T, ElectionError>;
