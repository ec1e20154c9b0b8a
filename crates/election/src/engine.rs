//! The election engine: maps a seed onto the relayers that are active in a period.

use ethnum::U256;
use relection_primitives::{BlockHeight, RelayerAddress, Seed, SelectionKey};
use relection_registry::RelayerRegistry;
use tracing::{debug, trace};

use crate::{
    entropy::EntropyOracle,
    errors::{ElectionError, ElectionResult},
};

/// The outcome of an election, with everything needed to audit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Election {
    /// The first height of the period the election applies to.
    pub period_start: BlockHeight,

    /// The height whose entropy seeded the election.
    pub seed_height: BlockHeight,

    /// The seed answered by the oracle.
    pub seed: Seed,

    /// The relayers that were active in the period, in slot order.
    pub candidates: Vec<RelayerAddress>,

    /// The position of the elect within `candidates`.
    pub index: usize,

    /// The elected relayer.
    pub elect: RelayerAddress,
}

/// Computes elects from a [`RelayerRegistry`] and an [`EntropyOracle`].
#[derive(Debug, Clone)]
pub struct ElectionEngine<O> {
    oracle: O,
}

impl<O: EntropyOracle> ElectionEngine<O> {
    /// Creates an engine that draws seeds from `oracle`.
    pub const fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Returns the oracle the engine draws seeds from.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns a mutable reference to the oracle, e.g. to record newly observed blocks.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Runs the election for the period containing `height` and for `key`.
    ///
    /// Returns `None` if relayers are registered but none of them is active at `height`, and
    /// [`ElectionError::NoRelayers`] if the registry is empty.
    pub fn elect(
        &self,
        registry: &RelayerRegistry,
        height: BlockHeight,
        key: &SelectionKey,
    ) -> ElectionResult<Option<Election>> {
        if registry.is_empty() {
            return Err(ElectionError::NoRelayers);
        }

        let schedule = registry.schedule();
        let period_start = schedule.period_start(height);
        let seed_height = schedule.seed_height(height);

        let candidates: Vec<_> = registry.active_relayers(height).collect();
        debug!(%height, %period_start, candidates = candidates.len(), "running election");

        if candidates.is_empty() {
            return Ok(None);
        }

        let seed = self.oracle.entropy(seed_height, key)?;
        let index = select_index(seed, candidates.len());
        let elect = candidates[index];
        trace!(%seed_height, %seed, %index, %elect, "elected relayer");

        Ok(Some(Election {
            period_start,
            seed_height,
            seed,
            candidates,
            index,
            elect,
        }))
    }

    /// Returns the elect for the period containing `height` and for `key`, if any relayer is
    /// active.
    pub fn elected_for(
        &self,
        registry: &RelayerRegistry,
        height: BlockHeight,
        key: &SelectionKey,
    ) -> ElectionResult<Option<RelayerAddress>> {
        Ok(self
            .elect(registry, height, key)?
            .map(|election| election.elect))
    }

    /// Returns whether `address` is the elect for the period containing `height` and for `key`.
    ///
    /// Inactive, pending and unknown addresses are never elected.
    pub fn is_elected(
        &self,
        registry: &RelayerRegistry,
        address: &RelayerAddress,
        height: BlockHeight,
        key: &SelectionKey,
    ) -> ElectionResult<bool> {
        Ok(self.elected_for(registry, height, key)? == Some(*address))
    }
}

/// Maps `seed` onto a position in `[0, candidates)`.
///
/// `candidates` must be non-zero.
pub fn select_index(seed: Seed, candidates: usize) -> usize {
    // the remainder is below `candidates`, so it fits back into a usize.
    (seed % U256::from(candidates as u64)).as_usize()
}
