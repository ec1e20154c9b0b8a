//! The operations exposed to callers of the relayer registry.

use relection_election::{Election, ElectionEngine, EntropyOracle};
use relection_params::prelude::RegistryParams;
use relection_primitives::{BlockHeight, RelayerAddress, SelectionKey, Stake};
use relection_registry::RelayerRegistry;
use tracing::debug;

use crate::{
    errors::RelectionResult,
    host::{HeightSource, StakeVault},
};

/// A relayer registry wired to its host: a height source, an entropy oracle and a stake vault.
///
/// Mutating operations take `&mut self`; wrap the instance in a
/// [`SharedRelection`](crate::SharedRelection) to serve concurrent callers.
#[derive(Debug)]
pub struct Relection<H, O, V> {
    registry: RelayerRegistry,
    engine: ElectionEngine<O>,
    height: H,
    vault: V,
}

impl<H, O, V> Relection<H, O, V>
where
    H: HeightSource,
    O: EntropyOracle,
    V: StakeVault,
{
    /// Creates an instance with an empty registry.
    pub fn new(params: &RegistryParams, height: H, oracle: O, vault: V) -> RelectionResult<Self> {
        let registry = RelayerRegistry::new(params)?;

        Ok(Self::from_parts(registry, height, oracle, vault))
    }

    /// Creates an instance around an existing registry, e.g. one restored from a snapshot.
    pub const fn from_parts(registry: RelayerRegistry, height: H, oracle: O, vault: V) -> Self {
        Self {
            registry,
            engine: ElectionEngine::new(oracle),
            height,
            vault,
        }
    }

    /// Registers `caller` with the attached `stake`.
    ///
    /// Returns the height from which `caller` is eligible for election. The stake is only taken
    /// into custody if the registration is accepted, and the registration only happens once the
    /// vault holds the stake.
    pub fn register(
        &mut self,
        caller: RelayerAddress,
        stake: Stake,
    ) -> RelectionResult<BlockHeight> {
        let height = self.height.current_height();

        self.registry.check_register(caller, stake)?;
        self.vault.accept_stake(caller, stake)?;

        Ok(self.registry.register(caller, stake, height)?)
    }

    /// Requests the deregistration of `caller`.
    ///
    /// Returns the height from which `caller` is no longer eligible and may withdraw.
    pub fn deregister(&mut self, caller: RelayerAddress) -> RelectionResult<BlockHeight> {
        let height = self.height.current_height();

        Ok(self.registry.deregister(caller, height)?)
    }

    /// Removes `caller` from the registry and refunds its stake.
    pub fn withdraw(&mut self, caller: RelayerAddress) -> RelectionResult<Stake> {
        let height = self.height.current_height();

        let stake = self.registry.check_withdraw(caller, height)?;
        self.vault.return_stake(caller, stake)?;

        Ok(self.registry.withdraw(caller, height)?)
    }

    /// Returns the number of registered relayers, active or not.
    pub fn relayers_count(&self) -> usize {
        self.registry.relayers_count()
    }

    /// Returns the relayer occupying `slot`, if any.
    pub fn relayer_at(&self, slot: usize) -> Option<RelayerAddress> {
        self.registry.relayer_at(slot)
    }

    /// Returns the elect for `key` in the current period.
    pub fn get_elect(&self, key: &SelectionKey) -> RelectionResult<Option<RelayerAddress>> {
        let height = self.height.current_height();

        Ok(self.engine.elected_for(&self.registry, height, key)?)
    }

    /// Returns whether `address` is the elect for `key` in the current period.
    pub fn is_elected(
        &self,
        address: &RelayerAddress,
        key: &SelectionKey,
    ) -> RelectionResult<bool> {
        let height = self.height.current_height();
        let elected = self.engine.is_elected(&self.registry, address, height, key)?;
        debug!(%address, %key, %height, %elected, "checked election");

        Ok(elected)
    }

    /// Returns the full election for `key` in the current period, for auditing.
    pub fn election(&self, key: &SelectionKey) -> RelectionResult<Option<Election>> {
        let height = self.height.current_height();

        Ok(self.engine.elect(&self.registry, height, key)?)
    }

    /// Returns the registry.
    pub const fn registry(&self) -> &RelayerRegistry {
        &self.registry
    }

    /// Returns the vault holding the stakes.
    pub const fn vault(&self) -> &V {
        &self.vault
    }

    /// Returns the entropy oracle.
    pub const fn oracle(&self) -> &O {
        self.engine.oracle()
    }

    /// Returns a mutable reference to the entropy oracle, e.g. to record newly observed blocks.
    pub fn oracle_mut(&mut self) -> &mut O {
        self.engine.oracle_mut()
    }

    /// Returns the height source.
    pub const fn height_source(&self) -> &H {
        &self.height
    }
}
