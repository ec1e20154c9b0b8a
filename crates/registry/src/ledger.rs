//! The stake ledger: the sole owner of relayer records and of the dense relayer array.

use std::collections::{BTreeMap, BTreeSet};

use relection_params::prelude::{ParamsError, RegistryParams};
use relection_primitives::{BlockHeight, RelayerAddress, Stake};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    errors::{RegistryError, RegistryResult},
    lifecycle::Schedule,
    record::RelayerRecord,
};

/// The state required to restore a [`RelayerRegistry`], with records in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// The records of all registered relayers, where the record at position `i` occupies slot `i`.
    pub relayers: Vec<RelayerRecord>,
}

/// Registry of staked relayers.
///
/// Relayers occupy a dense array of slots. A withdrawal moves the relayer in the last slot into
/// the freed one, so the array never has gaps and every record's `slot` always points back at its
/// own address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayerRegistry {
    min_stake: Stake,
    schedule: Schedule,
    slots: Vec<RelayerAddress>,
    records: BTreeMap<RelayerAddress, RelayerRecord>,
}

impl RelayerRegistry {
    /// Creates an empty registry after validating `params`.
    pub fn new(params: &RegistryParams) -> Result<Self, ParamsError> {
        Ok(Self {
            min_stake: params.min_stake,
            schedule: Schedule::try_from(params)?,
            slots: Vec::new(),
            records: BTreeMap::new(),
        })
    }

    /// Restores a registry from a [`RegistrySnapshot`].
    ///
    /// Every invariant of the registry is rechecked, so a tampered or truncated snapshot is
    /// rejected instead of producing a registry that elects inconsistently.
    pub fn restore(params: &RegistryParams, snapshot: RegistrySnapshot) -> RegistryResult<Self> {
        let schedule = Schedule::try_from(params)
            .map_err(|e| RegistryError::InvalidSnapshot(format!("invalid params: {e}")))?;

        let mut slots = Vec::with_capacity(snapshot.relayers.len());
        let mut records = BTreeMap::new();

        for (slot, record) in snapshot.relayers.into_iter().enumerate() {
            let address = record.address;

            if record.slot != slot {
                return Err(RegistryError::InvalidSnapshot(format!(
                    "relayer {address} at position {slot} claims slot {}",
                    record.slot
                )));
            }

            if record.stake < params.min_stake {
                return Err(RegistryError::InvalidSnapshot(format!(
                    "relayer {address} holds {} which is below the minimum",
                    record.stake
                )));
            }

            if record
                .deactive_since
                .is_some_and(|until| until < record.active_since)
            {
                return Err(RegistryError::InvalidSnapshot(format!(
                    "relayer {address} deactivates before it activates"
                )));
            }

            if records.insert(address, record).is_some() {
                return Err(RegistryError::InvalidSnapshot(format!(
                    "relayer {address} appears more than once"
                )));
            }

            slots.push(address);
        }

        let registry = Self {
            min_stake: params.min_stake,
            schedule,
            slots,
            records,
        };

        let total = registry.total_staked().map_err(|_| {
            RegistryError::InvalidSnapshot("total stake does not fit in 256 bits".to_string())
        })?;
        info!(relayers = registry.slots.len(), %total, "restored relayer registry");

        Ok(registry)
    }

    /// Returns the state that can be used to restore the registry.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            relayers: self.iter().cloned().collect(),
        }
    }

    /// Returns the period layout used for activation and election.
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Returns the minimum stake required to register.
    pub const fn min_stake(&self) -> Stake {
        self.min_stake
    }

    /// Checks whether `address` may register with `stake`, without mutating the registry.
    pub fn check_register(&self, address: RelayerAddress, stake: Stake) -> RegistryResult<()> {
        if stake < self.min_stake {
            warn!(
                %address, %stake, min_stake = %self.min_stake,
                "rejecting registration with insufficient stake"
            );

            return Err(RegistryError::InsufficientStake {
                stake,
                min_stake: self.min_stake,
            });
        }

        if self.records.contains_key(&address) {
            warn!(%address, "rejecting duplicate registration");

            return Err(RegistryError::AlreadyRegistered(address));
        }

        let total = self.total_staked()?;
        if total.checked_add(stake).is_none() {
            warn!(
                %address, %stake, %total,
                "rejecting registration that overflows the total stake"
            );

            return Err(RegistryError::StakeOverflow { stake, total });
        }

        Ok(())
    }

    /// Registers `address` with `stake` at `height`.
    ///
    /// Returns the height from which the relayer is eligible for election.
    pub fn register(
        &mut self,
        address: RelayerAddress,
        stake: Stake,
        height: BlockHeight,
    ) -> RegistryResult<BlockHeight> {
        self.check_register(address, stake)?;

        let active_since = self.schedule.schedule_boundary(height);
        let slot = self.slots.len();

        self.slots.push(address);
        self.records.insert(
            address,
            RelayerRecord {
                address,
                stake,
                active_since,
                deactive_since: None,
                slot,
            },
        );

        info!(%address, %stake, %height, %active_since, %slot, "registered relayer");

        Ok(active_since)
    }

    /// Requests the deregistration of `address` at `height`.
    ///
    /// Returns the height from which the relayer is no longer eligible for election and may
    /// withdraw its stake.
    pub fn deregister(
        &mut self,
        address: RelayerAddress,
        height: BlockHeight,
    ) -> RegistryResult<BlockHeight> {
        let deactive_since = self.schedule.schedule_boundary(height);

        let Some(record) = self.records.get_mut(&address) else {
            warn!(%address, "rejecting deregistration of unknown relayer");

            return Err(RegistryError::NotRegistered(address));
        };

        if let Some(pending) = record.deactive_since {
            warn!(%address, deactive_since = %pending, "rejecting duplicate deregistration");

            return Err(RegistryError::AlreadyDeregistering {
                address,
                deactive_since: pending,
            });
        }

        record.deactive_since = Some(deactive_since);

        info!(%address, %height, %deactive_since, "deregistering relayer");

        Ok(deactive_since)
    }

    /// Checks whether `address` may withdraw at `height`, without mutating the registry.
    ///
    /// Returns the stake a withdrawal would release.
    pub fn check_withdraw(
        &self,
        address: RelayerAddress,
        height: BlockHeight,
    ) -> RegistryResult<Stake> {
        let Some(record) = self.records.get(&address) else {
            warn!(%address, "rejecting withdrawal of unknown relayer");

            return Err(RegistryError::NotRegistered(address));
        };

        if !record.can_withdraw_at(height) {
            warn!(
                %address, %height, deactive_since = ?record.deactive_since,
                "rejecting early withdrawal"
            );

            return Err(RegistryError::NotYetDeactivated {
                address,
                height,
                deactive_since: record.deactive_since,
            });
        }

        Ok(record.stake)
    }

    /// Removes `address` from the registry at `height` and returns the stake it held.
    ///
    /// The relayer must have deregistered and `height` must have reached its deactivation height.
    pub fn withdraw(
        &mut self,
        address: RelayerAddress,
        height: BlockHeight,
    ) -> RegistryResult<Stake> {
        self.check_withdraw(address, height)?;

        let record = self
            .records
            .remove(&address)
            .ok_or(RegistryError::NotRegistered(address))?;
        let slot = record.slot;

        self.slots.swap_remove(slot);
        if let Some(moved) = self.slots.get(slot) {
            debug!(%moved, %slot, "moved last relayer into freed slot");

            if let Some(moved_record) = self.records.get_mut(moved) {
                moved_record.slot = slot;
            }
        }

        info!(%address, %height, stake = %record.stake, "withdrew relayer");

        Ok(record.stake)
    }

    /// Returns the number of occupied slots.
    ///
    /// This includes relayers that are not yet active and relayers that are deregistering but
    /// have not withdrawn.
    pub fn relayers_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether no relayer holds a slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the address occupying `slot`, if any.
    pub fn relayer_at(&self, slot: usize) -> Option<RelayerAddress> {
        self.slots.get(slot).copied()
    }

    /// Returns the record of `address`, if registered.
    pub fn relayer(&self, address: &RelayerAddress) -> Option<&RelayerRecord> {
        self.records.get(address)
    }

    /// Returns whether `address` is registered and eligible for election at `height`.
    pub fn is_active(&self, address: &RelayerAddress, height: BlockHeight) -> bool {
        self.records
            .get(address)
            .is_some_and(|record| record.is_active_at(height))
    }

    /// Iterates over all records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &RelayerRecord> + '_ {
        self.slots
            .iter()
            .filter_map(|address| self.records.get(address))
    }

    /// Iterates over the addresses eligible for election at `height`, in slot order.
    pub fn active_relayers(
        &self,
        height: BlockHeight,
    ) -> impl Iterator<Item = RelayerAddress> + '_ {
        self.iter()
            .filter(move |record| record.is_active_at(height))
            .map(|record| record.address)
    }

    /// Returns the sum of all stakes held by the registry.
    ///
    /// Registration keeps the sum within 256 bits, so this only fails for a registry whose records
    /// were tampered with.
    pub fn total_staked(&self) -> RegistryResult<Stake> {
        self.records.values().try_fold(Stake::ZERO, |total, record| {
            let stake = record.stake;

            total
                .checked_add(stake)
                .ok_or(RegistryError::StakeOverflow { stake, total })
        })
    }

    /// Checks that every slot points at a record that points back at the slot.
    ///
    /// Returns the addresses that violate the invariant.
    pub fn inconsistent_slots(&self) -> BTreeSet<RelayerAddress> {
        let mut bad: BTreeSet<_> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(slot, address)| {
                self.records
                    .get(*address)
                    .is_none_or(|record| record.slot != *slot)
            })
            .map(|(_, address)| *address)
            .collect();

        if self.records.len() != self.slots.len() {
            bad.extend(
                self.records
                    .keys()
                    .filter(|address| !self.slots.contains(address)),
            );
        }

        bad
    }
}
