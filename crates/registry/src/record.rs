//! The per-relayer record held by the registry.

use relection_primitives::{BlockHeight, RelayerAddress, Stake};
use serde::{Deserialize, Serialize};

/// Everything the registry knows about one registered relayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerRecord {
    /// The identity of the relayer.
    pub address: RelayerAddress,

    /// The stake held on behalf of the relayer until it withdraws.
    pub stake: Stake,

    /// The height from which the relayer is eligible for election.
    pub active_since: BlockHeight,

    /// The height from which the relayer is no longer eligible, once it has asked to deregister.
    pub deactive_since: Option<BlockHeight>,

    /// The index of the relayer in the registry's dense array.
    pub slot: usize,
}

impl RelayerRecord {
    /// Returns whether the relayer is eligible for election at `height`.
    pub fn is_active_at(&self, height: BlockHeight) -> bool {
        height >= self.active_since && self.deactive_since.is_none_or(|until| height < until)
    }

    /// Returns whether a deregistration has been requested.
    pub const fn is_deregistering(&self) -> bool {
        self.deactive_since.is_some()
    }

    /// Returns whether the stake may be withdrawn at `height`.
    pub fn can_withdraw_at(&self, height: BlockHeight) -> bool {
        self.deactive_since.is_some_and(|until| height >= until)
    }
}
