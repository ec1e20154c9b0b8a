//! Interfaces consumed from the host environment and simple in-process implementations of them.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use relection_primitives::{BlockHeight, RelayerAddress, Stake};
use tracing::{debug, error};

use crate::errors::VaultError;

/// Monotonic position counter of the host ledger.
pub trait HeightSource {
    /// Returns the current height.
    fn current_height(&self) -> BlockHeight;
}

impl<F> HeightSource for F
where
    F: Fn() -> BlockHeight,
{
    fn current_height(&self) -> BlockHeight {
        self()
    }
}

/// Value-transfer primitives used to hold and refund stake.
///
/// Both operations are only invoked after the registry has validated the request. A failing
/// operation must leave the vault unchanged; the registry is then left unchanged too.
pub trait StakeVault {
    /// Takes custody of `amount` posted by `from`.
    fn accept_stake(&mut self, from: RelayerAddress, amount: Stake) -> Result<(), VaultError>;

    /// Returns `amount` to `to`.
    fn return_stake(&mut self, to: RelayerAddress, amount: Stake) -> Result<(), VaultError>;
}

/// A height counter shared between the host, which advances it as blocks arrive, and the
/// registry, which reads it.
#[derive(Debug, Clone, Default)]
pub struct AtomicHeight(Arc<AtomicU64>);

impl AtomicHeight {
    /// Creates a counter starting at `height`.
    pub fn new(height: BlockHeight) -> Self {
        Self(Arc::new(AtomicU64::new(height)))
    }

    /// Moves the counter to `height`.
    ///
    /// The counter never moves backwards; a lower height is ignored.
    pub fn set(&self, height: BlockHeight) {
        self.0.fetch_max(height, Ordering::AcqRel);
    }

    /// Advances the counter by `blocks` and returns the new height.
    pub fn advance(&self, blocks: u64) -> BlockHeight {
        let previous = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |h| {
                Some(h.saturating_add(blocks))
            })
            .unwrap_or_else(|h| h);

        previous.saturating_add(blocks)
    }
}

impl HeightSource for AtomicHeight {
    fn current_height(&self) -> BlockHeight {
        self.0.load(Ordering::Acquire)
    }
}

/// A vault that keeps custody of stake in memory and credits refunds to per-address balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryVault {
    held: Stake,
    refunds: BTreeMap<RelayerAddress, Stake>,
}

impl InMemoryVault {
    /// Creates an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total stake in custody.
    pub const fn held(&self) -> Stake {
        self.held
    }

    /// Returns the total stake refunded to `address` so far.
    pub fn refunded(&self, address: &RelayerAddress) -> Stake {
        self.refunds.get(address).copied().unwrap_or_default()
    }
}

impl StakeVault for InMemoryVault {
    fn accept_stake(&mut self, from: RelayerAddress, amount: Stake) -> Result<(), VaultError> {
        let held = self.held;
        self.held = held.checked_add(amount).ok_or_else(|| {
            error!(%from, %amount, %held, "vault custody overflowed");

            VaultError::CustodyOverflow { from, amount, held }
        })?;

        debug!(%from, %amount, "accepted stake");

        Ok(())
    }

    fn return_stake(&mut self, to: RelayerAddress, amount: Stake) -> Result<(), VaultError> {
        let held = self.held;
        let remaining = held.checked_sub(amount).ok_or_else(|| {
            error!(%to, %amount, %held, "returning more stake than held");

            VaultError::InsufficientCustody { to, amount, held }
        })?;
        let refunded = self
            .refunded(&to)
            .checked_add(amount)
            .ok_or(VaultError::RefundOverflow { to, amount })?;

        self.held = remaining;
        self.refunds.insert(to, refunded);

        debug!(%to, %amount, "returned stake");

        Ok(())
    }
}
