//! A cloneable handle that serializes access to a [`Relection`] instance.

use std::sync::Arc;

use parking_lot::Mutex;
use relection_election::{Election, EntropyOracle};
use relection_primitives::{BlockHeight, RelayerAddress, SelectionKey, Stake};

use crate::{
    errors::RelectionResult,
    host::{HeightSource, StakeVault},
    service::Relection,
};

/// A handle to a [`Relection`] instance that can be shared between threads.
///
/// Each operation holds the lock for its full duration, so operations are applied one at a time,
/// in the order in which they acquire the lock, and callers observe either the full effect of an
/// operation or none of it.
#[derive(Debug)]
pub struct SharedRelection<H, O, V> {
    inner: Arc<Mutex<Relection<H, O, V>>>,
}

impl<H, O, V> Clone for SharedRelection<H, O, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H, O, V> SharedRelection<H, O, V>
where
    H: HeightSource,
    O: EntropyOracle,
    V: StakeVault,
{
    /// Wraps `relection` in a shared handle.
    pub fn new(relection: Relection<H, O, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(relection)),
        }
    }

    /// See [`Relection::register`].
    pub fn register(&self, caller: RelayerAddress, stake: Stake) -> RelectionResult<BlockHeight> {
        self.inner.lock().register(caller, stake)
    }

    /// See [`Relection::deregister`].
    pub fn deregister(&self, caller: RelayerAddress) -> RelectionResult<BlockHeight> {
        self.inner.lock().deregister(caller)
    }

    /// See [`Relection::withdraw`].
    pub fn withdraw(&self, caller: RelayerAddress) -> RelectionResult<Stake> {
        self.inner.lock().withdraw(caller)
    }

    /// See [`Relection::relayers_count`].
    pub fn relayers_count(&self) -> usize {
        self.inner.lock().relayers_count()
    }

    /// See [`Relection::relayer_at`].
    pub fn relayer_at(&self, slot: usize) -> Option<RelayerAddress> {
        self.inner.lock().relayer_at(slot)
    }

    /// See [`Relection::get_elect`].
    pub fn get_elect(&self, key: &SelectionKey) -> RelectionResult<Option<RelayerAddress>> {
        self.inner.lock().get_elect(key)
    }

    /// See [`Relection::is_elected`].
    pub fn is_elected(
        &self,
        address: &RelayerAddress,
        key: &SelectionKey,
    ) -> RelectionResult<bool> {
        self.inner.lock().is_elected(address, key)
    }

    /// See [`Relection::election`].
    pub fn election(&self, key: &SelectionKey) -> RelectionResult<Option<Election>> {
        self.inner.lock().election(key)
    }

    /// Runs `f` with exclusive access to the underlying instance.
    pub fn with<R>(&self, f: impl FnOnce(&mut Relection<H, O, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
