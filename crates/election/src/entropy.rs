//! The entropy oracle seam and the oracles shipped with the engine.

use std::{collections::BTreeMap, sync::Arc};

use ethnum::U256;
use relection_primitives::{BlockHeight, Seed, SelectionKey};
use sha2::{Digest, Sha256};
use tracing::{trace, warn};

use crate::errors::EntropyError;

/// Source of election seeds.
///
/// The answer for a height must be unpredictable until that height is reached and must never
/// change afterwards. Implementations should be unbiased enough that `seed mod n` is effectively
/// uniform for the relayer counts in use.
pub trait EntropyOracle {
    /// Returns the seed for `height` and `key`.
    fn entropy(&self, height: BlockHeight, key: &SelectionKey) -> Result<Seed, EntropyError>;
}

impl<T: EntropyOracle + ?Sized> EntropyOracle for &T {
    fn entropy(&self, height: BlockHeight, key: &SelectionKey) -> Result<Seed, EntropyError> {
        (**self).entropy(height, key)
    }
}

impl<T: EntropyOracle + ?Sized> EntropyOracle for Box<T> {
    fn entropy(&self, height: BlockHeight, key: &SelectionKey) -> Result<Seed, EntropyError> {
        (**self).entropy(height, key)
    }
}

impl<T: EntropyOracle + ?Sized> EntropyOracle for Arc<T> {
    fn entropy(&self, height: BlockHeight, key: &SelectionKey) -> Result<Seed, EntropyError> {
        (**self).entropy(height, key)
    }
}

/// An oracle that answers from a fixed table of seeds.
///
/// Seeds can be pinned for a specific `(height, key)` pair or for every key at a height; the more
/// specific entry wins. This is handy for replaying past elections and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedEntropy {
    keyed: BTreeMap<(BlockHeight, SelectionKey), Seed>,
    fallback: BTreeMap<BlockHeight, Seed>,
}

impl PinnedEntropy {
    /// Creates an oracle with no seeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `seed` for `height` and `key`.
    pub fn pin(&mut self, height: BlockHeight, key: SelectionKey, seed: Seed) -> &mut Self {
        self.keyed.insert((height, key), seed);
        self
    }

    /// Pins `seed` for every key at `height` that has no key-specific entry.
    pub fn pin_height(&mut self, height: BlockHeight, seed: Seed) -> &mut Self {
        self.fallback.insert(height, seed);
        self
    }

    /// Builds an oracle that answers `seed` for every key at each of the given heights.
    pub fn from_heights(seeds: impl IntoIterator<Item = (BlockHeight, u64)>) -> Self {
        let mut oracle = Self::new();
        for (height, seed) in seeds {
            oracle.pin_height(height, U256::from(seed));
        }

        oracle
    }
}

impl EntropyOracle for PinnedEntropy {
    fn entropy(&self, height: BlockHeight, key: &SelectionKey) -> Result<Seed, EntropyError> {
        self.keyed
            .get(&(height, *key))
            .or_else(|| self.fallback.get(&height))
            .copied()
            .ok_or(EntropyError::Unavailable { height })
    }
}

/// An oracle that derives seeds from the block hashes of the host chain.
///
/// The seed for `(height, key)` is `sha256(block_hash(height) || key)` read as a big-endian
/// 256-bit integer, so every key draws an independent seed from the same block. Hashes must be
/// recorded as blocks are observed; heights without a recorded hash have no entropy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHashEntropy {
    hashes: BTreeMap<BlockHeight, [u8; 32]>,
}

impl BlockHashEntropy {
    /// Creates an oracle with no recorded blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the hash of the block at `height`.
    ///
    /// Returns the previously recorded hash if the block was replaced, e.g. after a reorg.
    pub fn record_block(&mut self, height: BlockHeight, hash: [u8; 32]) -> Option<[u8; 32]> {
        let previous = self.hashes.insert(height, hash);

        if previous.is_some_and(|old| old != hash) {
            warn!(%height, "replaced recorded block hash");
        }

        previous
    }

    /// Forgets every block below `height`.
    pub fn prune_below(&mut self, height: BlockHeight) {
        self.hashes = self.hashes.split_off(&height);
    }

    /// Returns the recorded hash of the block at `height`, if any.
    pub fn block_hash(&self, height: BlockHeight) -> Option<&[u8; 32]> {
        self.hashes.get(&height)
    }
}

impl EntropyOracle for BlockHashEntropy {
    fn entropy(&self, height: BlockHeight, key: &SelectionKey) -> Result<Seed, EntropyError> {
        let hash = self
            .hashes
            .get(&height)
            .ok_or(EntropyError::Unavailable { height })?;

        let digest: [u8; 32] = Sha256::new()
            .chain_update(hash)
            .chain_update(key.as_bytes())
            .finalize()
            .into();
        trace!(%height, %key, "derived seed from block hash");

        Ok(U256::from_be_bytes(digest))
    }
}
