//! Fixtures and proptest strategies for relayer identities, selection keys and seeds.

use ethnum::U256;
use proptest::prelude::*;
use relection_primitives::{RelayerAddress, Seed, SelectionKey};

/// Returns a deterministic address whose bytes are all `n`.
///
/// Useful when a test needs a handful of distinct, readable relayers.
pub fn test_address(n: u8) -> RelayerAddress {
    RelayerAddress::new([n; RelayerAddress::LEN])
}

/// Returns a deterministic selection key whose bytes are all `n`.
pub fn test_key(n: u8) -> SelectionKey {
    SelectionKey::new([n; SelectionKey::LEN])
}

/// Generates an arbitrary [`RelayerAddress`].
pub fn arb_address() -> impl Strategy<Value = RelayerAddress> {
    any::<[u8; 20]>().prop_map(RelayerAddress::new)
}

/// Generates between `1` and `max` distinct addresses.
pub fn arb_addresses(max: usize) -> impl Strategy<Value = Vec<RelayerAddress>> {
    proptest::collection::btree_set(arb_address(), 1..=max.max(1))
        .prop_map(|set| set.into_iter().collect())
}

/// Generates an arbitrary [`SelectionKey`].
pub fn arb_selection_key() -> impl Strategy<Value = SelectionKey> {
    any::<[u8; 32]>().prop_map(SelectionKey::new)
}

/// Generates an arbitrary 256-bit [`Seed`].
pub fn arb_seed() -> impl Strategy<Value = Seed> {
    any::<[u8; 32]>().prop_map(U256::from_be_bytes)
}
