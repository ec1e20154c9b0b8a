//! Tests for the election engine against a live registry.


use ethnum::U256;
use relection_params::prelude::RegistryParams;
use relection_primitives::{BlockHeight, RelayerAddress, SelectionKey, Stake};
use relection_registry::RelayerRegistry;
use relection_test_utils::relayers::{test_address, test_key};

use crate::{ElectionEngine, ElectionError, EntropyError, PinnedEntropy};

fn test_registry() -> RelayerRegistry {
    RelayerRegistry::new(&RegistryParams::default()).expect("default params must be valid")
}

/// Registers `n` relayers at `height` and returns them in slot order.
fn register_relayers(
    registry: &mut RelayerRegistry,
    n: u8,
    height: BlockHeight,
) -> Vec<RelayerAddress> {
    (1..=n)
        .map(|i| {
            let address = test_address(i);
            registry
                .register(address, Stake::from_coins(1), height)
                .unwrap();
            address
        })
        .collect()
}

#[test]
fn test_empty_registry_fails_with_no_relayers() {
    let registry = test_registry();
    let engine = ElectionEngine::new(PinnedEntropy::new());

    assert_eq!(
        engine.elected_for(&registry, 10, &SelectionKey::DEFAULT),
        Err(ElectionError::NoRelayers)
    );
    assert_eq!(
        engine.is_elected(&registry, &test_address(1), 10, &SelectionKey::DEFAULT),
        Err(ElectionError::NoRelayers)
    );
}

#[test]
fn test_no_elect_while_pending() {
    let mut registry = test_registry();
    let relayers = register_relayers(&mut registry, 2, 0);
    let engine = ElectionEngine::new(PinnedEntropy::new());

    for height in 0..5 {
        assert_eq!(
            engine.elected_for(&registry, height, &SelectionKey::DEFAULT),
            Ok(None),
            "nobody is active at height {height}"
        );
        for relayer in &relayers {
            assert_eq!(
                engine.is_elected(&registry, relayer, height, &SelectionKey::DEFAULT),
                Ok(false)
            );
        }
    }
}

#[test]
fn test_pinned_seed_scenario() {
    let mut registry = test_registry();
    let relayers = register_relayers(&mut registry, 3, 0);
    let engine = ElectionEngine::new(PinnedEntropy::from_heights([(4, 1), (9, 0), (14, 2)]));

    for height in 5..20 {
        let expected = match height {
            5..=9 => 1,
            10..=14 => 0,
            _ => 2,
        };

        for (i, relayer) in relayers.iter().enumerate() {
            assert_eq!(
                engine
                    .is_elected(&registry, relayer, height, &SelectionKey::DEFAULT)
                    .unwrap(),
                i == expected,
                "relayer {i} at height {height}"
            );
        }
    }
}

#[test]
fn test_single_relayer_always_elected() {
    let mut registry = test_registry();
    let relayers = register_relayers(&mut registry, 1, 0);

    let mut oracle = PinnedEntropy::new();
    oracle.pin_height(4, U256::MAX);
    let engine = ElectionEngine::new(oracle);

    let election = engine
        .elect(&registry, 7, &SelectionKey::DEFAULT)
        .unwrap()
        .unwrap();
    assert_eq!(election.elect, relayers[0]);
    assert_eq!(election.index, 0);
    assert_eq!(election.period_start, 5);
    assert_eq!(election.seed_height, 4);
    assert_eq!(election.seed, U256::MAX);
}

#[test]
fn test_unknown_and_pending_addresses_never_elected() {
    let mut registry = test_registry();
    register_relayers(&mut registry, 2, 0);
    let late = test_address(9);
    registry.register(late, Stake::from_coins(1), 4).unwrap();

    let engine = ElectionEngine::new(PinnedEntropy::from_heights([(4, 2)]));

    // two active relayers, seed 2 selects the first; the late one is still pending.
    assert_eq!(
        engine.elected_for(&registry, 5, &SelectionKey::DEFAULT),
        Ok(Some(test_address(1)))
    );
    assert_eq!(
        engine.is_elected(&registry, &late, 5, &SelectionKey::DEFAULT),
        Ok(false)
    );
    assert_eq!(
        engine.is_elected(&registry, &test_address(42), 5, &SelectionKey::DEFAULT),
        Ok(false)
    );
}

#[test]
fn test_deregistered_relayer_drops_out() {
    let mut registry = test_registry();
    let relayers = register_relayers(&mut registry, 2, 0);
    registry.deregister(relayers[0], 6).unwrap();

    let engine = ElectionEngine::new(PinnedEntropy::from_heights([(4, 0), (9, 0)]));

    assert_eq!(
        engine.elected_for(&registry, 9, &SelectionKey::DEFAULT),
        Ok(Some(relayers[0]))
    );
    assert_eq!(
        engine.elected_for(&registry, 10, &SelectionKey::DEFAULT),
        Ok(Some(relayers[1])),
        "only the remaining relayer can be elected once the first deactivates"
    );

    registry.deregister(relayers[1], 10).unwrap();
    assert_eq!(
        engine.elected_for(&registry, 15, &SelectionKey::DEFAULT),
        Ok(None),
        "registered but inactive relayers yield no elect rather than an error"
    );
}

#[test]
fn test_keys_draw_independent_seeds() {
    let mut registry = test_registry();
    let relayers = register_relayers(&mut registry, 3, 0);

    let (k1, k2) = (test_key(1), test_key(2));
    let mut oracle = PinnedEntropy::new();
    oracle
        .pin(4, k1, U256::from(0u64))
        .pin(4, k2, U256::from(2u64));
    let engine = ElectionEngine::new(oracle);

    assert_eq!(engine.elected_for(&registry, 5, &k1), Ok(Some(relayers[0])));
    assert_eq!(engine.elected_for(&registry, 5, &k2), Ok(Some(relayers[2])));

    for key in [k1, k2] {
        let elected = relayers
            .iter()
            .filter(|relayer| engine.is_elected(&registry, relayer, 5, &key).unwrap())
            .count();
        assert_eq!(elected, 1);
    }
}

#[test]
fn test_missing_entropy_is_surfaced() {
    let mut registry = test_registry();
    register_relayers(&mut registry, 2, 0);
    let engine = ElectionEngine::new(PinnedEntropy::new());

    assert_eq!(
        engine.elected_for(&registry, 5, &SelectionKey::DEFAULT),
        Err(ElectionError::Entropy(EntropyError::Unavailable { height: 4 }))
    );
}

#[test]
fn test_election_is_stable_within_period() {
    let mut registry = test_registry();
    register_relayers(&mut registry, 4, 0);
    let engine = ElectionEngine::new(PinnedEntropy::from_heights([(4, 7)]));

    let first = engine
        .elect(&registry, 5, &SelectionKey::DEFAULT)
        .unwrap()
        .unwrap();
    for height in 6..10 {
        let election = engine
            .elect(&registry, height, &SelectionKey::DEFAULT)
            .unwrap()
            .unwrap();
        assert_eq!(election, first);
    }
    assert_eq!(first.index, 3);
}
