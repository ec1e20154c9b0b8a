//! End-to-end tests of the caller-facing operations.

use std::thread;

use relection_common::logging::{self, LoggerConfig};
use relection_election::{BlockHashEntropy, ElectionError, PinnedEntropy};
use relection_primitives::{RelayerAddress, SelectionKey, Stake};
use relection_registry::RegistryError;
use relection_test_utils::relayers::{test_address, test_key};

use crate::{
    AtomicHeight, InMemoryVault, RegistryParams, Relection, RelectionError, SharedRelection,
    StakeVault, VaultError,
};

type TestRelection = Relection<AtomicHeight, PinnedEntropy, InMemoryVault>;

fn test_relection(oracle: PinnedEntropy) -> (TestRelection, AtomicHeight) {
    logging::init(LoggerConfig::with_base_name("relection-tests"));

    let height = AtomicHeight::new(0);
    let relection = Relection::new(
        &RegistryParams::default(),
        height.clone(),
        oracle,
        InMemoryVault::new(),
    )
    .expect("default params must be valid");

    (relection, height)
}

#[test]
fn test_registration_lifecycle() {
    let (mut relection, height) = test_relection(PinnedEntropy::from_heights([(4, 0)]));
    let r1 = test_address(1);
    let key = test_key(0xaa);

    assert_eq!(relection.relayers_count(), 0);
    assert!(matches!(
        relection.is_elected(&r1, &key),
        Err(RelectionError::Election(ElectionError::NoRelayers))
    ));

    assert!(matches!(
        relection.register(r1, Stake::from_wei(Stake::ONE_COIN / 2)),
        Err(RelectionError::Registry(RegistryError::InsufficientStake { .. }))
    ));
    assert_eq!(
        relection.vault().held(),
        Stake::ZERO,
        "rejected stake must not be held"
    );

    assert_eq!(relection.register(r1, Stake::from_coins(1)).unwrap(), 5);
    assert_eq!(relection.vault().held(), Stake::from_coins(1));
    assert_eq!(relection.relayers_count(), 1);
    assert_eq!(relection.relayer_at(0), Some(r1));

    assert!(
        !relection.is_elected(&r1, &key).unwrap(),
        "not active before height 5"
    );
    assert_eq!(relection.get_elect(&key).unwrap(), None);

    height.set(5);
    assert!(relection.is_elected(&r1, &key).unwrap());
    assert_eq!(relection.get_elect(&key).unwrap(), Some(r1));

    assert!(matches!(
        relection.withdraw(r1),
        Err(RelectionError::Registry(RegistryError::NotYetDeactivated { .. }))
    ));

    assert_eq!(relection.deregister(r1).unwrap(), 10);
    height.set(9);
    assert!(relection.withdraw(r1).is_err());
    assert!(
        relection.is_elected(&r1, &key).unwrap(),
        "still active until deactivation"
    );

    height.set(10);
    assert_eq!(relection.withdraw(r1).unwrap(), Stake::from_coins(1));
    assert_eq!(relection.vault().held(), Stake::ZERO);
    assert_eq!(relection.vault().refunded(&r1), Stake::from_coins(1));
    assert_eq!(relection.relayers_count(), 0);
    assert_eq!(relection.relayer_at(0), None);
}

#[test]
fn test_three_relayers_follow_pinned_seeds() {
    let (mut relection, height) =
        test_relection(PinnedEntropy::from_heights([(4, 1), (9, 0), (14, 2)]));
    let relayers: Vec<RelayerAddress> = (1..=3).map(test_address).collect();

    for relayer in &relayers {
        assert_eq!(
            relection.register(*relayer, Stake::from_coins(1)).unwrap(),
            5
        );
    }

    for h in 5..20 {
        height.set(h);
        let expected = relayers[[1, 0, 2][(h as usize - 5) / 5]];

        assert_eq!(
            relection.get_elect(&SelectionKey::DEFAULT).unwrap(),
            Some(expected)
        );
        for relayer in &relayers {
            assert_eq!(
                relection.is_elected(relayer, &SelectionKey::DEFAULT).unwrap(),
                *relayer == expected,
                "relayer {relayer} at height {h}"
            );
        }
    }
}

#[test]
fn test_block_hash_oracle_end_to_end() {
    logging::init(LoggerConfig::default());

    let height = AtomicHeight::new(0);
    let mut relection = Relection::new(
        &RegistryParams::default(),
        height.clone(),
        BlockHashEntropy::new(),
        InMemoryVault::new(),
    )
    .unwrap();

    let relayers: Vec<_> = (1..=4).map(test_address).collect();
    for relayer in &relayers {
        relection.register(*relayer, Stake::from_coins(2)).unwrap();
    }

    for h in 0..10 {
        relection.oracle_mut().record_block(h, [h as u8 + 1; 32]);
    }
    height.set(7);

    let keys: Vec<_> = (0..8).map(test_key).collect();
    for key in &keys {
        let election = relection.election(key).unwrap().unwrap();
        assert_eq!(election.seed_height, 4);
        assert_eq!(election.candidates, relayers);

        let elected = relayers
            .iter()
            .filter(|relayer| relection.is_elected(relayer, key).unwrap())
            .count();
        assert_eq!(elected, 1, "exactly one elect for key {key}");
    }
}

#[test]
fn test_shared_relection_serializes_callers() {
    let (relection, height) = test_relection(PinnedEntropy::from_heights([(4, 3)]));
    let shared = SharedRelection::new(relection);

    let handles: Vec<_> = (1..=8u8)
        .map(|n| {
            let shared = shared.clone();
            thread::spawn(move || shared.register(test_address(n), Stake::from_coins(1)))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 5);
    }

    assert_eq!(shared.relayers_count(), 8);
    assert_eq!(
        shared.with(|relection| relection.vault().held()),
        Stake::from_coins(8)
    );
    shared.with(|relection| {
        assert!(relection.registry().inconsistent_slots().is_empty());
    });

    height.set(5);
    let elect = shared.get_elect(&SelectionKey::DEFAULT).unwrap().unwrap();
    assert_eq!(
        shared.relayer_at(3),
        Some(elect),
        "seed 3 selects the fourth slot"
    );
    assert!(shared.is_elected(&elect, &SelectionKey::DEFAULT).unwrap());

    assert!(matches!(
        shared.register(elect, Stake::from_coins(1)),
        Err(RelectionError::Registry(RegistryError::AlreadyRegistered(_)))
    ));
    assert_eq!(shared.deregister(elect).unwrap(), 10);
    assert!(shared.withdraw(elect).is_err());
}

#[test]
fn test_large_stakes_are_refunded_exactly() {
    let (mut relection, height) = test_relection(PinnedEntropy::new());
    let (r1, r2) = (test_address(1), test_address(2));
    let (twenty, eighteen) = (Stake::from_coins(20), Stake::from_coins(18));

    relection.register(r1, twenty).unwrap();
    relection.register(r2, eighteen).unwrap();
    assert_eq!(relection.vault().held(), Stake::from_coins(38));

    relection.deregister(r1).unwrap();
    height.set(5);

    assert_eq!(relection.withdraw(r1).unwrap(), twenty);
    assert_eq!(relection.vault().refunded(&r1), twenty);
    assert_eq!(
        relection.vault().held(),
        eighteen,
        "other custody must be untouched"
    );
    assert_eq!(relection.registry().total_staked().unwrap(), eighteen);
}

/// A vault that refuses every transfer.
#[derive(Debug, Default)]
struct FrozenVault;

impl StakeVault for FrozenVault {
    fn accept_stake(&mut self, from: RelayerAddress, amount: Stake) -> Result<(), VaultError> {
        Err(VaultError::CustodyOverflow {
            from,
            amount,
            held: Stake::MAX,
        })
    }

    fn return_stake(&mut self, to: RelayerAddress, amount: Stake) -> Result<(), VaultError> {
        Err(VaultError::InsufficientCustody {
            to,
            amount,
            held: Stake::ZERO,
        })
    }
}

#[test]
fn test_vault_failure_leaves_registry_untouched() {
    let height = AtomicHeight::new(0);
    let mut relection = Relection::new(
        &RegistryParams::default(),
        height.clone(),
        PinnedEntropy::new(),
        FrozenVault,
    )
    .unwrap();
    let r1 = test_address(1);

    assert!(matches!(
        relection.register(r1, Stake::from_coins(1)),
        Err(RelectionError::Vault(VaultError::CustodyOverflow { .. }))
    ));
    assert_eq!(relection.relayers_count(), 0);
    assert!(relection.registry().relayer(&r1).is_none());

    let mut registry = relection.registry().clone();
    registry.register(r1, Stake::from_coins(1), 0).unwrap();
    registry.deregister(r1, 0).unwrap();
    let mut relection =
        Relection::from_parts(registry, height.clone(), PinnedEntropy::new(), FrozenVault);
    height.set(5);

    assert!(matches!(
        relection.withdraw(r1),
        Err(RelectionError::Vault(VaultError::InsufficientCustody { .. }))
    ));
    assert_eq!(
        relection.relayer_at(0),
        Some(r1),
        "the record survives a failed refund"
    );
}
