//! Core value types: heights, stakes, relayer identities and selection keys.

use std::{fmt, str::FromStr};

use arbitrary::{Arbitrary, Unstructured};
use ethnum::U256;
use serde::{
    de::{self, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::errors::ParseIdentityError;

/// Monotonic position counter of the host ledger.
pub type BlockHeight = u64;

/// The integer drawn from the entropy oracle for a given height and [`SelectionKey`].
///
/// Oracles typically derive this from a 256-bit block hash, so the full width is kept and reduction
/// modulo the candidate count happens in 256-bit arithmetic.
pub type Seed = U256;

/// An amount of stake, denominated in the smallest unit of the host currency.
///
/// Amounts are 256-bit so that any stake the host ledger can transfer is represented exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stake(U256);

impl Stake {
    /// No stake at all.
    pub const ZERO: Stake = Stake(U256::ZERO);

    /// The largest representable stake.
    pub const MAX: Stake = Stake(U256::MAX);

    /// Number of base units in one whole coin.
    pub const ONE_COIN: u64 = 1_000_000_000_000_000_000;

    /// Creates a stake from a 256-bit amount of base units.
    pub const fn new(wei: U256) -> Self {
        Self(wei)
    }

    /// Creates a stake from base units.
    pub const fn from_wei(wei: u64) -> Self {
        Self(U256::new(wei as u128))
    }

    /// Creates a stake from a whole number of coins.
    pub const fn from_coins(coins: u64) -> Self {
        // `u64::MAX` coins still fit in a u128 worth of base units.
        Self(U256::new(coins as u128 * Self::ONE_COIN as u128))
    }

    /// Returns the stake in base units.
    pub const fn to_wei(self) -> U256 {
        self.0
    }

    /// Adds two stakes, returning `None` on overflow.
    pub fn checked_add(self, rhs: Stake) -> Option<Stake> {
        self.0.checked_add(rhs.0).map(Stake)
    }

    /// Subtracts `rhs` from `self`, returning `None` on underflow.
    pub fn checked_sub(self, rhs: Stake) -> Option<Stake> {
        self.0.checked_sub(rhs.0).map(Stake)
    }
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

impl From<u64> for Stake {
    fn from(wei: u64) -> Self {
        Self::from_wei(wei)
    }
}

impl From<U256> for Stake {
    fn from(wei: U256) -> Self {
        Self(wei)
    }
}

impl<'a> Arbitrary<'a> for Stake {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let (hi, lo) = <(u128, u128)>::arbitrary(u)?;

        Ok(Self(U256::from_words(hi, lo)))
    }
}

// Serialized as a decimal string; plain integers are accepted on input.
impl Serialize for Stake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Stake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StakeVisitor)
    }
}

struct StakeVisitor;

impl Visitor<'_> for StakeVisitor {
    type Value = Stake;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Stake, E> {
        Ok(Stake::from_wei(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Stake, E> {
        u64::try_from(v)
            .map(Stake::from_wei)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Stake, E> {
        Ok(Stake(U256::new(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Stake, E> {
        U256::from_str_radix(v, 10)
            .map(Stake)
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

/// Implements hex `Display`, `FromStr` and string-based serde for a fixed-size byte identity.
macro_rules! impl_hex_identity {
    ($name:ident, $len:expr) => {
        impl $name {
            /// Size of the identity in bytes.
            pub const LEN: usize = $len;

            /// Creates the identity from raw bytes.
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Returns the raw bytes.
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdentityError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let decoded = hex::decode(s)?;
                let bytes: [u8; $len] =
                    decoded
                        .try_into()
                        .map_err(|v: Vec<u8>| ParseIdentityError::InvalidLength {
                            expected: $len,
                            actual: v.len(),
                        })?;

                Ok(Self(bytes))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// The identity of a relayer, as seen by the host ledger.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Arbitrary)]
pub struct RelayerAddress([u8; 20]);

impl_hex_identity!(RelayerAddress, 20);

/// Discriminator that lets several independent elections run within the same period.
///
/// Each key draws its own seed from the entropy oracle. Callers that only ever need a single elect
/// per period use [`SelectionKey::DEFAULT`].
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Arbitrary)]
pub struct SelectionKey([u8; 32]);

impl_hex_identity!(SelectionKey, 32);

impl SelectionKey {
    /// The sentinel key for the single-elect-per-period case.
    pub const DEFAULT: SelectionKey = SelectionKey([0u8; 32]);
}
