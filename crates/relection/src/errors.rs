//! Unified error type for the operations exposed to callers.

use relection_election::ElectionError;
use relection_params::prelude::ParamsError;
use relection_primitives::{RelayerAddress, Stake};
use relection_registry::RegistryError;
use thiserror::Error;

/// Errors raised by a [`StakeVault`](crate::StakeVault) when it cannot move stake.
///
/// A vault that fails leaves its balances untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// Taking `amount` into custody would overflow the stake held.
    #[error("accepting {amount} from {from} overflows the {held} in custody")]
    CustodyOverflow {
        /// The relayer posting the stake.
        from: RelayerAddress,
        /// The stake posted.
        amount: Stake,
        /// The stake in custody before the deposit.
        held: Stake,
    },

    /// The vault holds less than it is asked to return.
    #[error("cannot return {amount} to {to} with only {held} in custody")]
    InsufficientCustody {
        /// The relayer being refunded.
        to: RelayerAddress,
        /// The stake to return.
        amount: Stake,
        /// The stake in custody.
        held: Stake,
    },

    /// Crediting the refund would overflow the balance of the recipient.
    #[error("refunding {amount} to {to} overflows its balance")]
    RefundOverflow {
        /// The relayer being refunded.
        to: RelayerAddress,
        /// The stake to return.
        amount: Stake,
    },
}

/// Unified error type for everything that can happen in [`Relection`](crate::Relection).
#[derive(Debug, Error)]
pub enum RelectionError {
    /// The parameters the registry was created with are invalid.
    #[error("invalid registry params: {0}")]
    Params(#[from] ParamsError),

    /// A register, deregister or withdraw request was rejected.
    #[error("registry rejected the request: {0}")]
    Registry(#[from] RegistryError),

    /// The stake vault could not move the stake.
    #[error("stake vault failed: {0}")]
    Vault(#[from] VaultError),

    /// An election could not be computed.
    #[error("election failed: {0}")]
    Election(#[from] ElectionError),
}

/// The result type for operations exposed to callers.
pub type RelectionResult<T> = Result<T, RelectionError>;
