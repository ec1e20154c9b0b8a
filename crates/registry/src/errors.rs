//! Errors that can occur while mutating the relayer registry.

use relection_primitives::{BlockHeight, RelayerAddress, Stake};
use thiserror::Error;

/// Errors that can occur while registering, deregistering or withdrawing a relayer.
///
/// Every error leaves the registry exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The posted stake is below the configured minimum.
    #[error("stake {stake} is below the minimum of {min_stake}")]
    InsufficientStake {
        /// The stake that was posted.
        stake: Stake,
        /// The minimum stake required.
        min_stake: Stake,
    },

    /// The address already holds a record.
    #[error("relayer {0} is already registered")]
    AlreadyRegistered(RelayerAddress),

    /// The address holds no record.
    #[error("relayer {0} is not registered")]
    NotRegistered(RelayerAddress),

    /// A deregistration is already pending for the address.
    #[error("relayer {address} is already deregistering at height {deactive_since}")]
    AlreadyDeregistering {
        /// The relayer that tried to deregister again.
        address: RelayerAddress,
        /// The height at which the pending deregistration takes effect.
        deactive_since: BlockHeight,
    },

    /// The stake cannot be withdrawn yet.
    ///
    /// Either no deregistration was requested (`deactive_since` is `None`) or it has not taken
    /// effect at `height`.
    #[error(
        "relayer {address} cannot withdraw at height {height} (deactive since {deactive_since:?})"
    )]
    NotYetDeactivated {
        /// The relayer that tried to withdraw.
        address: RelayerAddress,
        /// The height at which the withdrawal was attempted.
        height: BlockHeight,
        /// The height at which the relayer stops being eligible, if deregistering.
        deactive_since: Option<BlockHeight>,
    },

    /// Accepting the stake would push the total held by the registry past 256 bits.
    #[error("stake {stake} overflows the total of {total} held by the registry")]
    StakeOverflow {
        /// The stake that could not be added.
        stake: Stake,
        /// The total held before adding it.
        total: Stake,
    },

    /// A snapshot could not be restored because it violates a registry invariant.
    #[error("invalid registry snapshot: {0}")]
    InvalidSnapshot(String),
}

/// The result type for operations on the relayer registry.
pub type RegistryResult<T> = Result<T, RegistryError>;
