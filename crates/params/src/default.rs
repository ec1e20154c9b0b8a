//! Default values for the registry parameters.

use relection_primitives::Stake;

/// Default minimum stake a relayer must post to be registered.
pub(crate) const MIN_STAKE: Stake = Stake::from_coins(1);

/// Default number of heights in one election period.
pub(crate) const PERIOD_LENGTH: u64 = 5;

/// Default number of heights at the end of a period during which join and leave requests are
/// pushed back by one additional period.
pub(crate) const ACTIVATION_BUFFER: u64 = 2;
