//! Period arithmetic and the delayed-boundary rule shared by activation and deactivation.

use relection_params::prelude::{ParamsError, RegistryParams};
use relection_primitives::BlockHeight;
use serde::{Deserialize, Serialize};

/// The period layout of a registry.
///
/// A period is the half-open range of heights `[k * period_length, (k + 1) * period_length)`.
/// Join and leave requests take effect at a period start computed by
/// [`Schedule::schedule_boundary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schedule {
    period_length: u64,
    activation_buffer: u64,
}

impl Schedule {
    /// Creates a schedule from a period length and an activation buffer.
    ///
    /// `period_length` must be non-zero. Outside this crate schedules are built from validated
    /// [`RegistryParams`] instead.
    pub(crate) const fn new(period_length: u64, activation_buffer: u64) -> Self {
        Self {
            period_length,
            activation_buffer,
        }
    }

    /// Returns the number of heights in a period.
    pub const fn period_length(&self) -> u64 {
        self.period_length
    }

    /// Returns the number of trailing heights in a period that push a change back by one period.
    pub const fn activation_buffer(&self) -> u64 {
        self.activation_buffer
    }

    /// Returns the first height of the period containing `height`.
    pub const fn period_start(&self, height: BlockHeight) -> BlockHeight {
        height - height % self.period_length
    }

    /// Returns the first height of the period after the one containing `height`.
    pub const fn next_period_start(&self, height: BlockHeight) -> BlockHeight {
        self.period_start(height).saturating_add(self.period_length)
    }

    /// Returns the height at which a join or leave request made at `height` takes effect.
    ///
    /// This is the start of the next period, or of the one after it if `height` lies within the
    /// last `activation_buffer` heights of its own period.
    pub const fn schedule_boundary(&self, height: BlockHeight) -> BlockHeight {
        let next = self.next_period_start(height);

        if height >= next.saturating_sub(self.activation_buffer) {
            next.saturating_add(self.period_length)
        } else {
            next
        }
    }

    /// Returns the height whose entropy seeds the election of the period containing `height`.
    ///
    /// This is the last height of the previous period, so the seed is fixed before the period
    /// begins. The very first period has no predecessor and uses height `0`.
    pub const fn seed_height(&self, height: BlockHeight) -> BlockHeight {
        self.period_start(height).saturating_sub(1)
    }
}

impl TryFrom<&RegistryParams> for Schedule {
    type Error = ParamsError;

    fn try_from(params: &RegistryParams) -> Result<Self, Self::Error> {
        params.validate()?;

        Ok(Self::new(params.period_length, params.activation_buffer))
    }
}

impl Default for Schedule {
    fn default() -> Self {
        let params = RegistryParams::default();

        Self::new(params.period_length, params.activation_buffer)
    }
}
