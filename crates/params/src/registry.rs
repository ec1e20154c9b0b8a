//! Parameters for the relayer registry such as the minimum stake, the length of an election period
//! and the activation buffer.

use std::{fs, path::Path};

use relection_primitives::Stake;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::default::{ACTIVATION_BUFFER, MIN_STAKE, PERIOD_LENGTH};
use crate::errors::ParamsError;

/// The registry parameters that are fixed at deployment and shared by every evaluator.
///
/// Differences in these values between two evaluators lead to different activation heights and
/// therefore to different elects for the same period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryParams {
    /// The minimum [`Stake`] a relayer must post to register.
    pub min_stake: Stake,

    /// The number of heights in one election period.
    pub period_length: u64,

    /// The number of heights at the end of a period during which a join or leave request only
    /// takes effect one period later than usual.
    pub activation_buffer: u64,
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            min_stake: MIN_STAKE,
            period_length: PERIOD_LENGTH,
            activation_buffer: ACTIVATION_BUFFER,
        }
    }
}

impl RegistryParams {
    /// Checks that the parameters describe a usable schedule.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.period_length == 0 {
            return Err(ParamsError::ZeroPeriodLength);
        }

        if self.activation_buffer >= self.period_length {
            return Err(ParamsError::BufferTooLarge {
                buffer: self.activation_buffer,
                period_length: self.period_length,
            });
        }

        Ok(())
    }

    /// Parses and validates the parameters from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ParamsError> {
        let params = toml::from_str::<Self>(s)?;
        debug!(?params, "parsed registry params");

        params.validate()?;

        Ok(params)
    }

    /// Reads, parses and validates the parameters from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&contents)
    }
}
