//! Errors for the registry parameters.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Error while loading or validating [`RegistryParams`](crate::registry::RegistryParams).
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The parameters file could not be read.
    #[error("failed to read params file {path:?}: {source}")]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The parameters are not valid TOML or do not match the expected schema.
    #[error("failed to parse params: {0}")]
    Toml(#[from] toml::de::Error),

    /// A period must span at least one height.
    #[error("period length must be non-zero")]
    ZeroPeriodLength,

    /// The activation buffer must leave at least one height in each period during which join
    /// and leave requests take effect at the next period.
    #[error("activation buffer {buffer} must be less than the period length {period_length}")]
    BufferTooLarge {
        /// The configured activation buffer.
        buffer: u64,
        /// The configured period length.
        period_length: u64,
    },
}
