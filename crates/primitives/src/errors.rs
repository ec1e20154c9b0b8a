//! Errors for parsing primitive identities.

use thiserror::Error;

/// Error while parsing a hex-encoded identity such as a
/// [`RelayerAddress`](crate::RelayerAddress) or a [`SelectionKey`](crate::SelectionKey).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseIdentityError {
    /// The string is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The decoded bytes have the wrong length.
    #[error("expected {expected} bytes, got {actual} bytes")]
    InvalidLength {
        /// The number of bytes the identity must have.
        expected: usize,
        /// The number of bytes that were decoded.
        actual: usize,
    },
}
