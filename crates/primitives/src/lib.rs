//! Primitive types shared across the relayer registry and the election engine.

pub mod errors;
pub mod types;

pub use errors::ParseIdentityError;
pub use types::{BlockHeight, RelayerAddress, Seed, SelectionKey, Stake};
