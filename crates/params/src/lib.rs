//! This crate contains the consensus-critical parameters that dictate the behavior of the relayer
//! registry in a way that ensures that every evaluator of an election comes to the same result.

mod default;
pub mod errors;
pub mod prelude;
pub mod registry;
