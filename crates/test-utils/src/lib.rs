//! This crate provides test-utilities for the relayer registry and the election engine.
//!
//! These utilities are mostly used to generate arbitrary relayer identities, selection keys and
//! seeds, either as one-off values or as proptest strategies.

pub mod arbitrary_generator;
pub mod relayers;
