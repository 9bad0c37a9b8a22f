//! CLI command implementations.

pub mod adiabatic;
pub mod common;
pub mod embed;
pub mod generate;
pub mod phase;
pub mod qaoa;
pub mod solve;
pub mod version;
