//! Core types and constants for position fixes

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
