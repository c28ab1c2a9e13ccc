//! Host record processing

pub mod convert;

pub use convert::{coords_from_host, error_from_host, position_from_host};
