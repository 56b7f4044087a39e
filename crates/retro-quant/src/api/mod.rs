//! Unified error type for the public API.

mod error;

pub use error::QuantizeError;
