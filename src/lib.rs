//! Retrokit - retro palette quantization and pixel-art restoration
//!
//! HTTP service and CLI around the `retro-quant` engine.
//! This library exposes modules for integration testing.

pub mod api;
pub mod cli;
pub mod error;
pub mod imaging;
pub mod models;
pub mod server;
pub mod services;
