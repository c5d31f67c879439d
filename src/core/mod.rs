//! Core types shared across the crate
//!
//! - `CorralError` / `CorralResult` - Error types

pub mod error;

pub use error::{CorralError, CorralResult};
