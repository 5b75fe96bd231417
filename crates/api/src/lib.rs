//! Public API traits and types for webcrypt
//!
//! This crate provides the public API surface shared by the dispatcher, the
//! algorithm implementations and their callers: the error type, the key and
//! algorithm data model, and the capability traits.

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate level for convenience
pub use error::{validate, Error, ErrorKind, Result, ResultExt};
pub use types::*;

// Re-export all traits from the traits module
pub use traits::{AlgorithmImplementation, Digestor};
