//! Registry and dispatcher for webcrypt
//!
//! This crate owns the policy layer: it resolves algorithm identifiers to
//! implementations and enforces usage, extractability and algorithm-match
//! rules before any implementation runs.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod dispatch;
pub mod platform;
pub mod registry;

pub use dispatch::Dispatcher;
pub use registry::{AlgorithmRegistry, RegistryBuilder};
