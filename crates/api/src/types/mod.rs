//! Core data model for the webcrypt dispatcher
//!
//! Algorithms and [`CryptoData`] views are transient and scoped to one call.
//! Keys are created by an implementation and owned by the caller for their
//! whole usable lifetime.

pub mod algorithm;
pub mod data;
pub mod key;
pub mod secret;

pub use algorithm::{
    Algorithm, AlgorithmId, AlgorithmParams, HashId, KeyAlgorithm, KeyAlgorithmParams,
};
pub use data::CryptoData;
pub use key::{
    GenerateKeyResult, Key, KeyFormat, KeyHandle, KeyPair, KeyType, KeyUsage, UsageMask,
};
pub use secret::SecretVec;
