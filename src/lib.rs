//! # webcrypt
//!
//! A Web Crypto style operation dispatcher: an algorithm registry, key usage
//! and extractability policy, and key wrap/unwrap/derive composition on top
//! of RustCrypto and dalek primitives.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! webcrypt = "0.3"
//! ```
//!
//! The free functions in this crate run against the process-wide registry.
//! To restrict or extend the set of algorithms, build an
//! [`AlgorithmRegistry`] and call a [`Dispatcher`] bound to it.
//!
//! ## Features
//!
//! Every algorithm family is enabled by default:
//!
//! - `aes`: AES-GCM and AES-KW
//! - `hmac`: HMAC over SHA-1 and SHA-2
//! - `sha`: SHA-1, SHA-256, SHA-384 and SHA-512 digests
//! - `kdf`: HKDF and PBKDF2
//! - `ed25519`: Ed25519 signatures
//!
//! ## Crate Structure
//!
//! - [`webcrypt-api`]: error type, key and algorithm model, capability traits
//! - [`webcrypt-algorithms`]: the algorithm implementations
//! - [`webcrypt-core`]: registry, dispatcher and platform initialization,
//!   re-exported as [`engine`]

#![forbid(unsafe_code)]

pub use webcrypt_algorithms as algorithms;
pub use webcrypt_api as api;
pub use webcrypt_core as engine;

pub use webcrypt_api::{
    Algorithm, AlgorithmId, AlgorithmImplementation, AlgorithmParams, CryptoData, Digestor, Error,
    ErrorKind, GenerateKeyResult, HashId, Key, KeyAlgorithm, KeyAlgorithmParams, KeyFormat,
    KeyPair, KeyType, KeyUsage, Result, UsageMask,
};
pub use webcrypt_core::{AlgorithmRegistry, Dispatcher, RegistryBuilder};

/// Encrypt `data` under `key`
pub fn encrypt(algorithm: &Algorithm, key: &Key, data: &[u8]) -> Result<Vec<u8>> {
    Dispatcher::global().encrypt(algorithm, key, CryptoData::new(data))
}

/// Decrypt `data` under `key`
pub fn decrypt(algorithm: &Algorithm, key: &Key, data: &[u8]) -> Result<Vec<u8>> {
    Dispatcher::global().decrypt(algorithm, key, CryptoData::new(data))
}

/// Hash `data`
pub fn digest(algorithm: &Algorithm, data: &[u8]) -> Result<Vec<u8>> {
    Dispatcher::global().digest(algorithm, CryptoData::new(data))
}

/// Sign `data` with `key`
pub fn sign(algorithm: &Algorithm, key: &Key, data: &[u8]) -> Result<Vec<u8>> {
    Dispatcher::global().sign(algorithm, key, CryptoData::new(data))
}

/// Check `signature` over `data`
pub fn verify(algorithm: &Algorithm, key: &Key, signature: &[u8], data: &[u8]) -> Result<bool> {
    Dispatcher::global().verify(
        algorithm,
        key,
        CryptoData::new(signature),
        CryptoData::new(data),
    )
}

/// Generate a secret key or key pair
pub fn generate_key(
    algorithm: &Algorithm,
    extractable: bool,
    usages: UsageMask,
) -> Result<GenerateKeyResult> {
    Dispatcher::global().generate_key(algorithm, extractable, usages)
}

/// Parse `key_data` into a key
pub fn import_key(
    format: KeyFormat,
    key_data: &[u8],
    algorithm: &Algorithm,
    extractable: bool,
    usages: UsageMask,
) -> Result<Key> {
    Dispatcher::global().import_key(
        format,
        CryptoData::new(key_data),
        algorithm,
        extractable,
        usages,
    )
}

/// Serialize an extractable key
pub fn export_key(format: KeyFormat, key: &Key) -> Result<Vec<u8>> {
    Dispatcher::global().export_key(format, key)
}

/// Export `key` and encrypt it under `wrapping_key`
pub fn wrap_key(
    format: KeyFormat,
    key: &Key,
    wrapping_key: &Key,
    wrapping_algorithm: &Algorithm,
) -> Result<Vec<u8>> {
    Dispatcher::global().wrap_key(format, key, wrapping_key, wrapping_algorithm)
}

/// Decrypt `wrapped_key` and import the result
#[allow(clippy::too_many_arguments)]
pub fn unwrap_key(
    format: KeyFormat,
    wrapped_key: &[u8],
    wrapping_key: &Key,
    wrapping_algorithm: &Algorithm,
    algorithm: &Algorithm,
    extractable: bool,
    usages: UsageMask,
) -> Result<Key> {
    Dispatcher::global().unwrap_key(
        format,
        CryptoData::new(wrapped_key),
        wrapping_key,
        wrapping_algorithm,
        algorithm,
        extractable,
        usages,
    )
}

/// Derive `length_bits` bits from `base_key`
pub fn derive_bits(algorithm: &Algorithm, base_key: &Key, length_bits: u32) -> Result<Vec<u8>> {
    Dispatcher::global().derive_bits(algorithm, base_key, length_bits)
}

/// Derive a key for `derived_algorithm` from `base_key`
pub fn derive_key(
    algorithm: &Algorithm,
    base_key: &Key,
    derived_algorithm: &Algorithm,
    extractable: bool,
    usages: UsageMask,
) -> Result<Key> {
    Dispatcher::global().derive_key(algorithm, base_key, derived_algorithm, extractable, usages)
}

/// Start a streaming digest
pub fn create_digestor(algorithm: &Algorithm) -> Result<Box<dyn Digestor>> {
    Dispatcher::global().create_digestor(algorithm)
}

/// Serialize `key` for the structured-clone boundary
pub fn serialize_key_for_clone(key: &Key) -> Option<Vec<u8>> {
    Dispatcher::global().serialize_key_for_clone(key)
}

/// Rebuild a key from [`serialize_key_for_clone`] output
pub fn deserialize_key_for_clone(
    algorithm: &KeyAlgorithm,
    key_type: KeyType,
    extractable: bool,
    usages: UsageMask,
    key_data: &[u8],
) -> Option<Key> {
    Dispatcher::global().deserialize_key_for_clone(
        algorithm,
        key_type,
        extractable,
        usages,
        CryptoData::new(key_data),
    )
}

/// Common imports for webcrypt users
pub mod prelude {
    pub use crate::api::{Error, ErrorKind, Result};

    pub use crate::api::{
        Algorithm, AlgorithmId, CryptoData, GenerateKeyResult, HashId, Key, KeyFormat, KeyPair,
        KeyType, KeyUsage, UsageMask,
    };

    pub use crate::api::{AlgorithmImplementation, Digestor};

    pub use crate::engine::{AlgorithmRegistry, Dispatcher, RegistryBuilder};
}
