//! Capability interface implemented once per algorithm family
//!
//! The dispatcher performs all usage, extractability and algorithm-match
//! policy before calling into an implementation, so implementations only
//! validate what is specific to their algorithm: parameters, key material,
//! and which usages are legal for a key of their family.
//!
//! Every operation has a default body that fails with
//! [`Error::NotSupported`]. An implementation overrides the subset it
//! supports; an unsupported call is always a distinguishable error, never a
//! silent no-op.
//!
//! # Thread safety
//!
//! Implementations live in a registry shared by every caller for the
//! lifetime of the process. They must be stateless or internally
//! synchronized, which the `Send + Sync` bound enforces.

use crate::error::{Error, Result};
use crate::types::{
    Algorithm, CryptoData, GenerateKeyResult, Key, KeyAlgorithm, KeyFormat, KeyType, UsageMask,
};

/// Primitive operations of one algorithm family
pub trait AlgorithmImplementation: Send + Sync {
    /// Encrypt `data` under `key`
    fn encrypt(&self, _algorithm: &Algorithm, _key: &Key, _data: CryptoData<'_>) -> Result<Vec<u8>> {
        Err(Error::not_supported("encrypt"))
    }

    /// Decrypt `data` under `key`
    fn decrypt(&self, _algorithm: &Algorithm, _key: &Key, _data: CryptoData<'_>) -> Result<Vec<u8>> {
        Err(Error::not_supported("decrypt"))
    }

    /// Hash `data`
    fn digest(&self, _algorithm: &Algorithm, _data: CryptoData<'_>) -> Result<Vec<u8>> {
        Err(Error::not_supported("digest"))
    }

    /// Sign `data` with `key`
    fn sign(&self, _algorithm: &Algorithm, _key: &Key, _data: CryptoData<'_>) -> Result<Vec<u8>> {
        Err(Error::not_supported("sign"))
    }

    /// Verify `signature` over `data`
    ///
    /// A well-formed signature that does not match is `Ok(false)`. Only
    /// malformed input is an error.
    fn verify(
        &self,
        _algorithm: &Algorithm,
        _key: &Key,
        _signature: CryptoData<'_>,
        _data: CryptoData<'_>,
    ) -> Result<bool> {
        Err(Error::not_supported("verify"))
    }

    /// Derive `length_bits` bits from `base_key`
    fn derive_bits(&self, _algorithm: &Algorithm, _base_key: &Key, _length_bits: u32) -> Result<Vec<u8>> {
        Err(Error::not_supported("deriveBits"))
    }

    /// Length in bits of a key created with `algorithm`, used by derive-key
    fn get_key_length(&self, _algorithm: &Algorithm) -> Result<u32> {
        Err(Error::not_supported("getKeyLength"))
    }

    /// Generate a secret key or a key pair
    ///
    /// The secret key, or the private key of a pair, must end up with a
    /// non-empty usage mask; the dispatcher treats anything else as an
    /// implementation bug.
    fn generate_key(
        &self,
        _algorithm: &Algorithm,
        _extractable: bool,
        _usages: UsageMask,
    ) -> Result<GenerateKeyResult> {
        Err(Error::not_supported("generateKey"))
    }

    /// Check that `usages` are legal for this family and `format`
    ///
    /// Called before any key bytes are parsed, and before wrapped key data is
    /// decrypted, so it must not depend on key material.
    fn verify_key_usages_before_import_key(&self, _format: KeyFormat, _usages: UsageMask) -> Result<()> {
        Err(Error::not_supported("importKey"))
    }

    /// Parse `key_data` in `format` into a key
    fn import_key(
        &self,
        _format: KeyFormat,
        _key_data: CryptoData<'_>,
        _algorithm: &Algorithm,
        _extractable: bool,
        _usages: UsageMask,
    ) -> Result<Key> {
        Err(Error::not_supported("importKey"))
    }

    /// Serialize `key` in `format`
    ///
    /// Extractability has already been checked by the dispatcher.
    fn export_key(&self, _format: KeyFormat, _key: &Key) -> Result<Vec<u8>> {
        Err(Error::not_supported("exportKey"))
    }

    /// Serialize `key` for the internal structured-clone boundary
    fn serialize_key_for_clone(&self, _key: &Key) -> Result<Vec<u8>> {
        Err(Error::not_supported("serializeKeyForClone"))
    }

    /// Rebuild a key from [`AlgorithmImplementation::serialize_key_for_clone`]
    /// output and its metadata
    fn deserialize_key_for_clone(
        &self,
        _algorithm: &KeyAlgorithm,
        _key_type: KeyType,
        _extractable: bool,
        _usages: UsageMask,
        _key_data: CryptoData<'_>,
    ) -> Result<Key> {
        Err(Error::not_supported("deserializeKeyForClone"))
    }
}
