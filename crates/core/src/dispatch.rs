//! Policy-checking operation dispatcher
//!
//! Every public operation runs its checks in a fixed order before any
//! implementation is invoked:
//!
//! 1. the key's usage mask must permit the operation,
//! 2. the operation's algorithm must be the key's algorithm,
//! 3. the algorithm must have a registered implementation,
//!
//! and only then delegates. Key wrapping and derivation are composed here
//! from the same primitives, with the target key's usages validated before
//! any secret bytes are produced.

use tracing::{debug, error, trace};
use webcrypt_api::{
    Algorithm, CryptoData, Digestor, Error, GenerateKeyResult, Key, KeyAlgorithm, KeyFormat,
    KeyType, KeyUsage, Result, UsageMask,
};
use zeroize::Zeroizing;

use crate::platform;
use crate::registry::AlgorithmRegistry;

/// The single error surfaced by a failed unwrap after decryption starts
const UNWRAP_FAILED: Error = Error::OperationFailed { context: "unwrap key" };

fn check_usage(key: &Key, usage: KeyUsage) -> Result<()> {
    if !key.usage_allows(usage) {
        debug!(
            usage = usage.name(),
            usages = ?key.usages(),
            "rejected: key usage not allowed"
        );
        return Err(Error::UsageNotAllowed { usage: usage.name() });
    }
    Ok(())
}

fn check_algorithm_match(algorithm: &Algorithm, key: &Key) -> Result<()> {
    if algorithm.id() != key.algorithm_id() {
        debug!(
            algorithm = %algorithm.id(),
            key_algorithm = %key.algorithm_id(),
            "rejected: algorithm does not match key"
        );
        return Err(Error::Unexpected { context: "algorithm does not match key" });
    }
    Ok(())
}

/// Entry point for every crypto operation
///
/// A dispatcher holds only a shared reference to an immutable registry, so
/// it is cheap to copy and safe to share between threads.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    registry: &'r AlgorithmRegistry,
}

impl Dispatcher<'static> {
    /// Dispatcher bound to [`AlgorithmRegistry::global`]
    pub fn global() -> Self {
        Self::new(AlgorithmRegistry::global())
    }
}

impl Default for Dispatcher<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'r> Dispatcher<'r> {
    /// Dispatcher bound to `registry`
    pub fn new(registry: &'r AlgorithmRegistry) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher reads
    pub fn registry(&self) -> &'r AlgorithmRegistry {
        self.registry
    }

    /// Encrypt `data` with a key that allows `encrypt`
    pub fn encrypt(&self, algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        trace!(algorithm = %algorithm.id(), len = data.len(), "encrypt");
        check_usage(key, KeyUsage::Encrypt)?;
        self.encrypt_dont_check_usage(algorithm, key, data)
    }

    /// Decrypt `data` with a key that allows `decrypt`
    pub fn decrypt(&self, algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        trace!(algorithm = %algorithm.id(), len = data.len(), "decrypt");
        check_usage(key, KeyUsage::Decrypt)?;
        self.decrypt_dont_check_usage(algorithm, key, data)
    }

    /// Hash `data`
    pub fn digest(&self, algorithm: &Algorithm, data: CryptoData<'_>) -> Result<Vec<u8>> {
        trace!(algorithm = %algorithm.id(), len = data.len(), "digest");
        self.registry.lookup(algorithm.id())?.digest(algorithm, data)
    }

    /// Sign `data` with a key that allows `sign`
    pub fn sign(&self, algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        trace!(algorithm = %algorithm.id(), len = data.len(), "sign");
        check_usage(key, KeyUsage::Sign)?;
        check_algorithm_match(algorithm, key)?;
        self.registry.lookup(algorithm.id())?.sign(algorithm, key, data)
    }

    /// Check `signature` over `data` with a key that allows `verify`
    ///
    /// A well-formed signature that does not match is `Ok(false)`.
    pub fn verify(
        &self,
        algorithm: &Algorithm,
        key: &Key,
        signature: CryptoData<'_>,
        data: CryptoData<'_>,
    ) -> Result<bool> {
        trace!(algorithm = %algorithm.id(), len = data.len(), "verify");
        check_usage(key, KeyUsage::Verify)?;
        check_algorithm_match(algorithm, key)?;
        self.registry
            .lookup(algorithm.id())?
            .verify(algorithm, key, signature, data)
    }

    /// Generate a secret key or key pair
    ///
    /// The secret key, or the private half of a pair, must come back with a
    /// non-empty usage mask.
    pub fn generate_key(
        &self,
        algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<GenerateKeyResult> {
        trace!(algorithm = %algorithm.id(), extractable, usages = ?usages, "generate key");
        let result = self
            .registry
            .lookup(algorithm.id())?
            .generate_key(algorithm, extractable, usages)?;

        let key = match &result {
            GenerateKeyResult::SecretKey(key) => key,
            GenerateKeyResult::KeyPair(pair) => &pair.private_key,
        };
        if key.usages().is_empty() {
            error!(
                algorithm = %algorithm.id(),
                "implementation generated a key with empty usages"
            );
            return Err(Error::CreateKeyEmptyUsages);
        }

        Ok(result)
    }

    /// Parse `key_data` in `format` into a key for `algorithm`
    pub fn import_key(
        &self,
        format: KeyFormat,
        key_data: CryptoData<'_>,
        algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<Key> {
        trace!(
            algorithm = %algorithm.id(),
            format = format.name(),
            extractable,
            usages = ?usages,
            "import key"
        );
        let implementation = self.registry.lookup(algorithm.id())?;
        implementation.verify_key_usages_before_import_key(format, usages)?;
        implementation.import_key(format, key_data, algorithm, extractable, usages)
    }

    /// Serialize an extractable key in `format`
    pub fn export_key(&self, format: KeyFormat, key: &Key) -> Result<Vec<u8>> {
        trace!(algorithm = %key.algorithm_id(), format = format.name(), "export key");
        if !key.extractable() {
            debug!(algorithm = %key.algorithm_id(), "rejected: key is not extractable");
            return Err(Error::KeyNotExtractable);
        }
        self.registry.lookup(key.algorithm_id())?.export_key(format, key)
    }

    /// Export `key` in `format` and encrypt it under `wrapping_key`
    ///
    /// The wrapping key needs the `wrapKey` usage rather than `encrypt`.
    pub fn wrap_key(
        &self,
        format: KeyFormat,
        key: &Key,
        wrapping_key: &Key,
        wrapping_algorithm: &Algorithm,
    ) -> Result<Vec<u8>> {
        trace!(
            algorithm = %wrapping_algorithm.id(),
            format = format.name(),
            "wrap key"
        );
        check_usage(wrapping_key, KeyUsage::WrapKey)?;

        let exported = Zeroizing::new(self.export_key(format, key)?);
        self.encrypt_dont_check_usage(wrapping_algorithm, wrapping_key, CryptoData::new(&exported))
    }

    /// Decrypt `wrapped_key` under `wrapping_key` and import the result
    ///
    /// `usages` are validated for `algorithm` and `format` before anything
    /// is decrypted. Once decryption starts, every failure is reported as
    /// the same [`Error::OperationFailed`] so nothing about the plaintext
    /// reaches the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn unwrap_key(
        &self,
        format: KeyFormat,
        wrapped_key: CryptoData<'_>,
        wrapping_key: &Key,
        wrapping_algorithm: &Algorithm,
        algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<Key> {
        trace!(
            algorithm = %algorithm.id(),
            wrapping_algorithm = %wrapping_algorithm.id(),
            format = format.name(),
            usages = ?usages,
            "unwrap key"
        );
        check_usage(wrapping_key, KeyUsage::UnwrapKey)?;
        check_algorithm_match(wrapping_algorithm, wrapping_key)?;

        // Fail fast on usages before touching the wrapped bytes
        let implementation = self.registry.lookup(algorithm.id())?;
        implementation.verify_key_usages_before_import_key(format, usages)?;
        let unwrapper = self.registry.lookup(wrapping_algorithm.id())?;

        let key_data = unwrapper
            .decrypt(wrapping_algorithm, wrapping_key, wrapped_key)
            .map(Zeroizing::new)
            .map_err(|err| {
                debug!(step = "decrypt", kind = ?err.kind(), "unwrap failed");
                UNWRAP_FAILED
            })?;

        implementation
            .import_key(format, CryptoData::new(&key_data), algorithm, extractable, usages)
            .map_err(|err| {
                debug!(step = "import", kind = ?err.kind(), "unwrap failed");
                UNWRAP_FAILED
            })
    }

    /// Derive `length_bits` bits from a key that allows `deriveBits`
    pub fn derive_bits(&self, algorithm: &Algorithm, base_key: &Key, length_bits: u32) -> Result<Vec<u8>> {
        trace!(algorithm = %algorithm.id(), length_bits, "derive bits");
        check_usage(base_key, KeyUsage::DeriveBits)?;
        check_algorithm_match(algorithm, base_key)?;
        self.registry
            .lookup(algorithm.id())?
            .derive_bits(algorithm, base_key, length_bits)
    }

    /// Derive a new key for `derived_algorithm` from a key that allows
    /// `deriveKey`
    ///
    /// The derived key's length comes from its algorithm; its usages are
    /// validated before any bits are derived.
    pub fn derive_key(
        &self,
        algorithm: &Algorithm,
        base_key: &Key,
        derived_algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<Key> {
        trace!(
            algorithm = %algorithm.id(),
            derived_algorithm = %derived_algorithm.id(),
            usages = ?usages,
            "derive key"
        );
        check_usage(base_key, KeyUsage::DeriveKey)?;
        check_algorithm_match(algorithm, base_key)?;
        let deriver = self.registry.lookup(algorithm.id())?;

        let target = self.registry.lookup(derived_algorithm.id())?;
        target.verify_key_usages_before_import_key(KeyFormat::Raw, usages)?;
        let length_bits = target.get_key_length(derived_algorithm)?;

        let bits = Zeroizing::new(deriver.derive_bits(algorithm, base_key, length_bits)?);
        target.import_key(
            KeyFormat::Raw,
            CryptoData::new(&bits),
            derived_algorithm,
            extractable,
            usages,
        )
    }

    /// Start a streaming digest for a hash algorithm
    ///
    /// Runs platform initialization on first use.
    pub fn create_digestor(&self, algorithm: &Algorithm) -> Result<Box<dyn Digestor>> {
        trace!(algorithm = %algorithm.id(), "create digestor");
        platform::init()?;
        new_digestor(algorithm)
    }

    /// Serialize `key` for the structured-clone boundary
    ///
    /// Failures are logged and collapse to `None`.
    pub fn serialize_key_for_clone(&self, key: &Key) -> Option<Vec<u8>> {
        trace!(algorithm = %key.algorithm_id(), "serialize key for clone");
        self.registry
            .lookup(key.algorithm_id())
            .and_then(|implementation| implementation.serialize_key_for_clone(key))
            .map_err(|err| debug!(error = %err, "serialize key for clone failed"))
            .ok()
    }

    /// Rebuild a key from [`Dispatcher::serialize_key_for_clone`] output
    ///
    /// Failures are logged and collapse to `None`.
    pub fn deserialize_key_for_clone(
        &self,
        algorithm: &KeyAlgorithm,
        key_type: KeyType,
        extractable: bool,
        usages: UsageMask,
        key_data: CryptoData<'_>,
    ) -> Option<Key> {
        trace!(algorithm = %algorithm.id(), ?key_type, "deserialize key for clone");
        self.registry
            .lookup(algorithm.id())
            .and_then(|implementation| {
                implementation.deserialize_key_for_clone(algorithm, key_type, extractable, usages, key_data)
            })
            .map_err(|err| debug!(error = %err, "deserialize key for clone failed"))
            .ok()
    }

    fn encrypt_dont_check_usage(
        &self,
        algorithm: &Algorithm,
        key: &Key,
        data: CryptoData<'_>,
    ) -> Result<Vec<u8>> {
        check_algorithm_match(algorithm, key)?;
        self.registry.lookup(algorithm.id())?.encrypt(algorithm, key, data)
    }

    fn decrypt_dont_check_usage(
        &self,
        algorithm: &Algorithm,
        key: &Key,
        data: CryptoData<'_>,
    ) -> Result<Vec<u8>> {
        check_algorithm_match(algorithm, key)?;
        self.registry.lookup(algorithm.id())?.decrypt(algorithm, key, data)
    }
}

#[cfg(feature = "sha")]
fn new_digestor(algorithm: &Algorithm) -> Result<Box<dyn Digestor>> {
    webcrypt_algorithms::create_digestor(algorithm.id())
}

#[cfg(not(feature = "sha"))]
fn new_digestor(_algorithm: &Algorithm) -> Result<Box<dyn Digestor>> {
    Err(Error::not_supported("createDigestor"))
}
