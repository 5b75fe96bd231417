//! Key, usage and format model
//!
//! A [`Key`] binds opaque key material to the algorithm it was created
//! under, its type, its extractability and its permitted usages. Everything
//! except the material is public metadata. The material is an
//! implementation-private [`KeyHandle`] that only the implementation which
//! created it can downcast, so raw key bytes never leave through the public
//! API except via an explicit export.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use super::algorithm::{AlgorithmId, KeyAlgorithm};

/// Kind of key material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Secret,
    Public,
    Private,
}

/// Key interchange formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFormat {
    Raw,
    Pkcs8,
    Spki,
    Jwk,
}

impl KeyFormat {
    /// Web Crypto name of the format
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Pkcs8 => "pkcs8",
            Self::Spki => "spki",
            Self::Jwk => "jwk",
        }
    }
}

bitflags::bitflags! {
    /// Set of operations a key may participate in
    ///
    /// Bit positions are part of the interchange contract and must not be
    /// renumbered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UsageMask: u32 {
        const ENCRYPT = 1 << 0;
        const DECRYPT = 1 << 1;
        const SIGN = 1 << 2;
        const VERIFY = 1 << 3;
        const DERIVE_KEY = 1 << 4;
        const WRAP_KEY = 1 << 5;
        const UNWRAP_KEY = 1 << 6;
        const DERIVE_BITS = 1 << 7;
    }
}

/// A single key usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    DeriveKey,
    WrapKey,
    UnwrapKey,
    DeriveBits,
}

impl KeyUsage {
    /// Every usage, in bit order
    pub const ALL: [KeyUsage; 8] = [
        Self::Encrypt,
        Self::Decrypt,
        Self::Sign,
        Self::Verify,
        Self::DeriveKey,
        Self::WrapKey,
        Self::UnwrapKey,
        Self::DeriveBits,
    ];

    /// The mask bit for this usage
    pub const fn bit(self) -> UsageMask {
        match self {
            Self::Encrypt => UsageMask::ENCRYPT,
            Self::Decrypt => UsageMask::DECRYPT,
            Self::Sign => UsageMask::SIGN,
            Self::Verify => UsageMask::VERIFY,
            Self::DeriveKey => UsageMask::DERIVE_KEY,
            Self::WrapKey => UsageMask::WRAP_KEY,
            Self::UnwrapKey => UsageMask::UNWRAP_KEY,
            Self::DeriveBits => UsageMask::DERIVE_BITS,
        }
    }

    /// Web Crypto / JWK `key_ops` name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::Sign => "sign",
            Self::Verify => "verify",
            Self::DeriveKey => "deriveKey",
            Self::WrapKey => "wrapKey",
            Self::UnwrapKey => "unwrapKey",
            Self::DeriveBits => "deriveBits",
        }
    }

    /// Parse a JWK `key_ops` name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|usage| usage.name() == name)
    }
}

impl From<KeyUsage> for UsageMask {
    fn from(usage: KeyUsage) -> Self {
        usage.bit()
    }
}

impl UsageMask {
    /// Whether the mask permits `usage`
    pub fn allows(self, usage: KeyUsage) -> bool {
        self.contains(usage.bit())
    }

    /// The usages in this mask, in bit order
    pub fn usages(self) -> impl Iterator<Item = KeyUsage> {
        KeyUsage::ALL
            .into_iter()
            .filter(move |usage| self.allows(*usage))
    }
}

/// Implementation-private key material
///
/// Every `'static + Send + Sync` type is a handle. Implementations store
/// their own private material type and recover it with [`Key::handle`].
pub trait KeyHandle: Any + Send + Sync {
    /// Upcast for downcasting back to the concrete handle
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> KeyHandle for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A cryptographic key
///
/// Cloning is cheap and shares the material. The usage mask and
/// extractability are fixed at construction; there are no setters.
#[derive(Clone)]
pub struct Key {
    algorithm: KeyAlgorithm,
    key_type: KeyType,
    extractable: bool,
    usages: UsageMask,
    handle: Arc<dyn KeyHandle>,
}

impl Key {
    /// Create a key around implementation-private material
    pub fn new<H: KeyHandle>(
        algorithm: KeyAlgorithm,
        key_type: KeyType,
        extractable: bool,
        usages: UsageMask,
        handle: H,
    ) -> Self {
        Self {
            algorithm,
            key_type,
            extractable,
            usages,
            handle: Arc::new(handle),
        }
    }

    /// The algorithm binding
    pub fn algorithm(&self) -> &KeyAlgorithm {
        &self.algorithm
    }

    /// Shorthand for `self.algorithm().id()`
    pub fn algorithm_id(&self) -> AlgorithmId {
        self.algorithm.id()
    }

    /// Secret, public or private
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Whether the material may leave through export
    pub fn extractable(&self) -> bool {
        self.extractable
    }

    /// The permitted usages
    pub fn usages(&self) -> UsageMask {
        self.usages
    }

    /// Whether the usage mask permits `usage`
    pub fn usage_allows(&self, usage: KeyUsage) -> bool {
        self.usages.allows(usage)
    }

    /// Recover the material as the concrete handle type `H`
    ///
    /// Returns `None` when the key was created with a different handle type,
    /// e.g. by another implementation.
    pub fn handle<H: KeyHandle>(&self) -> Option<&H> {
        let handle: &dyn KeyHandle = &*self.handle;
        handle.as_any().downcast_ref::<H>()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", &self.algorithm)
            .field("key_type", &self.key_type)
            .field("extractable", &self.extractable)
            .field("usages", &self.usages)
            .field("handle", &"[REDACTED]")
            .finish()
    }
}

/// A public and private key produced together
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public_key: Key,
    pub private_key: Key,
}

/// Output of key generation
#[derive(Debug, Clone)]
pub enum GenerateKeyResult {
    SecretKey(Key),
    KeyPair(KeyPair),
}

impl GenerateKeyResult {
    /// The secret key, if this is a secret key result
    pub fn secret_key(&self) -> Option<&Key> {
        match self {
            Self::SecretKey(key) => Some(key),
            Self::KeyPair(_) => None,
        }
    }

    /// The key pair, if this is a pair result
    pub fn key_pair(&self) -> Option<&KeyPair> {
        match self {
            Self::SecretKey(_) => None,
            Self::KeyPair(pair) => Some(pair),
        }
    }

    /// Consume into the secret key
    pub fn into_secret_key(self) -> Option<Key> {
        match self {
            Self::SecretKey(key) => Some(key),
            Self::KeyPair(_) => None,
        }
    }

    /// Consume into the key pair
    pub fn into_key_pair(self) -> Option<KeyPair> {
        match self {
            Self::SecretKey(_) => None,
            Self::KeyPair(pair) => Some(pair),
        }
    }
}
