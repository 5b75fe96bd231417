//! Algorithm identifiers and per-operation parameters

use core::fmt;

/// Identifier of a cryptographic algorithm family
///
/// The set is closed. An id with no registered implementation is rejected
/// by the registry with [`crate::Error::NotSupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlgorithmId {
    AesCbc,
    Hmac,
    RsaSsaPkcs1v1_5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    AesGcm,
    RsaOaep,
    AesCtr,
    AesKw,
    RsaPss,
    Ecdsa,
    Ecdh,
    Hkdf,
    Pbkdf2,
    Ed25519,
}

impl AlgorithmId {
    /// Every identifier, in declaration order
    pub const ALL: [AlgorithmId; 17] = [
        Self::AesCbc,
        Self::Hmac,
        Self::RsaSsaPkcs1v1_5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::AesGcm,
        Self::RsaOaep,
        Self::AesCtr,
        Self::AesKw,
        Self::RsaPss,
        Self::Ecdsa,
        Self::Ecdh,
        Self::Hkdf,
        Self::Pbkdf2,
        Self::Ed25519,
    ];

    /// Web Crypto name of the algorithm
    pub const fn name(self) -> &'static str {
        match self {
            Self::AesCbc => "AES-CBC",
            Self::Hmac => "HMAC",
            Self::RsaSsaPkcs1v1_5 => "RSASSA-PKCS1-v1_5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
            Self::AesGcm => "AES-GCM",
            Self::RsaOaep => "RSA-OAEP",
            Self::AesCtr => "AES-CTR",
            Self::AesKw => "AES-KW",
            Self::RsaPss => "RSA-PSS",
            Self::Ecdsa => "ECDSA",
            Self::Ecdh => "ECDH",
            Self::Hkdf => "HKDF",
            Self::Pbkdf2 => "PBKDF2",
            Self::Ed25519 => "Ed25519",
        }
    }

    /// The matching hash id, for the digest algorithms
    pub const fn as_hash(self) -> Option<HashId> {
        match self {
            Self::Sha1 => Some(HashId::Sha1),
            Self::Sha256 => Some(HashId::Sha256),
            Self::Sha384 => Some(HashId::Sha384),
            Self::Sha512 => Some(HashId::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inner hash function used by HMAC, HKDF and PBKDF2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashId {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashId {
    /// Digest size in bytes
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Internal block size in bytes
    pub const fn block_len(self) -> usize {
        match self {
            Self::Sha1 | Self::Sha256 => 64,
            Self::Sha384 | Self::Sha512 => 128,
        }
    }

    /// The digest algorithm id for this hash
    pub const fn algorithm_id(self) -> AlgorithmId {
        match self {
            Self::Sha1 => AlgorithmId::Sha1,
            Self::Sha256 => AlgorithmId::Sha256,
            Self::Sha384 => AlgorithmId::Sha384,
            Self::Sha512 => AlgorithmId::Sha512,
        }
    }
}

/// Algorithm-specific parameters of a single operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlgorithmParams {
    /// The operation takes no parameters (digests, AES-KW, Ed25519, imports)
    #[default]
    None,

    /// AES-GCM encryption and decryption
    AesGcm {
        iv: Vec<u8>,
        additional_data: Option<Vec<u8>>,
        /// Defaults to 128 when absent
        tag_length_bits: Option<u32>,
    },

    /// AES key generation, or the derived key length for derive-key
    AesKeyGen { length_bits: u32 },

    /// HMAC key generation and import
    Hmac {
        hash: HashId,
        /// Defaults to the hash block size for generation
        length_bits: Option<u32>,
    },

    /// HKDF bit derivation
    Hkdf {
        hash: HashId,
        salt: Vec<u8>,
        info: Vec<u8>,
    },

    /// PBKDF2 bit derivation
    Pbkdf2 {
        hash: HashId,
        salt: Vec<u8>,
        iterations: u32,
    },
}

/// An algorithm identifier plus the parameters for one operation
///
/// Algorithms are built by the caller, borrowed by the dispatcher, and
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Algorithm {
    id: AlgorithmId,
    params: AlgorithmParams,
}

impl Algorithm {
    /// Create an algorithm with explicit parameters
    pub fn new(id: AlgorithmId, params: AlgorithmParams) -> Self {
        Self { id, params }
    }

    /// Create a parameterless algorithm
    pub fn bare(id: AlgorithmId) -> Self {
        Self::new(id, AlgorithmParams::None)
    }

    /// AES-GCM with the given iv, no additional data, and a 128-bit tag
    pub fn aes_gcm(iv: &[u8]) -> Self {
        Self::new(
            AlgorithmId::AesGcm,
            AlgorithmParams::AesGcm {
                iv: iv.to_vec(),
                additional_data: None,
                tag_length_bits: None,
            },
        )
    }

    /// AES-GCM with additional data and an explicit tag length
    pub fn aes_gcm_with(iv: &[u8], additional_data: &[u8], tag_length_bits: u32) -> Self {
        Self::new(
            AlgorithmId::AesGcm,
            AlgorithmParams::AesGcm {
                iv: iv.to_vec(),
                additional_data: Some(additional_data.to_vec()),
                tag_length_bits: Some(tag_length_bits),
            },
        )
    }

    /// AES key generation parameters for the given family
    pub fn aes_key_gen(id: AlgorithmId, length_bits: u32) -> Self {
        Self::new(id, AlgorithmParams::AesKeyGen { length_bits })
    }

    /// HMAC parameters with the default key length
    pub fn hmac(hash: HashId) -> Self {
        Self::new(
            AlgorithmId::Hmac,
            AlgorithmParams::Hmac {
                hash,
                length_bits: None,
            },
        )
    }

    /// HMAC parameters with an explicit key length
    pub fn hmac_with_length(hash: HashId, length_bits: u32) -> Self {
        Self::new(
            AlgorithmId::Hmac,
            AlgorithmParams::Hmac {
                hash,
                length_bits: Some(length_bits),
            },
        )
    }

    /// HKDF derivation parameters
    pub fn hkdf(hash: HashId, salt: &[u8], info: &[u8]) -> Self {
        Self::new(
            AlgorithmId::Hkdf,
            AlgorithmParams::Hkdf {
                hash,
                salt: salt.to_vec(),
                info: info.to_vec(),
            },
        )
    }

    /// PBKDF2 derivation parameters
    pub fn pbkdf2(hash: HashId, salt: &[u8], iterations: u32) -> Self {
        Self::new(
            AlgorithmId::Pbkdf2,
            AlgorithmParams::Pbkdf2 {
                hash,
                salt: salt.to_vec(),
                iterations,
            },
        )
    }

    /// The algorithm family
    pub fn id(&self) -> AlgorithmId {
        self.id
    }

    /// The operation parameters
    pub fn params(&self) -> &AlgorithmParams {
        &self.params
    }
}

impl From<AlgorithmId> for Algorithm {
    fn from(id: AlgorithmId) -> Self {
        Self::bare(id)
    }
}

/// Key-intrinsic parameters carried by a key's algorithm binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyAlgorithmParams {
    #[default]
    None,
    Aes { length_bits: u32 },
    Hmac { hash: HashId, length_bits: u32 },
}

/// The algorithm a key was created or imported under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAlgorithm {
    id: AlgorithmId,
    params: KeyAlgorithmParams,
}

impl KeyAlgorithm {
    /// Create a key algorithm binding
    pub const fn new(id: AlgorithmId, params: KeyAlgorithmParams) -> Self {
        Self { id, params }
    }

    /// A binding without key-intrinsic parameters
    pub const fn bare(id: AlgorithmId) -> Self {
        Self::new(id, KeyAlgorithmParams::None)
    }

    /// AES binding of the given family and length
    pub const fn aes(id: AlgorithmId, length_bits: u32) -> Self {
        Self::new(id, KeyAlgorithmParams::Aes { length_bits })
    }

    /// HMAC binding
    pub const fn hmac(hash: HashId, length_bits: u32) -> Self {
        Self::new(
            AlgorithmId::Hmac,
            KeyAlgorithmParams::Hmac { hash, length_bits },
        )
    }

    /// The algorithm family
    pub const fn id(&self) -> AlgorithmId {
        self.id
    }

    /// The key-intrinsic parameters
    pub const fn params(&self) -> &KeyAlgorithmParams {
        &self.params
    }
}
