//! AES key management shared by AES-GCM and AES-KW
//!
//! Both modes store a raw 128 or 256-bit key in [`AesKey`] and differ only
//! in their legal usages and JWK `alg` names, captured by [`AesFamily`].

use rand::rngs::OsRng;
use webcrypt_api::{
    validate, Algorithm, AlgorithmId, AlgorithmParams, CryptoData, Error, GenerateKeyResult, Key,
    KeyAlgorithm, KeyAlgorithmParams, KeyFormat, KeyType, Result, SecretVec, UsageMask,
};

use crate::jwk::{Jwk, JwkUse};
use crate::usage::{check_not_empty, check_usages};
use crate::ImplementationMap;

pub mod gcm;
pub mod kw;

pub use gcm::AesGcmImplementation;
pub use kw::AesKwImplementation;

/// Register AES-GCM and AES-KW
pub fn register(map: &mut ImplementationMap) {
    map.insert(AlgorithmId::AesGcm, Box::new(AesGcmImplementation::new()));
    map.insert(AlgorithmId::AesKw, Box::new(AesKwImplementation::new()));
}

/// Private key material of an AES key
pub(crate) struct AesKey(SecretVec);

/// Raw bytes of an AES key
pub(crate) fn key_bytes(key: &Key) -> Result<&[u8]> {
    key.handle::<AesKey>()
        .map(|k| k.0.as_ref())
        .ok_or(Error::Unexpected { context: "AES key handle" })
}

/// Validate an AES key length in bits
fn check_length_bits(length_bits: u32) -> Result<()> {
    match length_bits {
        128 | 256 => Ok(()),
        192 => Err(Error::not_supported("192-bit AES keys")),
        _ => Err(Error::param("AES key length", "must be 128 or 256 bits")),
    }
}

/// Validate raw AES key bytes
fn check_key_bytes(bytes: &[u8]) -> Result<()> {
    match bytes.len() {
        16 | 32 => Ok(()),
        24 => Err(Error::not_supported("192-bit AES keys")),
        _ => Err(Error::key_data("AES key", "must be 16 or 32 bytes")),
    }
}

/// One AES mode's view of key management
#[derive(Debug, Clone, Copy)]
pub(crate) struct AesFamily {
    id: AlgorithmId,
    legal_usages: UsageMask,
    jwk_suffix: &'static str,
}

impl AesFamily {
    pub(crate) const fn new(id: AlgorithmId, legal_usages: UsageMask, jwk_suffix: &'static str) -> Self {
        Self {
            id,
            legal_usages,
            jwk_suffix,
        }
    }

    fn jwk_alg(&self, length_bits: u32) -> Result<&'static str> {
        match (self.jwk_suffix, length_bits) {
            ("GCM", 128) => Ok("A128GCM"),
            ("GCM", 256) => Ok("A256GCM"),
            ("KW", 128) => Ok("A128KW"),
            ("KW", 256) => Ok("A256KW"),
            _ => Err(Error::Unexpected { context: "AES JWK alg" }),
        }
    }

    fn make_key(&self, bytes: SecretVec, extractable: bool, usages: UsageMask) -> Result<Key> {
        check_not_empty(usages)?;
        let length_bits = (bytes.len() * 8) as u32;
        Ok(Key::new(
            KeyAlgorithm::aes(self.id, length_bits),
            KeyType::Secret,
            extractable,
            usages,
            AesKey(bytes),
        ))
    }

    pub(crate) fn generate_key(
        &self,
        algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<GenerateKeyResult> {
        check_usages(self.legal_usages, usages)?;
        let length_bits = self.get_key_length(algorithm)?;
        let bytes = SecretVec::random(&mut OsRng, (length_bits / 8) as usize);
        self.make_key(bytes, extractable, usages)
            .map(GenerateKeyResult::SecretKey)
    }

    pub(crate) fn get_key_length(&self, algorithm: &Algorithm) -> Result<u32> {
        match algorithm.params() {
            AlgorithmParams::AesKeyGen { length_bits } => {
                check_length_bits(*length_bits)?;
                Ok(*length_bits)
            }
            _ => Err(Error::param("AES key generation", "length is required")),
        }
    }

    pub(crate) fn verify_key_usages_before_import_key(
        &self,
        format: KeyFormat,
        usages: UsageMask,
    ) -> Result<()> {
        match format {
            KeyFormat::Raw | KeyFormat::Jwk => check_usages(self.legal_usages, usages),
            KeyFormat::Pkcs8 | KeyFormat::Spki => Err(Error::not_supported("AES import format")),
        }
    }

    pub(crate) fn import_key(
        &self,
        format: KeyFormat,
        key_data: CryptoData<'_>,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<Key> {
        match format {
            KeyFormat::Raw => {
                check_key_bytes(key_data.as_bytes())?;
                self.make_key(SecretVec::from_slice(key_data.as_bytes()), extractable, usages)
            }
            KeyFormat::Jwk => {
                let jwk = Jwk::parse(key_data.as_bytes(), "oct", JwkUse::Enc, extractable, usages)?;
                let bytes = jwk.k()?;
                check_key_bytes(&bytes)?;
                jwk.check_alg(self.jwk_alg((bytes.len() * 8) as u32)?)?;
                self.make_key(SecretVec::from_slice(&bytes), extractable, usages)
            }
            KeyFormat::Pkcs8 | KeyFormat::Spki => Err(Error::not_supported("AES import format")),
        }
    }

    pub(crate) fn export_key(&self, format: KeyFormat, key: &Key) -> Result<Vec<u8>> {
        let bytes = key_bytes(key)?;
        match format {
            KeyFormat::Raw => Ok(bytes.to_vec()),
            KeyFormat::Jwk => {
                let mut jwk = Jwk::new("oct", key.extractable(), key.usages());
                jwk.set_k(bytes);
                jwk.set_alg(self.jwk_alg((bytes.len() * 8) as u32)?);
                jwk.to_bytes()
            }
            KeyFormat::Pkcs8 | KeyFormat::Spki => Err(Error::not_supported("AES export format")),
        }
    }

    pub(crate) fn serialize_key_for_clone(&self, key: &Key) -> Result<Vec<u8>> {
        key_bytes(key).map(<[u8]>::to_vec)
    }

    pub(crate) fn deserialize_key_for_clone(
        &self,
        algorithm: &KeyAlgorithm,
        key_type: KeyType,
        extractable: bool,
        usages: UsageMask,
        key_data: CryptoData<'_>,
    ) -> Result<Key> {
        validate::parameter(key_type == KeyType::Secret, "AES clone", "key type must be secret")?;
        let KeyAlgorithmParams::Aes { length_bits } = algorithm.params() else {
            return Err(Error::param("AES clone", "missing key length"));
        };
        check_key_bytes(key_data.as_bytes())?;
        validate::length(
            "AES clone key",
            key_data.len(),
            (*length_bits / 8) as usize,
        )?;
        self.make_key(SecretVec::from_slice(key_data.as_bytes()), extractable, usages)
    }
}

/// Forward the key-management operations of [`AlgorithmImplementation`] to
/// an [`AesFamily`] field named `family`
///
/// [`AlgorithmImplementation`]: webcrypt_api::AlgorithmImplementation
macro_rules! delegate_key_management {
    () => {
        fn generate_key(
            &self,
            algorithm: &Algorithm,
            extractable: bool,
            usages: UsageMask,
        ) -> Result<GenerateKeyResult> {
            self.family.generate_key(algorithm, extractable, usages)
        }

        fn get_key_length(&self, algorithm: &Algorithm) -> Result<u32> {
            self.family.get_key_length(algorithm)
        }

        fn verify_key_usages_before_import_key(
            &self,
            format: KeyFormat,
            usages: UsageMask,
        ) -> Result<()> {
            self.family.verify_key_usages_before_import_key(format, usages)
        }

        fn import_key(
            &self,
            format: KeyFormat,
            key_data: CryptoData<'_>,
            _algorithm: &Algorithm,
            extractable: bool,
            usages: UsageMask,
        ) -> Result<Key> {
            self.family.import_key(format, key_data, extractable, usages)
        }

        fn export_key(&self, format: KeyFormat, key: &Key) -> Result<Vec<u8>> {
            self.family.export_key(format, key)
        }

        fn serialize_key_for_clone(&self, key: &Key) -> Result<Vec<u8>> {
            self.family.serialize_key_for_clone(key)
        }

        fn deserialize_key_for_clone(
            &self,
            algorithm: &KeyAlgorithm,
            key_type: KeyType,
            extractable: bool,
            usages: UsageMask,
            key_data: CryptoData<'_>,
        ) -> Result<Key> {
            self.family
                .deserialize_key_for_clone(algorithm, key_type, extractable, usages, key_data)
        }
    };
}

pub(crate) use delegate_key_management;
