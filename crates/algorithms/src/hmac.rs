//! HMAC signing and verification
//!
//! Keys are bound to a hash at creation. The key length defaults to the hash
//! block size; JWK `alg` names are `HS1`, `HS256`, `HS384` and `HS512`.

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use webcrypt_api::{
    validate, Algorithm, AlgorithmId, AlgorithmImplementation, AlgorithmParams, CryptoData, Error,
    GenerateKeyResult, HashId, Key, KeyAlgorithm, KeyAlgorithmParams, KeyFormat, KeyType, Result,
    ResultExt, SecretVec, UsageMask,
};

use crate::jwk::{Jwk, JwkUse};
use crate::usage::{check_not_empty, check_usages};
use crate::ImplementationMap;

const LEGAL_USAGES: UsageMask = UsageMask::SIGN.union(UsageMask::VERIFY);

/// Register HMAC
pub fn register(map: &mut ImplementationMap) {
    map.insert(AlgorithmId::Hmac, Box::new(HmacImplementation));
}

struct HmacKey(SecretVec);

macro_rules! with_mac {
    ($hash:expr, $key:expr, |$mac:ident| $body:expr) => {
        match $hash {
            HashId::Sha1 => {
                let $mac = <Hmac<Sha1> as Mac>::new_from_slice($key).or_invalid_key("HMAC", "bad key")?;
                $body
            }
            HashId::Sha256 => {
                let $mac = <Hmac<Sha256> as Mac>::new_from_slice($key).or_invalid_key("HMAC", "bad key")?;
                $body
            }
            HashId::Sha384 => {
                let $mac = <Hmac<Sha384> as Mac>::new_from_slice($key).or_invalid_key("HMAC", "bad key")?;
                $body
            }
            HashId::Sha512 => {
                let $mac = <Hmac<Sha512> as Mac>::new_from_slice($key).or_invalid_key("HMAC", "bad key")?;
                $body
            }
        }
    };
}

/// HMAC tag of `data` under `key`
fn hmac_tag(hash: HashId, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    Ok(with_mac!(hash, key, |mac| {
        let mut mac = mac;
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }))
}

fn hmac_verify(hash: HashId, key: &[u8], data: &[u8], tag: &[u8]) -> Result<bool> {
    Ok(with_mac!(hash, key, |mac| {
        let mut mac = mac;
        mac.update(data);
        mac.verify_slice(tag).is_ok()
    }))
}

fn jwk_alg(hash: HashId) -> &'static str {
    match hash {
        HashId::Sha1 => "HS1",
        HashId::Sha256 => "HS256",
        HashId::Sha384 => "HS384",
        HashId::Sha512 => "HS512",
    }
}

fn hash_and_length(algorithm: &Algorithm) -> Result<(HashId, Option<u32>)> {
    match algorithm.params() {
        AlgorithmParams::Hmac { hash, length_bits } => Ok((*hash, *length_bits)),
        _ => Err(Error::param("HMAC", "hash is required")),
    }
}

fn key_parts(key: &Key) -> Result<(HashId, &[u8])> {
    let KeyAlgorithmParams::Hmac { hash, .. } = key.algorithm().params() else {
        return Err(Error::Unexpected { context: "HMAC key algorithm" });
    };
    let bytes = key
        .handle::<HmacKey>()
        .ok_or(Error::Unexpected { context: "HMAC key handle" })?;
    Ok((*hash, bytes.0.as_ref()))
}

/// Bit length of a `len`-byte key, checked against an explicit length
fn key_length_bits(len: usize, length_bits: Option<u32>) -> Result<u32> {
    validate::key_data(len != 0, "HMAC key", "must not be empty")?;
    let full_bits = len
        .checked_mul(8)
        .and_then(|bits| u32::try_from(bits).ok())
        .ok_or(Error::key_data("HMAC key", "too long"))?;

    match length_bits {
        Some(length) => {
            // The length may trim at most the final byte
            validate::key_data(
                length <= full_bits && length > full_bits - 8,
                "HMAC key",
                "length does not match the key data",
            )?;
            Ok(length)
        }
        None => Ok(full_bits),
    }
}

/// Build a key from raw bytes, honoring an explicit bit length
fn make_key(
    hash: HashId,
    length_bits: Option<u32>,
    bytes: &[u8],
    extractable: bool,
    usages: UsageMask,
) -> Result<Key> {
    check_not_empty(usages)?;
    let length_bits = key_length_bits(bytes.len(), length_bits)?;

    Ok(Key::new(
        KeyAlgorithm::hmac(hash, length_bits),
        KeyType::Secret,
        extractable,
        usages,
        HmacKey(SecretVec::from_slice(bytes)),
    ))
}

/// HMAC over SHA-1 and SHA-2
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacImplementation;

impl AlgorithmImplementation for HmacImplementation {
    fn sign(&self, _algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        let (hash, bytes) = key_parts(key)?;
        hmac_tag(hash, bytes, data.as_bytes())
    }

    fn verify(
        &self,
        _algorithm: &Algorithm,
        key: &Key,
        signature: CryptoData<'_>,
        data: CryptoData<'_>,
    ) -> Result<bool> {
        let (hash, bytes) = key_parts(key)?;
        hmac_verify(hash, bytes, data.as_bytes(), signature.as_bytes())
    }

    fn get_key_length(&self, algorithm: &Algorithm) -> Result<u32> {
        let (hash, length_bits) = hash_and_length(algorithm)?;
        match length_bits {
            Some(0) => Err(Error::param("HMAC", "length must not be zero")),
            Some(length) => Ok(length),
            None => Ok((hash.block_len() * 8) as u32),
        }
    }

    fn generate_key(
        &self,
        algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<GenerateKeyResult> {
        check_usages(LEGAL_USAGES, usages)?;
        let (hash, _) = hash_and_length(algorithm)?;
        let length_bits = self.get_key_length(algorithm)?;
        let len = validate::whole_bytes("HMAC key length", length_bits)?;

        let bytes = SecretVec::random(&mut OsRng, len);
        make_key(hash, Some(length_bits), &bytes, extractable, usages)
            .map(GenerateKeyResult::SecretKey)
    }

    fn verify_key_usages_before_import_key(&self, format: KeyFormat, usages: UsageMask) -> Result<()> {
        match format {
            KeyFormat::Raw | KeyFormat::Jwk => check_usages(LEGAL_USAGES, usages),
            KeyFormat::Pkcs8 | KeyFormat::Spki => Err(Error::not_supported("HMAC import format")),
        }
    }

    fn import_key(
        &self,
        format: KeyFormat,
        key_data: CryptoData<'_>,
        algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<Key> {
        let (hash, length_bits) = hash_and_length(algorithm)?;
        match format {
            KeyFormat::Raw => make_key(hash, length_bits, key_data.as_bytes(), extractable, usages),
            KeyFormat::Jwk => {
                let jwk = Jwk::parse(key_data.as_bytes(), "oct", JwkUse::Sig, extractable, usages)?;
                jwk.check_alg(jwk_alg(hash))?;
                let bytes = jwk.k()?;
                make_key(hash, length_bits, &bytes, extractable, usages)
            }
            KeyFormat::Pkcs8 | KeyFormat::Spki => Err(Error::not_supported("HMAC import format")),
        }
    }

    fn export_key(&self, format: KeyFormat, key: &Key) -> Result<Vec<u8>> {
        let (hash, bytes) = key_parts(key)?;
        match format {
            KeyFormat::Raw => Ok(bytes.to_vec()),
            KeyFormat::Jwk => {
                let mut jwk = Jwk::new("oct", key.extractable(), key.usages());
                jwk.set_k(bytes);
                jwk.set_alg(jwk_alg(hash));
                jwk.to_bytes()
            }
            KeyFormat::Pkcs8 | KeyFormat::Spki => Err(Error::not_supported("HMAC export format")),
        }
    }

    fn serialize_key_for_clone(&self, key: &Key) -> Result<Vec<u8>> {
        key_parts(key).map(|(_, bytes)| bytes.to_vec())
    }

    fn deserialize_key_for_clone(
        &self,
        algorithm: &KeyAlgorithm,
        key_type: KeyType,
        extractable: bool,
        usages: UsageMask,
        key_data: CryptoData<'_>,
    ) -> Result<Key> {
        validate::parameter(key_type == KeyType::Secret, "HMAC clone", "key type must be secret")?;
        let KeyAlgorithmParams::Hmac { hash, length_bits } = algorithm.params() else {
            return Err(Error::param("HMAC clone", "missing hash"));
        };
        make_key(*hash, Some(*length_bits), key_data.as_bytes(), extractable, usages)
    }
}
