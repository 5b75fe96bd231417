//! PBKDF2 with HMAC (RFC 8018)

use ::pbkdf2::pbkdf2_hmac;
use webcrypt_api::{
    validate, Algorithm, AlgorithmImplementation, AlgorithmId, AlgorithmParams, CryptoData, Error,
    HashId, Key, KeyAlgorithm, KeyFormat, KeyType, Result, UsageMask,
};

use super::{deserialize, import_raw, key_bytes, verify_usages, with_hash};

/// Output cap, in hash lengths
const MAX_BLOCKS: usize = 255;

/// PBKDF2 over HMAC-SHA-1 and HMAC-SHA-2
#[derive(Debug, Default, Clone, Copy)]
pub struct Pbkdf2Implementation;

impl AlgorithmImplementation for Pbkdf2Implementation {
    fn derive_bits(&self, algorithm: &Algorithm, base_key: &Key, length_bits: u32) -> Result<Vec<u8>> {
        let AlgorithmParams::Pbkdf2 {
            hash,
            salt,
            iterations,
        } = algorithm.params()
        else {
            return Err(Error::param("PBKDF2", "hash, salt and iterations are required"));
        };
        validate::parameter(*iterations > 0, "PBKDF2", "iterations must not be zero")?;
        let len = validate::whole_bytes("PBKDF2 length", length_bits)?;
        validate::parameter(
            len <= MAX_BLOCKS * hash.output_len(),
            "PBKDF2 length",
            "must not exceed 255 hash lengths",
        )?;

        let password = key_bytes(base_key)?;
        let mut out = vec![0u8; len];
        with_hash!(*hash, |H| pbkdf2_hmac::<H>(password, salt, *iterations, &mut out));
        Ok(out)
    }

    fn verify_key_usages_before_import_key(&self, format: KeyFormat, usages: UsageMask) -> Result<()> {
        verify_usages(format, usages)
    }

    fn import_key(
        &self,
        format: KeyFormat,
        key_data: CryptoData<'_>,
        _algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<Key> {
        import_raw(AlgorithmId::Pbkdf2, format, key_data, extractable, usages)
    }

    fn serialize_key_for_clone(&self, key: &Key) -> Result<Vec<u8>> {
        key_bytes(key).map(<[u8]>::to_vec)
    }

    fn deserialize_key_for_clone(
        &self,
        _algorithm: &KeyAlgorithm,
        key_type: KeyType,
        extractable: bool,
        usages: UsageMask,
        key_data: CryptoData<'_>,
    ) -> Result<Key> {
        deserialize(AlgorithmId::Pbkdf2, key_type, extractable, usages, key_data)
    }
}
