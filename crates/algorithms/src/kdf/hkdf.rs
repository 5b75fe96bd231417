//! HKDF (RFC 5869)

use ::hkdf::Hkdf;
use webcrypt_api::{
    validate, Algorithm, AlgorithmImplementation, AlgorithmId, AlgorithmParams, CryptoData, Error,
    HashId, Key, KeyAlgorithm, KeyFormat, KeyType, Result, ResultExt, UsageMask,
};

use super::{deserialize, import_raw, key_bytes, verify_usages, with_hash};

/// HKDF over SHA-1 and SHA-2
#[derive(Debug, Default, Clone, Copy)]
pub struct HkdfImplementation;

impl AlgorithmImplementation for HkdfImplementation {
    fn derive_bits(&self, algorithm: &Algorithm, base_key: &Key, length_bits: u32) -> Result<Vec<u8>> {
        let AlgorithmParams::Hkdf { hash, salt, info } = algorithm.params() else {
            return Err(Error::param("HKDF", "hash, salt and info are required"));
        };
        let len = validate::whole_bytes("HKDF length", length_bits)?;
        validate::parameter(
            len <= 255 * hash.output_len(),
            "HKDF length",
            "must not exceed 255 hash lengths",
        )?;

        let ikm = key_bytes(base_key)?;
        let mut okm = vec![0u8; len];
        with_hash!(*hash, |H| Hkdf::<H>::new(Some(salt.as_slice()), ikm)
            .expand(info, &mut okm)
            .or_operation_failed("HKDF expand"))?;
        Ok(okm)
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
        import_raw(AlgorithmId::Hkdf, format, key_data, extractable, usages)
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
        deserialize(AlgorithmId::Hkdf, key_type, extractable, usages, key_data)
    }
}
