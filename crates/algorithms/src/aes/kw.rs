//! AES Key Wrap (RFC 3394)

use ::aes::{Aes128, Aes256};
use aes_kw::Kek;
use webcrypt_api::{
    Algorithm, AlgorithmId, AlgorithmImplementation, CryptoData, Error, GenerateKeyResult, Key,
    KeyAlgorithm, KeyFormat, KeyType, Result, ResultExt, UsageMask,
};

use super::{delegate_key_management, key_bytes, AesFamily};

const SEMIBLOCK: usize = 8;
const MIN_DATA_LEN: usize = 16;

/// AES-KW
///
/// Encrypt wraps and decrypt unwraps. The legal usages are wrapKey and
/// unwrapKey only, so both are reached through the dispatcher's key
/// wrapping operations.
pub struct AesKwImplementation {
    family: AesFamily,
}

impl AesKwImplementation {
    /// Create the implementation
    pub fn new() -> Self {
        Self {
            family: AesFamily::new(
                AlgorithmId::AesKw,
                UsageMask::WRAP_KEY | UsageMask::UNWRAP_KEY,
                "KW",
            ),
        }
    }
}

impl Default for AesKwImplementation {
    fn default() -> Self {
        Self::new()
    }
}

fn check_data_len(context: &'static str, len: usize, min: usize) -> Result<()> {
    if len < min || len % SEMIBLOCK != 0 {
        return Err(Error::param(context, "must be a multiple of 8 bytes and at least 16 bytes"));
    }
    Ok(())
}

fn wrap(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; data.len() + SEMIBLOCK];
    let result = match key.len() {
        16 => Kek::<Aes128>::new(key.into()).wrap(data, &mut out),
        32 => Kek::<Aes256>::new(key.into()).wrap(data, &mut out),
        _ => return Err(Error::Unexpected { context: "AES-KW key size" }),
    };
    result.or_operation_failed("AES-KW wrap")?;
    Ok(out)
}

fn unwrap(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; data.len() - SEMIBLOCK];
    let result = match key.len() {
        16 => Kek::<Aes128>::new(key.into()).unwrap(data, &mut out),
        32 => Kek::<Aes256>::new(key.into()).unwrap(data, &mut out),
        _ => return Err(Error::Unexpected { context: "AES-KW key size" }),
    };
    result.or_operation_failed("AES-KW unwrap")?;
    Ok(out)
}

impl AlgorithmImplementation for AesKwImplementation {
    fn encrypt(&self, _algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        check_data_len("AES-KW data", data.len(), MIN_DATA_LEN)?;
        wrap(key_bytes(key)?, data.as_bytes())
    }

    fn decrypt(&self, _algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        check_data_len("AES-KW wrapped data", data.len(), MIN_DATA_LEN + SEMIBLOCK)?;
        unwrap(key_bytes(key)?, data.as_bytes())
    }

    delegate_key_management!();
}
