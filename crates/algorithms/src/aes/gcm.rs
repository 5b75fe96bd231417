//! AES-GCM authenticated encryption
//!
//! Ciphertext is `ct || tag`. The iv must be 96 bits; the tag may be
//! truncated to 96..=128 bits in byte steps.

use ::aes::{Aes128, Aes256};
use aes_gcm::aead::consts::{U12, U13, U14, U15, U16};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{AesGcm, Nonce};
use webcrypt_api::{
    validate, Algorithm, AlgorithmId, AlgorithmImplementation, AlgorithmParams, CryptoData, Error,
    GenerateKeyResult, Key, KeyAlgorithm, KeyFormat, KeyType, Result, ResultExt, UsageMask,
};

use super::{delegate_key_management, key_bytes, AesFamily};

const IV_LEN: usize = 12;
const DEFAULT_TAG_BITS: u32 = 128;

#[derive(Clone, Copy)]
enum Direction {
    Seal,
    Open,
}

/// Run one AEAD call for a concrete key size and tag size
macro_rules! gcm_apply {
    ($aes:ty, $tag:ty, $key:expr, $nonce:expr, $payload:expr, $direction:expr) => {{
        let cipher = <AesGcm<$aes, U12, $tag> as KeyInit>::new_from_slice($key)
            .or_invalid_key("AES-GCM", "bad key length")?;
        match $direction {
            Direction::Seal => cipher.encrypt($nonce, $payload),
            Direction::Open => cipher.decrypt($nonce, $payload),
        }
    }};
}

/// AES-GCM
pub struct AesGcmImplementation {
    family: AesFamily,
}

impl AesGcmImplementation {
    /// Create the implementation
    pub fn new() -> Self {
        Self {
            family: AesFamily::new(
                AlgorithmId::AesGcm,
                UsageMask::ENCRYPT
                    | UsageMask::DECRYPT
                    | UsageMask::WRAP_KEY
                    | UsageMask::UNWRAP_KEY,
                "GCM",
            ),
        }
    }
}

impl Default for AesGcmImplementation {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated per-call parameters
struct GcmParams<'a> {
    iv: &'a [u8],
    additional_data: &'a [u8],
    tag_len: usize,
}

fn gcm_params(algorithm: &Algorithm) -> Result<GcmParams<'_>> {
    let AlgorithmParams::AesGcm {
        iv,
        additional_data,
        tag_length_bits,
    } = algorithm.params()
    else {
        return Err(Error::param("AES-GCM", "iv is required"));
    };

    if iv.len() != IV_LEN {
        return Err(Error::not_supported("AES-GCM iv other than 96 bits"));
    }

    let tag_bits = tag_length_bits.unwrap_or(DEFAULT_TAG_BITS);
    match tag_bits {
        96 | 104 | 112 | 120 | 128 => {}
        32 | 64 => return Err(Error::not_supported("AES-GCM tag shorter than 96 bits")),
        _ => return Err(Error::param("AES-GCM", "invalid tag length")),
    }

    Ok(GcmParams {
        iv,
        additional_data: additional_data.as_deref().unwrap_or_default(),
        tag_len: (tag_bits / 8) as usize,
    })
}

fn gcm(key: &[u8], params: &GcmParams<'_>, data: &[u8], direction: Direction) -> Result<Vec<u8>> {
    let nonce = Nonce::<U12>::from_slice(params.iv);
    let payload = Payload {
        msg: data,
        aad: params.additional_data,
    };

    let out = match (key.len(), params.tag_len) {
        (16, 12) => gcm_apply!(Aes128, U12, key, nonce, payload, direction),
        (16, 13) => gcm_apply!(Aes128, U13, key, nonce, payload, direction),
        (16, 14) => gcm_apply!(Aes128, U14, key, nonce, payload, direction),
        (16, 15) => gcm_apply!(Aes128, U15, key, nonce, payload, direction),
        (16, 16) => gcm_apply!(Aes128, U16, key, nonce, payload, direction),
        (32, 12) => gcm_apply!(Aes256, U12, key, nonce, payload, direction),
        (32, 13) => gcm_apply!(Aes256, U13, key, nonce, payload, direction),
        (32, 14) => gcm_apply!(Aes256, U14, key, nonce, payload, direction),
        (32, 15) => gcm_apply!(Aes256, U15, key, nonce, payload, direction),
        (32, 16) => gcm_apply!(Aes256, U16, key, nonce, payload, direction),
        _ => return Err(Error::Unexpected { context: "AES-GCM key or tag size" }),
    };

    out.or_operation_failed("AES-GCM")
}

impl AlgorithmImplementation for AesGcmImplementation {
    fn encrypt(&self, algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        let params = gcm_params(algorithm)?;
        gcm(key_bytes(key)?, &params, data.as_bytes(), Direction::Seal)
    }

    fn decrypt(&self, algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        let params = gcm_params(algorithm)?;
        validate::min_length("AES-GCM ciphertext", data.len(), params.tag_len)?;
        gcm(key_bytes(key)?, &params, data.as_bytes(), Direction::Open)
    }

    delegate_key_management!();
}
