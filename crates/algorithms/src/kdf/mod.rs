//! Key derivation functions
//!
//! HKDF and PBKDF2 keys are imported from raw bytes only, are never
//! extractable, and can only derive keys or bits.

use webcrypt_api::{
    validate, AlgorithmId, CryptoData, Error, Key, KeyAlgorithm, KeyFormat, KeyType,
    Result, SecretVec, UsageMask,
};

use crate::usage::{check_not_empty, check_usages};
use crate::ImplementationMap;

pub mod hkdf;
pub mod pbkdf2;

pub use self::hkdf::HkdfImplementation;
pub use self::pbkdf2::Pbkdf2Implementation;

const LEGAL_USAGES: UsageMask = UsageMask::DERIVE_KEY.union(UsageMask::DERIVE_BITS);

/// Register HKDF and PBKDF2
pub fn register(map: &mut ImplementationMap) {
    map.insert(AlgorithmId::Hkdf, Box::new(HkdfImplementation));
    map.insert(AlgorithmId::Pbkdf2, Box::new(Pbkdf2Implementation));
}

/// Input keying material or password
struct KdfKey(SecretVec);

fn key_bytes(key: &Key) -> Result<&[u8]> {
    key.handle::<KdfKey>()
        .map(|k| k.0.as_ref())
        .ok_or(Error::Unexpected { context: "KDF key handle" })
}

fn verify_usages(format: KeyFormat, usages: UsageMask) -> Result<()> {
    match format {
        KeyFormat::Raw => check_usages(LEGAL_USAGES, usages),
        _ => Err(Error::not_supported("KDF import format")),
    }
}

fn import_raw(
    id: AlgorithmId,
    format: KeyFormat,
    key_data: CryptoData<'_>,
    extractable: bool,
    usages: UsageMask,
) -> Result<Key> {
    if format != KeyFormat::Raw {
        return Err(Error::not_supported("KDF import format"));
    }
    validate::parameter(!extractable, "KDF import", "key must not be extractable")?;
    check_not_empty(usages)?;

    Ok(Key::new(
        KeyAlgorithm::bare(id),
        KeyType::Secret,
        false,
        usages,
        KdfKey(SecretVec::from_slice(key_data.as_bytes())),
    ))
}

fn deserialize(
    id: AlgorithmId,
    key_type: KeyType,
    extractable: bool,
    usages: UsageMask,
    key_data: CryptoData<'_>,
) -> Result<Key> {
    validate::parameter(key_type == KeyType::Secret, "KDF clone", "key type must be secret")?;
    import_raw(id, KeyFormat::Raw, key_data, extractable, usages)
}

/// Run `$body` with `$hash` bound to the digest type for a `HashId`
macro_rules! with_hash {
    ($id:expr, |$hash:ident| $body:expr) => {
        match $id {
            HashId::Sha1 => {
                type $hash = sha1::Sha1;
                $body
            }
            HashId::Sha256 => {
                type $hash = sha2::Sha256;
                $body
            }
            HashId::Sha384 => {
                type $hash = sha2::Sha384;
                $body
            }
            HashId::Sha512 => {
                type $hash = sha2::Sha512;
                $body
            }
        }
    };
}

pub(crate) use with_hash;
