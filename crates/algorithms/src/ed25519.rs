//! Ed25519 signatures (RFC 8032)
//!
//! Generation yields a key pair. Public keys import and export as raw
//! 32-byte points, SPKI or JWK; private keys as PKCS#8 or JWK.

use ed25519_dalek::pkcs8::spki::{DecodePublicKey, EncodePublicKey};
use ed25519_dalek::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, SIGNATURE_LENGTH};
use rand::rngs::OsRng;
use webcrypt_api::{
    Algorithm, AlgorithmId, AlgorithmImplementation, CryptoData, Error, GenerateKeyResult, Key,
    KeyAlgorithm, KeyFormat, KeyPair, KeyType, Result, ResultExt, UsageMask,
};
use zeroize::Zeroizing;

use crate::jwk::{Jwk, JwkUse};
use crate::usage::{check_not_empty, check_usages};
use crate::ImplementationMap;

const CRV: &str = "Ed25519";
const PRIVATE_USAGES: UsageMask = UsageMask::SIGN;
const PUBLIC_USAGES: UsageMask = UsageMask::VERIFY;

/// Register Ed25519
pub fn register(map: &mut ImplementationMap) {
    map.insert(AlgorithmId::Ed25519, Box::new(Ed25519Implementation));
}

struct PrivateKey(SigningKey);

struct PublicKey(VerifyingKey);

fn algorithm() -> KeyAlgorithm {
    KeyAlgorithm::bare(AlgorithmId::Ed25519)
}

fn private_key(signing_key: SigningKey, extractable: bool, usages: UsageMask) -> Result<Key> {
    check_not_empty(usages)?;
    Ok(Key::new(
        algorithm(),
        KeyType::Private,
        extractable,
        usages,
        PrivateKey(signing_key),
    ))
}

fn public_key(verifying_key: VerifyingKey, extractable: bool, usages: UsageMask) -> Key {
    Key::new(
        algorithm(),
        KeyType::Public,
        extractable,
        usages,
        PublicKey(verifying_key),
    )
}

fn signing_key_from_seed(seed: &[u8]) -> Result<SigningKey> {
    let seed = Zeroizing::new(
        <[u8; 32]>::try_from(seed).or_invalid_key("Ed25519 private key", "must be 32 bytes")?,
    );
    Ok(SigningKey::from_bytes(&seed))
}

fn verifying_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey> {
    let bytes =
        <[u8; 32]>::try_from(bytes).or_invalid_key("Ed25519 public key", "must be 32 bytes")?;
    VerifyingKey::from_bytes(&bytes).or_invalid_key("Ed25519 public key", "not a valid point")
}

fn signing_key(key: &Key) -> Result<&SigningKey> {
    key.handle::<PrivateKey>()
        .map(|k| &k.0)
        .ok_or(Error::Unexpected { context: "Ed25519 private key handle" })
}

fn verifying_key(key: &Key) -> Result<&VerifyingKey> {
    key.handle::<PublicKey>()
        .map(|k| &k.0)
        .ok_or(Error::Unexpected { context: "Ed25519 public key handle" })
}

fn import_jwk(data: &[u8], extractable: bool, usages: UsageMask) -> Result<Key> {
    let jwk = Jwk::parse(data, "OKP", JwkUse::Sig, extractable, usages)?;
    jwk.check_crv(CRV)?;
    jwk.check_alg_any(&["EdDSA", "Ed25519"])?;
    let x = jwk.x()?;

    match jwk.d()? {
        Some(d) => {
            check_usages(PRIVATE_USAGES, usages)?;
            let signing_key = signing_key_from_seed(&d)?;
            if signing_key.verifying_key().as_bytes() != x.as_slice() {
                return Err(Error::key_data("JWK", "x does not match d"));
            }
            private_key(signing_key, extractable, usages)
        }
        None => {
            check_usages(PUBLIC_USAGES, usages)?;
            Ok(public_key(verifying_key_from_bytes(&x)?, extractable, usages))
        }
    }
}

fn export_jwk(key: &Key) -> Result<Vec<u8>> {
    let mut jwk = Jwk::new("OKP", key.extractable(), key.usages());
    jwk.set_crv(CRV);
    jwk.set_alg("EdDSA");
    match key.key_type() {
        KeyType::Private => {
            let signing_key = signing_key(key)?;
            jwk.set_x(signing_key.verifying_key().as_bytes());
            jwk.set_d(&Zeroizing::new(signing_key.to_bytes())[..]);
        }
        _ => jwk.set_x(verifying_key(key)?.as_bytes()),
    }
    jwk.to_bytes()
}

/// Ed25519
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Implementation;

impl AlgorithmImplementation for Ed25519Implementation {
    fn sign(&self, _algorithm: &Algorithm, key: &Key, data: CryptoData<'_>) -> Result<Vec<u8>> {
        let signature = signing_key(key)?.sign(data.as_bytes());
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(
        &self,
        _algorithm: &Algorithm,
        key: &Key,
        signature: CryptoData<'_>,
        data: CryptoData<'_>,
    ) -> Result<bool> {
        let bytes = <[u8; SIGNATURE_LENGTH]>::try_from(signature.as_bytes())
            .wrap_err(|| Error::param("Ed25519 signature", "must be 64 bytes"))?;
        let signature = Signature::from_bytes(&bytes);
        Ok(verifying_key(key)?.verify(data.as_bytes(), &signature).is_ok())
    }

    fn generate_key(
        &self,
        _algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<GenerateKeyResult> {
        check_usages(PRIVATE_USAGES | PUBLIC_USAGES, usages)?;

        let signing_key = SigningKey::generate(&mut OsRng);
        let public = public_key(signing_key.verifying_key(), true, usages & PUBLIC_USAGES);
        let private = private_key(signing_key, extractable, usages & PRIVATE_USAGES)?;

        Ok(GenerateKeyResult::KeyPair(KeyPair {
            public_key: public,
            private_key: private,
        }))
    }

    fn verify_key_usages_before_import_key(&self, format: KeyFormat, usages: UsageMask) -> Result<()> {
        match format {
            KeyFormat::Raw | KeyFormat::Spki => check_usages(PUBLIC_USAGES, usages),
            KeyFormat::Pkcs8 => check_usages(PRIVATE_USAGES, usages),
            KeyFormat::Jwk => check_usages(PRIVATE_USAGES | PUBLIC_USAGES, usages),
        }
    }

    fn import_key(
        &self,
        format: KeyFormat,
        key_data: CryptoData<'_>,
        _algorithm: &Algorithm,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<Key> {
        let data = key_data.as_bytes();
        match format {
            KeyFormat::Raw => Ok(public_key(verifying_key_from_bytes(data)?, extractable, usages)),
            KeyFormat::Spki => {
                let verifying_key = VerifyingKey::from_public_key_der(data)
                    .or_invalid_key("Ed25519 SPKI", "malformed public key info")?;
                Ok(public_key(verifying_key, extractable, usages))
            }
            KeyFormat::Pkcs8 => {
                let signing_key = SigningKey::from_pkcs8_der(data)
                    .or_invalid_key("Ed25519 PKCS#8", "malformed private key info")?;
                private_key(signing_key, extractable, usages)
            }
            KeyFormat::Jwk => import_jwk(data, extractable, usages),
        }
    }

    fn export_key(&self, format: KeyFormat, key: &Key) -> Result<Vec<u8>> {
        match (format, key.key_type()) {
            (KeyFormat::Raw, KeyType::Public) => Ok(verifying_key(key)?.as_bytes().to_vec()),
            (KeyFormat::Spki, KeyType::Public) => verifying_key(key)?
                .to_public_key_der()
                .map(|der| der.as_bytes().to_vec())
                .or_operation_failed("Ed25519 SPKI encoding"),
            (KeyFormat::Pkcs8, KeyType::Private) => signing_key(key)?
                .to_pkcs8_der()
                .map(|der| der.as_bytes().to_vec())
                .or_operation_failed("Ed25519 PKCS#8 encoding"),
            (KeyFormat::Jwk, _) => export_jwk(key),
            _ => Err(Error::not_supported("Ed25519 export format for this key type")),
        }
    }

    fn serialize_key_for_clone(&self, key: &Key) -> Result<Vec<u8>> {
        match key.key_type() {
            KeyType::Private => Ok(signing_key(key)?.to_bytes().to_vec()),
            _ => Ok(verifying_key(key)?.as_bytes().to_vec()),
        }
    }

    fn deserialize_key_for_clone(
        &self,
        _algorithm: &KeyAlgorithm,
        key_type: KeyType,
        extractable: bool,
        usages: UsageMask,
        key_data: CryptoData<'_>,
    ) -> Result<Key> {
        match key_type {
            KeyType::Private => {
                private_key(signing_key_from_seed(key_data.as_bytes())?, extractable, usages)
            }
            KeyType::Public => Ok(public_key(
                verifying_key_from_bytes(key_data.as_bytes())?,
                extractable,
                usages,
            )),
            KeyType::Secret => Err(Error::param("Ed25519 clone", "key type must be public or private")),
        }
    }
}
