//! SHA-1 and SHA-2 digests

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use webcrypt_api::{
    Algorithm, AlgorithmId, AlgorithmImplementation, CryptoData, Digestor, Error, HashId, Result,
};

use crate::ImplementationMap;

/// Register SHA-1, SHA-256, SHA-384 and SHA-512
pub fn register(map: &mut ImplementationMap) {
    for hash in [HashId::Sha1, HashId::Sha256, HashId::Sha384, HashId::Sha512] {
        map.insert(hash.algorithm_id(), Box::new(ShaImplementation::new(hash)));
    }
}

/// One-shot digest of `data` with `hash`
pub(crate) fn digest(hash: HashId, data: &[u8]) -> Vec<u8> {
    match hash {
        HashId::Sha1 => Sha1::digest(data).to_vec(),
        HashId::Sha256 => Sha256::digest(data).to_vec(),
        HashId::Sha384 => Sha384::digest(data).to_vec(),
        HashId::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Digest implementation for one SHA variant
#[derive(Debug, Clone, Copy)]
pub struct ShaImplementation {
    hash: HashId,
}

impl ShaImplementation {
    /// Create the implementation for `hash`
    pub fn new(hash: HashId) -> Self {
        Self { hash }
    }
}

impl AlgorithmImplementation for ShaImplementation {
    fn digest(&self, _algorithm: &Algorithm, data: CryptoData<'_>) -> Result<Vec<u8>> {
        Ok(digest(self.hash, data.as_bytes()))
    }
}

enum State {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Finished,
}

/// Streaming SHA digest
pub struct ShaDigestor {
    state: State,
}

impl ShaDigestor {
    /// Start a digest with `hash`
    pub fn new(hash: HashId) -> Self {
        let state = match hash {
            HashId::Sha1 => State::Sha1(Sha1::new()),
            HashId::Sha256 => State::Sha256(Sha256::new()),
            HashId::Sha384 => State::Sha384(Sha384::new()),
            HashId::Sha512 => State::Sha512(Sha512::new()),
        };
        Self { state }
    }
}

impl Digestor for ShaDigestor {
    fn update(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.state {
            State::Sha1(h) => h.update(data),
            State::Sha256(h) => h.update(data),
            State::Sha384(h) => h.update(data),
            State::Sha512(h) => h.update(data),
            State::Finished => return Err(Error::Unexpected { context: "digestor already finished" }),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let out = match std::mem::replace(&mut self.state, State::Finished) {
            State::Sha1(h) => h.finalize().to_vec(),
            State::Sha256(h) => h.finalize().to_vec(),
            State::Sha384(h) => h.finalize().to_vec(),
            State::Sha512(h) => h.finalize().to_vec(),
            State::Finished => return Err(Error::Unexpected { context: "digestor already finished" }),
        };
        Ok(out)
    }
}

/// Create a streaming digestor for a hash algorithm identifier
///
/// Identifiers that are not hashes are [`Error::NotSupported`].
pub fn create_digestor(id: AlgorithmId) -> Result<Box<dyn Digestor>> {
    let hash = id
        .as_hash()
        .ok_or(Error::not_supported("createDigestor"))?;
    Ok(Box::new(ShaDigestor::new(hash)))
}
