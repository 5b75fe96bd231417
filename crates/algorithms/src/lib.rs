//! Algorithm implementations for the webcrypt dispatcher
//!
//! Each algorithm family lives in its own module behind a cargo feature and
//! exposes a `register` function that adds its implementations to an
//! [`ImplementationMap`]. The dispatcher crate builds its registry from
//! [`register_all`].
//!
//! Key material never leaves this crate except through export: every family
//! stores its bytes in a private handle type inside the [`webcrypt_api::Key`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::collections::HashMap;

use webcrypt_api::{AlgorithmId, AlgorithmImplementation};

#[cfg(any(feature = "aes", feature = "hmac", feature = "ed25519"))]
mod jwk;
#[cfg(any(feature = "aes", feature = "hmac", feature = "kdf", feature = "ed25519"))]
mod usage;

#[cfg(feature = "aes")]
pub mod aes;
#[cfg(feature = "ed25519")]
pub mod ed25519;
#[cfg(feature = "hmac")]
pub mod hmac;
#[cfg(feature = "kdf")]
pub mod kdf;
#[cfg(feature = "sha")]
pub mod sha;

#[cfg(feature = "sha")]
pub use sha::create_digestor;

/// Registry storage: one implementation per algorithm identifier
pub type ImplementationMap = HashMap<AlgorithmId, Box<dyn AlgorithmImplementation>>;

/// Register every algorithm family enabled at compile time
pub fn register_all(map: &mut ImplementationMap) {
    #[cfg(feature = "aes")]
    aes::register(map);
    #[cfg(feature = "hmac")]
    hmac::register(map);
    #[cfg(feature = "sha")]
    sha::register(map);
    #[cfg(feature = "kdf")]
    kdf::register(map);
    #[cfg(feature = "ed25519")]
    ed25519::register(map);

    tracing::trace!(algorithms = map.len(), "registered algorithm implementations");
}
