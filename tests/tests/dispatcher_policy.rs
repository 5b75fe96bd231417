//! Dispatcher policy checks observed through the counting fake

use webcrypt_api::{Algorithm, AlgorithmId, CryptoData, Error, KeyFormat, KeyUsage, UsageMask};
use webcrypt_core::{AlgorithmRegistry, Dispatcher, RegistryBuilder};
use webcrypt_tests::{init_tracing, Call, CallCounts, CountingImplementation};

use std::sync::Arc;

const FAKE: AlgorithmId = AlgorithmId::AesCbc;

fn fixture(fake: CountingImplementation) -> (AlgorithmRegistry, Arc<CallCounts>) {
    init_tracing();
    let calls = fake.calls();
    (RegistryBuilder::new().with(FAKE, fake).build(), calls)
}

fn alg() -> Algorithm {
    Algorithm::bare(FAKE)
}

#[test]
fn test_usage_denial_never_reaches_implementation() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);
    let data = CryptoData::from("payload");

    for usage in KeyUsage::ALL {
        // A key allowing everything except `usage`
        let key = fake.key(b"k", true, UsageMask::all() - usage.bit());
        let err = match usage {
            KeyUsage::Encrypt => dispatcher.encrypt(&alg(), &key, data).map(drop),
            KeyUsage::Decrypt => dispatcher.decrypt(&alg(), &key, data).map(drop),
            KeyUsage::Sign => dispatcher.sign(&alg(), &key, data).map(drop),
            KeyUsage::Verify => dispatcher.verify(&alg(), &key, data, data).map(drop),
            KeyUsage::DeriveBits => dispatcher.derive_bits(&alg(), &key, 128).map(drop),
            KeyUsage::DeriveKey => dispatcher
                .derive_key(&alg(), &key, &alg(), true, UsageMask::ENCRYPT)
                .map(drop),
            KeyUsage::WrapKey => dispatcher
                .wrap_key(KeyFormat::Raw, &key, &key, &alg())
                .map(drop),
            KeyUsage::UnwrapKey => dispatcher
                .unwrap_key(KeyFormat::Raw, data, &key, &alg(), &alg(), true, UsageMask::ENCRYPT)
                .map(drop),
        }
        .unwrap_err();

        assert_eq!(err, Error::UsageNotAllowed { usage: usage.name() });
    }

    assert_eq!(calls.total(), 0);
}

#[test]
fn test_algorithm_mismatch_precedes_lookup() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);
    let key = fake.key(b"k", true, UsageMask::all());

    // Neither of these ids is registered
    for other in [AlgorithmId::RsaOaep, AlgorithmId::Ecdsa] {
        let other = Algorithm::bare(other);
        let mismatch = Error::Unexpected { context: "algorithm does not match key" };

        let x = CryptoData::from("x");

        assert_eq!(dispatcher.encrypt(&other, &key, x).unwrap_err(), mismatch);
        assert_eq!(dispatcher.decrypt(&other, &key, x).unwrap_err(), mismatch);
        assert_eq!(dispatcher.sign(&other, &key, x).unwrap_err(), mismatch);
        assert_eq!(dispatcher.verify(&other, &key, x, x).unwrap_err(), mismatch);
        assert_eq!(dispatcher.derive_bits(&other, &key, 64).unwrap_err(), mismatch);
    }
    assert_eq!(calls.total(), 0);
}

#[test]
fn test_unwrap_checks_wrapping_algorithm_before_decrypt() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);
    let wrapping = fake.key(b"kek", false, UsageMask::UNWRAP_KEY);

    // The wrapping algorithm is unregistered and differs from the key's
    let err = dispatcher
        .unwrap_key(
            KeyFormat::Raw,
            CryptoData::from("wrapped"),
            &wrapping,
            &Algorithm::bare(AlgorithmId::RsaOaep),
            &alg(),
            true,
            UsageMask::ENCRYPT,
        )
        .unwrap_err();
    assert_eq!(err, Error::Unexpected { context: "algorithm does not match key" });
    assert_eq!(calls.get(Call::VerifyUsages), 0);
    assert_eq!(calls.get(Call::Decrypt), 0);
    assert_eq!(calls.total(), 0);
}

#[test]
fn test_wrap_checks_wrapping_algorithm_before_encrypt() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);
    let key = fake.key(b"inner", true, UsageMask::ENCRYPT);
    let wrapping = fake.key(b"kek", false, UsageMask::WRAP_KEY);

    let err = dispatcher
        .wrap_key(KeyFormat::Raw, &key, &wrapping, &Algorithm::bare(AlgorithmId::RsaOaep))
        .unwrap_err();
    assert_eq!(err, Error::Unexpected { context: "algorithm does not match key" });
    assert_eq!(calls.get(Call::Encrypt), 0);
}

#[test]
fn test_unregistered_algorithm_is_not_supported() {
    let (registry, _) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);

    let err = dispatcher
        .digest(&Algorithm::bare(AlgorithmId::Sha384), CryptoData::from("abc"))
        .unwrap_err();
    assert_eq!(err, Error::not_supported("SHA-384"));
    assert_eq!(err.kind(), webcrypt_api::ErrorKind::NotSupported);
}

#[test]
fn test_generate_key_rejects_empty_private_usages() {
    let (registry, calls) = fixture(CountingImplementation::new(FAKE).generating_empty_usages());
    let dispatcher = Dispatcher::new(&registry);

    let err = dispatcher
        .generate_key(&alg(), true, UsageMask::SIGN | UsageMask::VERIFY)
        .unwrap_err();
    assert_eq!(err, Error::CreateKeyEmptyUsages);
    assert_eq!(calls.get(Call::GenerateKey), 1);
}

#[test]
fn test_generate_key_pair() {
    let (registry, _) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);

    let pair = dispatcher
        .generate_key(&alg(), false, UsageMask::SIGN | UsageMask::VERIFY)
        .unwrap()
        .into_key_pair()
        .unwrap();
    assert_eq!(pair.private_key.usages(), UsageMask::SIGN | UsageMask::VERIFY);
    assert_eq!(pair.public_key.usages(), UsageMask::VERIFY);
    assert!(pair.public_key.extractable());
}

#[test]
fn test_export_non_extractable() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);

    let key = fake.key(b"secret", false, UsageMask::all());
    for format in [KeyFormat::Raw, KeyFormat::Jwk, KeyFormat::Pkcs8, KeyFormat::Spki] {
        assert_eq!(dispatcher.export_key(format, &key).unwrap_err(), Error::KeyNotExtractable);
    }

    // Wrapping exports too
    let wrapping = fake.key(b"kek", false, UsageMask::WRAP_KEY);
    assert_eq!(
        dispatcher
            .wrap_key(KeyFormat::Raw, &key, &wrapping, &alg())
            .unwrap_err(),
        Error::KeyNotExtractable
    );
    assert_eq!(calls.total(), 0);
}

#[test]
fn test_import_verifies_usages_first() {
    let (registry, calls) =
        fixture(CountingImplementation::new(FAKE).with_legal_usages(UsageMask::ENCRYPT | UsageMask::DECRYPT));
    let dispatcher = Dispatcher::new(&registry);

    let err = dispatcher
        .import_key(KeyFormat::Raw, CryptoData::from("bytes"), &alg(), true, UsageMask::SIGN)
        .unwrap_err();
    assert_eq!(err, Error::UsageNotAllowed { usage: "sign" });
    assert_eq!(calls.get(Call::VerifyUsages), 1);
    assert_eq!(calls.get(Call::ImportKey), 0);
}

#[test]
fn test_unwrap_rejects_target_usages_before_decrypt() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) =
        fixture(CountingImplementation::new(FAKE).with_legal_usages(UsageMask::ENCRYPT | UsageMask::UNWRAP_KEY));
    let dispatcher = Dispatcher::new(&registry);
    let wrapping = fake.key(b"kek", false, UsageMask::UNWRAP_KEY);

    let err = dispatcher
        .unwrap_key(
            KeyFormat::Raw,
            CryptoData::from("wrapped"),
            &wrapping,
            &alg(),
            &alg(),
            true,
            UsageMask::DERIVE_BITS,
        )
        .unwrap_err();
    assert_eq!(err, Error::UsageNotAllowed { usage: "deriveBits" });
    assert_eq!(calls.get(Call::Decrypt), 0);
    assert_eq!(calls.get(Call::ImportKey), 0);
}

#[test]
fn test_unwrap_failures_after_decrypt_are_indistinguishable() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);
    let wrapping = fake.key(b"kek", false, UsageMask::UNWRAP_KEY);
    let unwrap = |format| {
        dispatcher
            .unwrap_key(format, CryptoData::new(&[]), &wrapping, &alg(), &alg(), true, UsageMask::ENCRYPT)
            .unwrap_err()
    };

    // Empty plaintext and an unsupported format both fail inside import
    let empty = unwrap(KeyFormat::Raw);
    let format = unwrap(KeyFormat::Jwk);
    assert_eq!(empty, format);
    assert_eq!(empty, Error::OperationFailed { context: "unwrap key" });
    assert_eq!(calls.get(Call::Decrypt), 2);
}

#[test]
fn test_wrap_uses_wrap_usage_not_encrypt() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);

    let key = fake.key(b"inner", true, UsageMask::ENCRYPT);
    let wrapping = fake.key(b"kek", false, UsageMask::WRAP_KEY | UsageMask::UNWRAP_KEY);

    let wrapped = dispatcher.wrap_key(KeyFormat::Raw, &key, &wrapping, &alg()).unwrap();
    let unwrapped = dispatcher
        .unwrap_key(
            KeyFormat::Raw,
            CryptoData::new(&wrapped),
            &wrapping,
            &alg(),
            &alg(),
            true,
            UsageMask::ENCRYPT,
        )
        .unwrap();

    assert_eq!(dispatcher.export_key(KeyFormat::Raw, &unwrapped).unwrap(), b"inner");
    assert_eq!(unwrapped.usages(), UsageMask::ENCRYPT);
    assert_eq!(calls.get(Call::Encrypt), 1);
    assert_eq!(calls.get(Call::Decrypt), 1);
}

#[test]
fn test_derive_key_checks_target_before_deriving() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, calls) =
        fixture(CountingImplementation::new(FAKE).with_legal_usages(UsageMask::ENCRYPT | UsageMask::DERIVE_KEY));
    let dispatcher = Dispatcher::new(&registry);
    let base = fake.key(b"seed", false, UsageMask::DERIVE_KEY);

    assert!(dispatcher
        .derive_key(&alg(), &base, &alg(), true, UsageMask::SIGN)
        .is_err());
    assert_eq!(calls.get(Call::DeriveBits), 0);

    let derived = dispatcher
        .derive_key(&alg(), &base, &alg(), true, UsageMask::ENCRYPT)
        .unwrap();
    assert_eq!(calls.get(Call::GetKeyLength), 1);
    assert_eq!(dispatcher.export_key(KeyFormat::Raw, &derived).unwrap(), b"seedseedseedseed");
}

#[test]
fn test_clone_operations_return_none_on_failure() {
    let fake = CountingImplementation::new(FAKE);
    let (registry, _) = fixture(CountingImplementation::new(FAKE));
    let dispatcher = Dispatcher::new(&registry);

    // The fake leaves clone serialization unimplemented
    assert!(dispatcher
        .serialize_key_for_clone(&fake.key(b"k", true, UsageMask::ENCRYPT))
        .is_none());
}

#[test]
fn test_dispatcher_is_shareable_across_threads() {
    let (registry, calls) = fixture(CountingImplementation::new(FAKE));
    let registry: &'static AlgorithmRegistry = Box::leak(Box::new(registry));
    let fake = Arc::new(CountingImplementation::new(FAKE));

    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let fake = fake.clone();
            std::thread::spawn(move || {
                let dispatcher = Dispatcher::new(registry);
                let key = fake.key(&[i + 1], false, UsageMask::ENCRYPT | UsageMask::DECRYPT);
                let sealed = dispatcher.encrypt(&alg(), &key, CryptoData::from("shared")).unwrap();
                dispatcher.decrypt(&alg(), &key, CryptoData::new(&sealed)).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), b"shared");
    }
    assert_eq!(calls.get(Call::Encrypt), 4);
}
