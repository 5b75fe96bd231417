//! Published test vectors run end to end through the global dispatcher

use webcrypt_api::{Algorithm, AlgorithmId, CryptoData, HashId, Key, KeyFormat, KeyType, UsageMask};
use webcrypt_core::Dispatcher;
use webcrypt_tests::{init_tracing, unhex};

fn dispatcher() -> Dispatcher<'static> {
    init_tracing();
    Dispatcher::global()
}

fn import_raw(algorithm: &Algorithm, bytes: &[u8], extractable: bool, usages: UsageMask) -> Key {
    dispatcher()
        .import_key(KeyFormat::Raw, CryptoData::new(bytes), algorithm, extractable, usages)
        .unwrap()
}

#[test]
fn test_sha_digests_of_abc() {
    let vectors = [
        (AlgorithmId::Sha1, "a9993e364706816aba3e25717850c26c9cd0d89d"),
        (
            AlgorithmId::Sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        ),
        (
            AlgorithmId::Sha384,
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7",
        ),
        (
            AlgorithmId::Sha512,
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
        ),
    ];

    for (id, expected) in vectors {
        let out = dispatcher()
            .digest(&Algorithm::bare(id), CryptoData::from("abc"))
            .unwrap();
        assert_eq!(hex::encode(out), expected, "{id}");
    }
}

#[test]
fn test_streaming_digest_matches_one_shot() {
    let message = vec![0x61u8; 1000];
    for id in [AlgorithmId::Sha1, AlgorithmId::Sha256, AlgorithmId::Sha384, AlgorithmId::Sha512] {
        let alg = Algorithm::bare(id);
        let mut digestor = dispatcher().create_digestor(&alg).unwrap();
        for chunk in message.chunks(77) {
            digestor.update(chunk).unwrap();
        }
        assert_eq!(
            digestor.finish().unwrap(),
            dispatcher().digest(&alg, CryptoData::new(&message)).unwrap()
        );
    }
}

#[test]
fn test_hmac_sha256_rfc4231_case_2() {
    let alg = Algorithm::hmac(HashId::Sha256);
    let key = import_raw(&alg, b"Jefe", false, UsageMask::SIGN | UsageMask::VERIFY);
    let data = CryptoData::from("what do ya want for nothing?");

    let tag = dispatcher().sign(&alg, &key, data).unwrap();
    assert_eq!(
        hex::encode(&tag),
        "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
    );
    assert!(dispatcher().verify(&alg, &key, CryptoData::new(&tag), data).unwrap());
}

#[test]
fn test_hkdf_rfc5869_case_1() {
    let base = import_raw(
        &Algorithm::bare(AlgorithmId::Hkdf),
        &[0x0b; 22],
        false,
        UsageMask::DERIVE_BITS,
    );
    let alg = Algorithm::hkdf(
        HashId::Sha256,
        &unhex("000102030405060708090a0b0c"),
        &unhex("f0f1f2f3f4f5f6f7f8f9"),
    );

    let okm = dispatcher().derive_bits(&alg, &base, 42 * 8).unwrap();
    assert_eq!(
        hex::encode(okm),
        "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
    );
}

#[test]
fn test_pbkdf2_sha1_rfc6070_case_2() {
    let base = import_raw(
        &Algorithm::bare(AlgorithmId::Pbkdf2),
        b"password",
        false,
        UsageMask::DERIVE_BITS,
    );
    let out = dispatcher()
        .derive_bits(&Algorithm::pbkdf2(HashId::Sha1, b"salt", 2), &base, 160)
        .unwrap();
    assert_eq!(hex::encode(out), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
}

#[test]
fn test_aes_kw_rfc3394_wraps_an_aes_key() {
    let kw = Algorithm::bare(AlgorithmId::AesKw);
    let kek = import_raw(
        &kw,
        &unhex("000102030405060708090A0B0C0D0E0F"),
        false,
        UsageMask::WRAP_KEY | UsageMask::UNWRAP_KEY,
    );
    let inner = import_raw(
        &Algorithm::bare(AlgorithmId::AesGcm),
        &unhex("00112233445566778899AABBCCDDEEFF"),
        true,
        UsageMask::ENCRYPT,
    );

    let wrapped = dispatcher().wrap_key(KeyFormat::Raw, &inner, &kek, &kw).unwrap();
    assert_eq!(wrapped, unhex("1FA68B0A8112B447AEF34BD8FB5A7B829D3E862371D2CFE5"));

    let unwrapped = dispatcher()
        .unwrap_key(
            KeyFormat::Raw,
            CryptoData::new(&wrapped),
            &kek,
            &kw,
            &Algorithm::bare(AlgorithmId::AesGcm),
            true,
            UsageMask::ENCRYPT,
        )
        .unwrap();
    assert_eq!(
        dispatcher().export_key(KeyFormat::Raw, &unwrapped).unwrap(),
        unhex("00112233445566778899AABBCCDDEEFF")
    );
}

#[test]
fn test_aes_gcm_nist_case_3() {
    let key = import_raw(
        &Algorithm::bare(AlgorithmId::AesGcm),
        &unhex("feffe9928665731c6d6a8f9467308308"),
        false,
        UsageMask::ENCRYPT | UsageMask::DECRYPT,
    );
    let alg = Algorithm::aes_gcm(&unhex("cafebabefacedbaddecaf888"));
    let plaintext = unhex(
        "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72\
         1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b391aafd255",
    );

    let sealed = dispatcher().encrypt(&alg, &key, CryptoData::new(&plaintext)).unwrap();
    assert_eq!(
        hex::encode(&sealed),
        "42831ec2217774244b7221b784d0d49ce3aa212f2c02a4e035c17e2329aca12e\
         21d514b25466931c7d8f6a5aac84aa051ba30b396a0aac973d58e091473f5985\
         4d5c2af327cd64a62cf35abd2ba6fab4"
    );
}

#[test]
fn test_ed25519_rfc8032_test_1() {
    let alg = Algorithm::bare(AlgorithmId::Ed25519);

    // PKCS#8 v1 wrapping of the RFC seed
    let pkcs8 = unhex(
        "302e020100300506032b657004220420\
         9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
    );
    let private = dispatcher()
        .import_key(KeyFormat::Pkcs8, CryptoData::new(&pkcs8), &alg, false, UsageMask::SIGN)
        .unwrap();
    assert_eq!(private.key_type(), KeyType::Private);

    let public = import_raw(
        &alg,
        &unhex("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"),
        true,
        UsageMask::VERIFY,
    );

    let signature = dispatcher().sign(&alg, &private, CryptoData::new(&[])).unwrap();
    assert_eq!(
        hex::encode(&signature),
        "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
    );
    assert!(dispatcher()
        .verify(&alg, &public, CryptoData::new(&signature), CryptoData::new(&[]))
        .unwrap());
    assert!(!dispatcher()
        .verify(&alg, &public, CryptoData::new(&signature), CryptoData::from("tampered"))
        .unwrap());
}
