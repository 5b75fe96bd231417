//! JSON Web Key reading and writing
//!
//! Only the members used by the supported families are modelled. Unknown
//! members are ignored on import. Every rejection carries a fixed message
//! naming the member, never the member's value.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use webcrypt_api::{Error, KeyUsage, Result, ResultExt, UsageMask};
use zeroize::{Zeroize, Zeroizing};

const CONTEXT: &str = "JWK";

/// Intended use of a key, the `use` member
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JwkUse {
    Enc,
    Sig,
}

impl JwkUse {
    fn as_str(self) -> &'static str {
        match self {
            Self::Enc => "enc",
            Self::Sig => "sig",
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
pub(crate) struct Jwk {
    kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    k: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    d: Option<String>,
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ext: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_ops: Option<Vec<String>>,
}

impl Drop for Jwk {
    fn drop(&mut self) {
        self.k.zeroize();
        self.d.zeroize();
    }
}

impl Jwk {
    /// Parse `data` and run the checks every family shares
    pub(crate) fn parse(
        data: &[u8],
        kty: &'static str,
        key_use: JwkUse,
        extractable: bool,
        usages: UsageMask,
    ) -> Result<Self> {
        let jwk: Jwk = serde_json::from_slice(data).or_invalid_key(CONTEXT, "not a JSON object")?;

        if jwk.kty != kty {
            return Err(Error::key_data(CONTEXT, "kty mismatch"));
        }
        if jwk.ext == Some(false) && extractable {
            return Err(Error::key_data(CONTEXT, "ext is false but the key is extractable"));
        }
        if let Some(ops) = &jwk.key_ops {
            let mut allowed = UsageMask::empty();
            for op in ops {
                let usage = KeyUsage::from_name(op)
                    .ok_or(Error::key_data(CONTEXT, "key_ops has an unknown operation"))?;
                if allowed.allows(usage) {
                    return Err(Error::key_data(CONTEXT, "key_ops has a duplicate operation"));
                }
                allowed |= usage.bit();
            }
            if !allowed.contains(usages) {
                return Err(Error::key_data(CONTEXT, "key_ops does not cover the requested usages"));
            }
        }
        if let Some(value) = &jwk.key_use {
            if value != key_use.as_str() {
                return Err(Error::key_data(CONTEXT, "use mismatch"));
            }
        }

        Ok(jwk)
    }

    /// Start a JWK for export
    pub(crate) fn new(kty: &str, extractable: bool, usages: UsageMask) -> Self {
        let mut jwk = Self::default();
        jwk.kty = kty.to_owned();
        jwk.ext = Some(extractable);
        jwk.key_ops = Some(usages.usages().map(|u| u.name().to_owned()).collect());
        jwk
    }

    /// Reject a present `alg` that differs from `expected`
    pub(crate) fn check_alg(&self, expected: &str) -> Result<()> {
        match &self.alg {
            Some(alg) if alg != expected => Err(Error::key_data(CONTEXT, "alg mismatch")),
            _ => Ok(()),
        }
    }

    /// Like [`Jwk::check_alg`] for families with more than one valid name
    pub(crate) fn check_alg_any(&self, expected: &[&str]) -> Result<()> {
        match &self.alg {
            Some(alg) if !expected.contains(&alg.as_str()) => {
                Err(Error::key_data(CONTEXT, "alg mismatch"))
            }
            _ => Ok(()),
        }
    }

    /// Reject a missing or different `crv`
    pub(crate) fn check_crv(&self, expected: &str) -> Result<()> {
        match &self.crv {
            Some(crv) if crv == expected => Ok(()),
            Some(_) => Err(Error::key_data(CONTEXT, "crv mismatch")),
            None => Err(Error::key_data(CONTEXT, "crv missing")),
        }
    }

    /// The decoded `k` member
    pub(crate) fn k(&self) -> Result<Zeroizing<Vec<u8>>> {
        decode_member(self.k.as_deref(), "k missing", "k is not base64url")
    }

    /// The decoded `x` member
    pub(crate) fn x(&self) -> Result<Vec<u8>> {
        decode_member(self.x.as_deref(), "x missing", "x is not base64url").map(|x| x.to_vec())
    }

    /// The decoded `d` member, if present
    pub(crate) fn d(&self) -> Result<Option<Zeroizing<Vec<u8>>>> {
        match self.d.as_deref() {
            Some(d) => decode_member(Some(d), "d missing", "d is not base64url").map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn set_alg(&mut self, alg: &str) {
        self.alg = Some(alg.to_owned());
    }

    pub(crate) fn set_crv(&mut self, crv: &str) {
        self.crv = Some(crv.to_owned());
    }

    pub(crate) fn set_k(&mut self, k: &[u8]) {
        self.k = Some(URL_SAFE_NO_PAD.encode(k));
    }

    pub(crate) fn set_x(&mut self, x: &[u8]) {
        self.x = Some(URL_SAFE_NO_PAD.encode(x));
    }

    pub(crate) fn set_d(&mut self, d: &[u8]) {
        self.d = Some(URL_SAFE_NO_PAD.encode(d));
    }

    /// Serialize to UTF-8 JSON bytes
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).or_operation_failed("JWK serialization")
    }
}

fn decode_member(
    value: Option<&str>,
    missing: &'static str,
    malformed: &'static str,
) -> Result<Zeroizing<Vec<u8>>> {
    let value = value.ok_or(Error::key_data(CONTEXT, missing))?;
    URL_SAFE_NO_PAD
        .decode(value)
        .map(Zeroizing::new)
        .or_invalid_key(CONTEXT, malformed)
}
