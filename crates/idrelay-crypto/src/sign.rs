// SPDX-License-Identifier: BUSL-1.1
//! # Canonical Request Signing
//!
//! The decoding service authenticates callers by recomputing a signature
//! over the submitted form fields. Canonical form:
//!
//! 1. keys sorted byte-wise ascending,
//! 2. `key=value` pairs joined with `&` (no trailing separator),
//! 3. shared secret appended directly,
//! 4. MD5 of the result, hex-encoded, uppercased.
//!
//! ```text
//! app_id=A1&encrypt_factor=x8Kd02Qa&request_id=R-9<secret>  ──md5──►  "9F2C…"
//! ```
//!
//! The `sign` field itself is never part of its own input. [`SignedRequest`]
//! enforces that by refusing parameter sets that already carry it.

use std::collections::BTreeMap;

use subtle::ConstantTimeEq;

use crate::error::SignError;

/// Name of the form field carrying the signature.
pub const SIGN_FIELD: &str = "sign";

/// Build the string that gets hashed: sorted `k=v` pairs joined by `&`,
/// followed immediately by `secret`.
///
/// Contains the secret. Never log it.
pub fn pre_sign_string(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut out = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    out.push_str(secret);
    out
}

/// Compute the uppercase hex MD5 signature of `params` under `secret`.
pub fn compute_sign(params: &BTreeMap<String, String>, secret: &str) -> String {
    let digest = md5::compute(pre_sign_string(params, secret).as_bytes());
    format!("{digest:x}").to_uppercase()
}

/// A parameter set together with its signature.
///
/// Immutable once built: the only way to obtain one is [`SignedRequest::sign`],
/// which guarantees exactly one `sign` value computed over the other fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    params: BTreeMap<String, String>,
    sign: String,
}

impl SignedRequest {
    /// Sign `params` with `secret`.
    pub fn sign(params: BTreeMap<String, String>, secret: &str) -> Result<Self, SignError> {
        if params.is_empty() {
            return Err(SignError::EmptyParams);
        }
        if params.contains_key(SIGN_FIELD) {
            return Err(SignError::ReservedField(SIGN_FIELD));
        }
        let sign = compute_sign(&params, secret);
        Ok(Self { params, sign })
    }

    /// Rebuild a signed request from a received form, splitting off `sign`.
    ///
    /// Returns `None` when the form has no `sign` field or nothing else.
    pub fn from_form(mut form: BTreeMap<String, String>) -> Option<Self> {
        let sign = form.remove(SIGN_FIELD)?;
        if form.is_empty() {
            return None;
        }
        Some(Self { params: form, sign })
    }

    /// Check the carried signature against `secret` in constant time.
    pub fn verify(&self, secret: &str) -> bool {
        let expected = compute_sign(&self.params, secret);
        expected.as_bytes().ct_eq(self.sign.as_bytes()).into()
    }

    pub fn sign_value(&self) -> &str {
        &self.sign
    }

    /// The signed fields, without `sign`.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if key == SIGN_FIELD {
            return Some(&self.sign);
        }
        self.params.get(key).map(String::as_str)
    }

    /// Every form field including `sign`, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut fields: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let pos = fields.partition_point(|(k, _)| *k < SIGN_FIELD);
        fields.insert(pos, (SIGN_FIELD, self.sign.as_str()));
        fields.into_iter()
    }
}
