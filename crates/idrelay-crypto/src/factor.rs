// SPDX-License-Identifier: BUSL-1.1
//! # Encrypt Factor Generation
//!
//! The encrypt factor is a short alphanumeric token the relay sends with
//! every outbound request. The decoding service encrypts its `info` payload
//! with it (DES key and CBC IV), so it only has to be unpredictable for the
//! lifetime of one request.
//!
//! Every call draws fresh bytes from the operating system CSPRNG
//! ([`rand_core::OsRng`]). There is no shared generator to reseed, so
//! concurrent requests cannot observe correlated factors.

use std::fmt;

use rand_core::{OsRng, RngCore};

/// Length of the encrypt factor in characters (one DES block).
pub const FACTOR_LEN: usize = 8;

const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 6 bits address 64 slots; the two slots past the alphabet are rejected.
const INDEX_MASK: u8 = 0b0011_1111;

/// Generate a random token of `len` characters over `[a-zA-Z0-9]`.
///
/// Each random byte contributes one 6-bit candidate index; candidates that
/// fall outside the 62-symbol alphabet are discarded, which keeps the
/// distribution uniform.
pub fn random_token(len: usize) -> String {
    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 32];
    while out.len() < len {
        OsRng.fill_bytes(&mut buf);
        for byte in buf {
            let idx = usize::from(byte & INDEX_MASK);
            if let Some(&c) = ALPHABET.get(idx) {
                out.push(char::from(c));
                if out.len() == len {
                    break;
                }
            }
        }
    }
    out
}

/// Per-request DES key/IV material.
///
/// Always exactly [`FACTOR_LEN`] ASCII alphanumeric characters.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptFactor(String);

impl EncryptFactor {
    /// Draw a fresh factor.
    pub fn generate() -> Self {
        Self(random_token(FACTOR_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for EncryptFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EncryptFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptFactor([REDACTED])")
    }
}
