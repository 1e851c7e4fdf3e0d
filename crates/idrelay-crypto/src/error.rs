// SPDX-License-Identifier: BUSL-1.1
//! # Cryptographic Error Types
//!
//! Structured errors for signing and payload decryption.
//! Uses `thiserror` for ergonomic error definitions with diagnostic context.

use thiserror::Error;

/// Errors from DES-CBC payload encryption and decryption.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Key or IV is not exactly one DES block long.
    #[error("invalid DES key length: expected 8 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// Ciphertext is empty or not a whole number of blocks.
    #[error("invalid ciphertext length: {0} bytes is not a positive multiple of 8")]
    InvalidCiphertextLength(usize),

    /// Final byte is not a usable PKCS#5 padding count.
    #[error("invalid PKCS#5 padding count: {0}")]
    InvalidPadding(u8),

    /// The encrypted payload is not valid standard base64.
    #[error("base64 decode error: {0}")]
    Base64(String),
}

/// Errors from building a signed parameter set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// Nothing to sign.
    #[error("cannot sign an empty parameter set")]
    EmptyParams,

    /// The caller supplied the signature field as an input parameter.
    #[error("parameter set already contains the `{0}` field")]
    ReservedField(&'static str),
}
