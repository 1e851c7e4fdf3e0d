// SPDX-License-Identifier: BUSL-1.1
//! # idrelay-crypto: Cryptographic Primitives for the Decode Relay
//!
//! Everything the relay needs to talk to the remote decoding service:
//!
//! - [`factor`]: per-request 8-character encrypt factor, drawn from the OS
//!   CSPRNG.
//! - [`sign`]: canonical parameter serialization and the uppercase MD5
//!   request signature.
//! - [`cipher`]: DES-CBC decryption of the `info` payload with checked
//!   PKCS#5 padding removal (plus the matching encryption, used by the stub
//!   service and tests).
//!
//! ## Request Lifecycle
//!
//! ```text
//! EncryptFactor::generate() ──► SignedRequest::sign(params, secret)
//!            │                              │
//!            │                        (remote call)
//!            ▼                              ▼
//!   decrypt_info(info_b64, &factor) ◄── envelope.data.info
//! ```
//!
//! The factor is both the DES key and the CBC IV, so the same value must be
//! carried from signing through decryption within one request.

pub mod cipher;
pub mod error;
pub mod factor;
pub mod sign;

pub use cipher::{
    decrypt_des_cbc, decrypt_info, encrypt_des_cbc, encrypt_info, strip_pkcs5, BLOCK_SIZE,
};
pub use error::{CipherError, SignError};
pub use factor::{random_token, EncryptFactor, FACTOR_LEN};
pub use sign::{compute_sign, pre_sign_string, SignedRequest, SIGN_FIELD};
