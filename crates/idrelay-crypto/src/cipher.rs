// SPDX-License-Identifier: BUSL-1.1
//! # DES-CBC Payload Cipher
//!
//! The decoding service returns identity data as
//! `base64(DES-CBC(key = factor, iv = factor, PKCS#5(plaintext)))`.
//!
//! ## Padding
//!
//! Removal reads the final byte `K` and drops `K` bytes. `K` must lie in
//! `1..=8` and must not exceed the buffer; anything else is
//! [`CipherError::InvalidPadding`] rather than a silently short or
//! out-of-range slice. The pad bytes before the final one are not
//! inspected.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::CipherError;
use crate::factor::EncryptFactor;

/// DES block size in bytes. Also the required key and IV length.
pub const BLOCK_SIZE: usize = 8;

type DesCbcDec = cbc::Decryptor<des::Des>;
type DesCbcEnc = cbc::Encryptor<des::Des>;

/// Remove PKCS#5 padding, validating the count in the final byte.
pub fn strip_pkcs5(buf: &[u8]) -> Result<&[u8], CipherError> {
    let Some(&last) = buf.last() else {
        return Err(CipherError::InvalidCiphertextLength(0));
    };
    let count = usize::from(last);
    if count == 0 || count > BLOCK_SIZE || count > buf.len() {
        return Err(CipherError::InvalidPadding(last));
    }
    Ok(&buf[..buf.len() - count])
}

/// Decrypt DES-CBC `ciphertext` using `key` as both key and IV, then strip
/// PKCS#5 padding.
pub fn decrypt_des_cbc(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    if key.len() != BLOCK_SIZE {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::InvalidCiphertextLength(ciphertext.len()));
    }

    let decryptor = DesCbcDec::new_from_slices(key, key)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    let mut plain = decryptor
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| CipherError::InvalidCiphertextLength(ciphertext.len()))?;

    let unpadded_len = strip_pkcs5(&plain)?.len();
    plain.truncate(unpadded_len);
    Ok(plain)
}

/// PKCS#5-pad and DES-CBC encrypt `plaintext` with `key` as key and IV.
pub fn encrypt_des_cbc(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    let encryptor = DesCbcEnc::new_from_slices(key, key)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decode and decrypt an `info` payload from the decoding service.
pub fn decrypt_info(info_b64: &str, factor: &EncryptFactor) -> Result<Vec<u8>, CipherError> {
    let ciphertext = STANDARD
        .decode(info_b64.trim())
        .map_err(|e| CipherError::Base64(e.to_string()))?;
    decrypt_des_cbc(&ciphertext, factor.as_bytes())
}

/// Produce an `info` payload: encrypt under `key`, then base64.
pub fn encrypt_info(plaintext: &[u8], key: &[u8]) -> Result<String, CipherError> {
    let ciphertext = encrypt_des_cbc(plaintext, key)?;
    Ok(STANDARD.encode(ciphertext))
}
