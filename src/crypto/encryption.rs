//! Field-level AES-256 encryption.
//!
//! Each call to `encrypt` draws a fresh random 16-byte IV (one AES block)
//! and prepends it to the output.  The payload is AES-256 in GCM mode, a
//! counter-mode stream cipher, so values of any length need no padding,
//! and the appended tag lets `decrypt` tell a wrong key or a damaged
//! ciphertext apart from a valid one.
//!
//! Layout of the returned byte buffer:
//!   [ 16-byte IV | ciphertext (same length as plaintext) | 16-byte tag ]

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};

use crate::errors::{Result, VaultError};

/// AES-256-GCM with a full-block IV instead of the usual 96-bit nonce.
type FieldCipher = AesGcm<Aes256, U16>;

/// Required symmetric key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// IV length in bytes: one AES block.
pub const IV_LEN: usize = 16;

/// Authentication tag length appended by GCM.
pub const TAG_LEN: usize = 16;

/// Build the cipher from raw key bytes, rejecting keys of the wrong size.
fn cipher_for(key: &[u8]) -> Result<FieldCipher> {
    if key.len() != KEY_LEN {
        return Err(VaultError::KeyInvalid {
            expected: KEY_LEN,
            actual: key.len(),
        });
    }
    FieldCipher::new_from_slice(key).map_err(|_| VaultError::KeyInvalid {
        expected: KEY_LEN,
        actual: key.len(),
    })
}

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the IV prepended to the ciphertext (iv || ciphertext || tag).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher_for(key)?;

    let iv = FieldCipher::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&iv, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(IV_LEN + ciphertext.len());
    output.extend_from_slice(&iv);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Expects the first 16 bytes to be the IV, followed by ciphertext and tag.
pub fn decrypt(key: &[u8], ciphertext_with_iv: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher_for(key)?;

    let min = IV_LEN + TAG_LEN;
    if ciphertext_with_iv.len() < min {
        return Err(VaultError::CiphertextTooShort {
            len: ciphertext_with_iv.len(),
            min,
        });
    }

    let (iv_bytes, ciphertext) = ciphertext_with_iv.split_at(IV_LEN);
    let iv = Nonce::<U16>::from_slice(iv_bytes);

    cipher
        .decrypt(iv, ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}
