//! Integration tests for the field cipher and the vault key file.

use std::fs;

use cryptorious::crypto::encryption::{IV_LEN, KEY_LEN, TAG_LEN};
use cryptorious::crypto::{decrypt, encrypt, generate_key_file, load_key, SymmetricKey};
use cryptorious::errors::VaultError;
use tempfile::TempDir;

fn test_key() -> SymmetricKey {
    SymmetricKey::generate().expect("generate key")
}

// ---------------------------------------------------------------------------
// Field cipher
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = test_key();
    let plaintext = b"correct horse battery staple";

    let ciphertext = encrypt(key.as_bytes(), plaintext).unwrap();
    assert_eq!(ciphertext.len(), IV_LEN + plaintext.len() + TAG_LEN);

    let decrypted = decrypt(key.as_bytes(), &ciphertext).unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn every_encryption_uses_a_fresh_iv() {
    let key = test_key();

    let a = encrypt(key.as_bytes(), b"same input").unwrap();
    let b = encrypt(key.as_bytes(), b"same input").unwrap();

    assert_ne!(a[..IV_LEN], b[..IV_LEN]);
    assert_ne!(a, b);
}

#[test]
fn empty_plaintext_roundtrips() {
    let key = test_key();
    let ciphertext = encrypt(key.as_bytes(), b"").unwrap();
    assert_eq!(ciphertext.len(), IV_LEN + TAG_LEN);
    assert!(decrypt(key.as_bytes(), &ciphertext).unwrap().is_empty());
}

#[test]
fn decrypt_with_other_key_fails() {
    let ciphertext = encrypt(test_key().as_bytes(), b"secret").unwrap();
    let err = decrypt(test_key().as_bytes(), &ciphertext).unwrap_err();
    assert!(matches!(err, VaultError::DecryptionFailed));
}

#[test]
fn flipped_bit_is_detected() {
    let key = test_key();
    let mut ciphertext = encrypt(key.as_bytes(), b"secret").unwrap();
    ciphertext[IV_LEN] ^= 0x01;

    let err = decrypt(key.as_bytes(), &ciphertext).unwrap_err();
    assert!(matches!(err, VaultError::DecryptionFailed));
}

#[test]
fn truncated_ciphertext_is_rejected() {
    let key = test_key();
    let err = decrypt(key.as_bytes(), &[0u8; IV_LEN + TAG_LEN - 1]).unwrap_err();
    assert!(matches!(err, VaultError::CiphertextTooShort { .. }));
}

#[test]
fn wrong_key_length_is_rejected() {
    let err = encrypt(&[7u8; KEY_LEN - 1], b"x").unwrap_err();
    assert!(matches!(
        err,
        VaultError::KeyInvalid {
            expected: KEY_LEN,
            actual: 31
        }
    ));
}

// ---------------------------------------------------------------------------
// Key file
// ---------------------------------------------------------------------------

#[test]
fn generated_key_file_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keys").join("vault.key");

    let generated = generate_key_file(&path, false).unwrap();
    let loaded = load_key(&path).unwrap();
    assert_eq!(generated.as_bytes(), loaded.as_bytes());
    assert_eq!(fs::read(&path).unwrap().len(), KEY_LEN);
}

#[test]
fn key_file_is_never_replaced_without_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.key");

    generate_key_file(&path, false).unwrap();
    let before = fs::read(&path).unwrap();

    let err = generate_key_file(&path, false).unwrap_err();
    assert!(matches!(err, VaultError::KeyExists(_)));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn short_key_file_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.key");
    fs::write(&path, [1u8; 16]).unwrap();

    let err = load_key(&path).unwrap_err();
    assert!(matches!(err, VaultError::KeyInvalid { actual: 16, .. }));
}

#[test]
fn missing_key_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_key(&dir.path().join("absent.key")).unwrap_err();
    assert!(matches!(err, VaultError::KeyNotFound(_)));
}

#[cfg(unix)]
#[test]
fn key_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.key");
    generate_key_file(&path, false).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
