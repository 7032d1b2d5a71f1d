//! The symmetric key file.
//!
//! The key file holds exactly 32 random bytes and is used directly as the
//! AES-256 key for every encrypted field in the vault.

use std::fs;
use std::path::Path;

use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::Zeroize;

use super::encryption::KEY_LEN;
use crate::errors::{Result, VaultError};
use crate::fsio;

/// A 32-byte symmetric key that wipes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_LEN],
}

impl SymmetricKey {
    /// Create a key from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Draw a fresh key from the OS random source.
    ///
    /// Entropy failures are surfaced, never retried.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| VaultError::KeyGeneration(format!("OS random source failed: {e}")))?;
        let key = Self::new(bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// Build a key from a slice, checking its length.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = data.try_into().map_err(|_| VaultError::KeyInvalid {
            expected: KEY_LEN,
            actual: data.len(),
        })?;
        Ok(Self::new(bytes))
    }

    /// Access the raw key bytes (to hand to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// Load the symmetric key from `path` and validate its length.
pub fn load_key(path: &Path) -> Result<SymmetricKey> {
    if !path.exists() {
        return Err(VaultError::KeyNotFound(path.to_path_buf()));
    }

    let mut data = fs::read(path)?;
    let key = SymmetricKey::from_slice(&data);
    data.zeroize();
    key
}

/// Write `key` to `path` atomically with owner-only permissions.
pub fn write_key(path: &Path, key: &SymmetricKey) -> Result<()> {
    fsio::write_atomic(path, key.as_bytes(), fsio::MODE_PRIVATE)?;
    Ok(())
}

/// Generate a new symmetric key file at `path`.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn generate_key_file(path: &Path, overwrite: bool) -> Result<SymmetricKey> {
    if path.exists() && !overwrite {
        return Err(VaultError::KeyExists(path.to_path_buf()));
    }

    let key = SymmetricKey::generate()?;
    write_key(path, &key)
        .map_err(|e| VaultError::KeyGeneration(format!("failed to write key file: {e}")))?;

    tracing::info!(path = %path.display(), "generated symmetric key");
    Ok(key)
}
