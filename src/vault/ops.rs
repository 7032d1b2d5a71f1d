//! Vault entry operations: add, reveal, delete, list, rotate.
//!
//! Each operation loads the current vault, does one thing, and (for the
//! mutating ones) persists the whole vault again.  All file locations come
//! from the `VaultPaths` passed in.

use tracing::{debug, info};
use zeroize::{Zeroize, Zeroizing};

use super::entry::{Entry, EntrySummary, NewEntry};
use super::store::{self, validate_entry_name, Vault};
use crate::config::VaultPaths;
use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::keyfile::{load_key, SymmetricKey};
use crate::errors::{Result, VaultError};
use crate::fsio;
use crate::keys::pair::{KeyAlgorithm, KeyPair};
use crate::keys::rotation;
use crate::keys::staging::{StageItem, StagedFiles};

/// Plaintext view of one entry, wiped from memory on drop.
#[derive(Debug)]
pub struct RevealedEntry {
    pub name: String,
    pub username: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub secure_note: Option<Zeroizing<String>>,
}

/// Outcome of a successful `rotate_all`.
#[derive(Debug, Clone)]
pub struct RotationReport {
    /// Number of entries re-encrypted.
    pub entries: usize,
    /// Algorithm of the newly installed key pair.
    pub algorithm: KeyAlgorithm,
    /// Fingerprint of the newly installed public key.
    pub fingerprint: String,
}

/// Add a new entry, encrypting its password and secure note.
///
/// Never overwrites: an existing name fails with `DuplicateEntry` and the
/// vault file is not touched.
pub fn add_entry(paths: &VaultPaths, name: &str, new: &NewEntry<'_>) -> Result<()> {
    validate_entry_name(name)?;

    let mut vault = Vault::load(&paths.vault)?;
    if vault.contains(name) {
        return Err(VaultError::DuplicateEntry(name.to_string()));
    }

    let key = load_key(&paths.key)?;
    debug!(key = %paths.key.display(), "using symmetric key");

    let entry = Entry {
        username: new.username.filter(|u| !u.is_empty()).map(str::to_string),
        password: encrypt_field(&key, new.password)?,
        secure_note: encrypt_field(&key, new.secure_note)?,
    };

    vault.insert_new(name, entry)?;
    vault.persist()?;

    info!(entry = name, path = %paths.vault.display(), "added entry to vault");
    Ok(())
}

/// Decrypt and return every field of `name`.  Read-only.
pub fn reveal_entry(paths: &VaultPaths, name: &str) -> Result<RevealedEntry> {
    let vault = Vault::load(&paths.vault)?;
    let entry = vault.get(name)?;

    let key = load_key(&paths.key)?;
    let revealed = RevealedEntry {
        name: name.to_string(),
        username: entry.username.clone(),
        password: decrypt_field(&key, entry.password.as_deref())?,
        secure_note: decrypt_field(&key, entry.secure_note.as_deref())?,
    };

    debug!(entry = name, "decrypted entry");
    Ok(revealed)
}

/// Remove `name` from the vault.
pub fn delete_entry(paths: &VaultPaths, name: &str) -> Result<()> {
    store::delete(&paths.vault, name)
}

/// Names and field presence of every entry, sorted by name.
///
/// Needs no key material.
pub fn list_entries(paths: &VaultPaths) -> Result<Vec<EntrySummary>> {
    Ok(Vault::load(&paths.vault)?.summaries())
}

/// Replace all key material and re-encrypt every entry under it.
///
/// The current key pair must load and match before anything happens.
/// The new symmetric key and key pair are staged beside the active files,
/// the re-keyed vault is persisted, and only then are the staged keys
/// renamed over the old ones.  Any failure before the vault write leaves
/// the vault file and all key files exactly as they were.
pub fn rotate_all(
    paths: &VaultPaths,
    algorithm: KeyAlgorithm,
    label: &str,
) -> Result<RotationReport> {
    algorithm.validate()?;

    let old_key = load_key(&paths.key)?;
    let current = KeyPair::load(&paths.private_key, &paths.public_key)?;
    debug!(algorithm = %current.algorithm(), "current key pair verified");

    let vault = Vault::load(&paths.vault)?;

    let new_key = SymmetricKey::generate()?;
    let new_pair = KeyPair::generate(algorithm)?;
    let encoded = new_pair.encode()?;
    let fingerprint = new_pair.public_key().fingerprint()?;

    let rotated = rotation::rotate(&vault, &old_key, &new_key)?;

    // Staged before the vault write so the new key survives a crash
    // between persisting the vault and installing the keys.
    let staged = StagedFiles::stage(
        &[
            StageItem {
                target: &paths.key,
                contents: new_key.as_bytes(),
                mode: fsio::MODE_PRIVATE,
            },
            StageItem {
                target: &paths.private_key,
                contents: encoded.private_pem.as_bytes(),
                mode: fsio::MODE_PRIVATE,
            },
            StageItem {
                target: &paths.public_key,
                contents: encoded.public_pem.as_bytes(),
                mode: fsio::MODE_PUBLIC,
            },
        ],
        "rotating",
    )
    .map_err(|e| VaultError::KeyGeneration(format!("failed to stage new key files: {e}")))?;

    // Dropping `staged` on error removes the staged files again.
    rotated.persist()?;

    staged.install().map_err(|err| VaultError::KeyInstall {
        staged: err.staged,
        source: err.source,
    })?;

    info!(
        user = label,
        entries = rotated.len(),
        algorithm = %algorithm,
        "rotated vault keys"
    );

    Ok(RotationReport {
        entries: rotated.len(),
        algorithm,
        fingerprint,
    })
}

fn encrypt_field(key: &SymmetricKey, value: Option<&str>) -> Result<Option<Vec<u8>>> {
    match value {
        Some(v) if !v.is_empty() => encrypt(key.as_bytes(), v.as_bytes()).map(Some),
        _ => Ok(None),
    }
}

fn decrypt_field(
    key: &SymmetricKey,
    ciphertext: Option<&[u8]>,
) -> Result<Option<Zeroizing<String>>> {
    let Some(ciphertext) = ciphertext else {
        return Ok(None);
    };

    let plaintext = decrypt(key.as_bytes(), ciphertext)?;

    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext)
        .map(|s| Some(Zeroizing::new(s)))
        .map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::DecryptionFailed
        })
}
