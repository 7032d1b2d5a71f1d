//! Re-keying every encrypted field of a vault.

use zeroize::Zeroizing;

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::keyfile::SymmetricKey;
use crate::errors::{Result, VaultError};
use crate::vault::format::Entries;
use crate::vault::{Entry, Vault};

/// Decrypt every field of `vault` with `old` and re-encrypt it with `new`.
///
/// Works entirely in memory and returns a new `Vault` bound to the same
/// file.  The first field that fails aborts the whole pass with
/// `RotationFailed`; `vault` itself is never modified.
pub fn rotate(vault: &Vault, old: &SymmetricKey, new: &SymmetricKey) -> Result<Vault> {
    let mut rekeyed = Entries::new();

    for (name, entry) in vault.entries() {
        let password = rekey_field(name, "password", entry.password.as_deref(), old, new)?;
        let secure_note =
            rekey_field(name, "secure_note", entry.secure_note.as_deref(), old, new)?;

        rekeyed.insert(
            name.to_string(),
            Entry {
                username: entry.username.clone(),
                password,
                secure_note,
            },
        );
    }

    tracing::debug!(entries = rekeyed.len(), "re-keyed vault in memory");
    Ok(vault.with_entries(rekeyed))
}

fn rekey_field(
    entry: &str,
    field: &'static str,
    ciphertext: Option<&[u8]>,
    old: &SymmetricKey,
    new: &SymmetricKey,
) -> Result<Option<Vec<u8>>> {
    let Some(ciphertext) = ciphertext else {
        return Ok(None);
    };

    let failed = |source: VaultError| VaultError::RotationFailed {
        entry: entry.to_string(),
        field,
        source: Box::new(source),
    };

    let plaintext = Zeroizing::new(decrypt(old.as_bytes(), ciphertext).map_err(failed)?);
    let reencrypted = encrypt(new.as_bytes(), &plaintext).map_err(failed)?;
    Ok(Some(reencrypted))
}
