//! The vault repository.
//!
//! A `Vault` is the whole entry mapping plus the file it is bound to.
//! `Vault::load` is the only way to get one: every mutation starts from
//! the current file contents and ends with `persist`, which rewrites the
//! whole file atomically.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::entry::{Entry, EntrySummary};
use super::format::{self, Entries};
use crate::errors::{Result, VaultError};
use crate::fsio;

/// Longest entry name accepted, in bytes.
const MAX_NAME_LEN: usize = 256;

/// The in-memory vault, loaded from and persisted to one file.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// Entry name -> stored entry.
    entries: Entries,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Load the vault at `path`.
    ///
    /// A missing file is not an error: the vault starts empty and the file
    /// is created on the first `persist`.  A file that exists but does not
    /// decode fails with `StoreCorrupt` and is left alone.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "vault file not found, will create a new one");
                return Ok(Self {
                    path: path.to_path_buf(),
                    entries: Entries::new(),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(VaultError::StoreCorrupt {
                    path: path.to_path_buf(),
                    reason: "file is not valid UTF-8".into(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let entries = format::decode(path, &text)?;
        debug!(path = %path.display(), entries = entries.len(), "loaded vault");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Derive a vault bound to the same file with a replacement mapping.
    ///
    /// Used by rotation, which builds the re-keyed mapping off to the side.
    pub(crate) fn with_entries(&self, entries: Entries) -> Self {
        Self {
            path: self.path.clone(),
            entries,
        }
    }

    // ------------------------------------------------------------------
    // Entry access
    // ------------------------------------------------------------------

    /// Look up an entry by exact name.
    pub fn get(&self, name: &str) -> Result<&Entry> {
        self.entries
            .get(name)
            .ok_or_else(|| VaultError::EntryNotFound(name.to_string()))
    }

    /// Insert an entry under a name that must not exist yet.
    pub fn insert_new(&mut self, name: &str, entry: Entry) -> Result<()> {
        validate_entry_name(name)?;
        if self.entries.contains_key(name) {
            return Err(VaultError::DuplicateEntry(name.to_string()));
        }
        self.entries.insert(name.to_string(), entry);
        Ok(())
    }

    /// Remove an entry, returning what was stored.
    pub fn remove(&mut self, name: &str) -> Result<Entry> {
        self.entries
            .remove(name)
            .ok_or_else(|| VaultError::EntryNotFound(name.to_string()))
    }

    /// Returns `true` if an entry with exactly this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Summaries of every entry, sorted by name.
    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.entries
            .iter()
            .map(|(name, entry)| EntrySummary::new(name, entry))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the path of the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize every entry and replace the vault file atomically.
    ///
    /// On failure the previous file is left as it was.
    pub fn persist(&self) -> Result<()> {
        let yaml = format::encode(&self.entries)?;

        let existed = self.path.exists();
        fsio::write_atomic(&self.path, yaml.as_bytes(), fsio::MODE_PRIVATE).map_err(|source| {
            VaultError::StoreWrite {
                path: self.path.clone(),
                source,
            }
        })?;

        if !existed {
            info!(path = %self.path.display(), "created new vault file");
        }
        debug!(path = %self.path.display(), entries = self.entries.len(), "persisted vault");
        Ok(())
    }
}

/// Remove `name` from the vault at `path` and persist the result.
///
/// Fails with `EntryNotFound` without writing anything if the name is absent.
pub fn delete(path: &Path, name: &str) -> Result<()> {
    let mut vault = Vault::load(path)?;
    vault.remove(name)?;
    vault.persist()?;

    info!(entry = name, "removed entry from vault");
    Ok(())
}

/// Validate that an entry name is usable.
///
/// Names are compared exactly (case-sensitive).  They must be non-empty,
/// at most 256 bytes, and free of control characters.
pub fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::InvalidEntryName(
            "entry name cannot be empty".into(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(VaultError::InvalidEntryName(format!(
            "entry name cannot exceed {MAX_NAME_LEN} bytes"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(VaultError::InvalidEntryName(format!(
            "entry name {name:?} contains control characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(user: &str) -> Entry {
        Entry {
            username: Some(user.to_string()),
            password: Some(vec![9; 40]),
            secure_note: None,
        }
    }

    #[test]
    fn load_missing_file_gives_empty_vault() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.yaml");

        let vault = Vault::load(&path).unwrap();
        assert!(vault.is_empty());
        assert_eq!(vault.path(), path);
        assert!(!path.exists(), "load must not create the file");
    }

    #[test]
    fn persist_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.yaml");

        let mut vault = Vault::load(&path).unwrap();
        vault.insert_new("github", entry("alice")).unwrap();
        vault.insert_new("mail", entry("bob")).unwrap();
        vault.persist().unwrap();

        let reloaded = Vault::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("github").unwrap(), &entry("alice"));
        assert_eq!(reloaded.get("mail").unwrap(), &entry("bob"));
    }

    #[test]
    fn insert_new_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let mut vault = Vault::load(&dir.path().join("v.yaml")).unwrap();

        vault.insert_new("x", entry("first")).unwrap();
        let err = vault.insert_new("x", entry("second")).unwrap_err();

        assert!(matches!(err, VaultError::DuplicateEntry(ref n) if n == "x"));
        assert_eq!(vault.get("x").unwrap(), &entry("first"));
    }

    #[test]
    fn corrupt_file_is_reported_and_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.yaml");
        fs::write(&path, "this: [is not: valid").unwrap();

        let err = Vault::load(&path).unwrap_err();
        assert!(matches!(err, VaultError::StoreCorrupt { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "this: [is not: valid");
    }

    #[test]
    fn delete_removes_only_named_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.yaml");

        let mut vault = Vault::load(&path).unwrap();
        vault.insert_new("a", entry("alice")).unwrap();
        vault.insert_new("b", entry("bob")).unwrap();
        vault.persist().unwrap();

        delete(&path, "a").unwrap();

        let reloaded = Vault::load(&path).unwrap();
        assert!(!reloaded.contains("a"));
        assert_eq!(reloaded.get("b").unwrap(), &entry("bob"));
    }

    #[test]
    fn delete_missing_entry_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.yaml");

        let err = delete(&path, "ghost").unwrap_err();
        assert!(matches!(err, VaultError::EntryNotFound(_)));
        assert!(!path.exists());
    }

    #[test]
    fn persist_to_unwritable_location_fails_with_store_write() {
        let dir = TempDir::new().unwrap();
        // A regular file where a directory is expected.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut vault = Vault {
            path: blocker.join("vault.yaml"),
            entries: Entries::new(),
        };
        vault.insert_new("a", entry("alice")).unwrap();

        let err = vault.persist().unwrap_err();
        assert!(matches!(err, VaultError::StoreWrite { .. }));
    }

    #[test]
    fn entry_name_validation() {
        assert!(validate_entry_name("GitHub Work").is_ok());
        assert!(validate_entry_name("bank/savings").is_ok());
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("tab\there").is_err());
        assert!(validate_entry_name(&"n".repeat(257)).is_err());
    }
}
