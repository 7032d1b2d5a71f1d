//! Integration tests for vault storage and entry operations.

use std::fs;

use cryptorious::config::VaultPaths;
use cryptorious::crypto::generate_key_file;
use cryptorious::errors::VaultError;
use cryptorious::vault::{
    add_entry, delete_entry, list_entries, reveal_entry, NewEntry, Vault,
};
use tempfile::TempDir;

/// Helper: a fresh directory with a vault key but no vault file yet.
fn setup() -> (TempDir, VaultPaths) {
    let dir = TempDir::new().expect("create temp dir");
    let paths = VaultPaths::in_dir(dir.path());
    generate_key_file(&paths.key, false).expect("generate key");
    (dir, paths)
}

fn add(paths: &VaultPaths, name: &str, password: &str) {
    add_entry(
        paths,
        name,
        &NewEntry {
            username: Some("user"),
            password: Some(password),
            secure_note: None,
        },
    )
    .expect("add entry");
}

fn password_of(paths: &VaultPaths, name: &str) -> String {
    reveal_entry(paths, name)
        .expect("reveal entry")
        .password
        .expect("entry has a password")
        .to_string()
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[test]
fn missing_vault_reads_as_empty() {
    let (_dir, paths) = setup();

    assert!(list_entries(&paths).unwrap().is_empty());
    assert!(Vault::load(&paths.vault).unwrap().is_empty());
    assert!(
        !paths.vault.exists(),
        "reading must not create the vault file"
    );
}

#[test]
fn first_add_creates_the_vault_file() {
    let (_dir, paths) = setup();
    add(&paths, "github", "hunter2");

    assert!(paths.vault.exists());
    assert_eq!(Vault::load(&paths.vault).unwrap().len(), 1);
    assert_eq!(password_of(&paths, "github"), "hunter2");
}

#[test]
fn blank_vault_file_is_empty() {
    let (_dir, paths) = setup();
    fs::write(&paths.vault, "\n").unwrap();

    assert!(list_entries(&paths).unwrap().is_empty());
}

#[test]
fn garbage_vault_file_is_corrupt() {
    let (_dir, paths) = setup();
    fs::write(&paths.vault, "- just\n- a list\n").unwrap();

    let err = list_entries(&paths).unwrap_err();
    assert!(matches!(err, VaultError::StoreCorrupt { .. }));
}

// ---------------------------------------------------------------------------
// No silent overwrite
// ---------------------------------------------------------------------------

#[test]
fn duplicate_add_is_rejected_and_changes_nothing() {
    let (_dir, paths) = setup();
    add(&paths, "github", "original");
    let before = fs::read(&paths.vault).unwrap();

    let err = add_entry(
        &paths,
        "github",
        &NewEntry {
            username: Some("mallory"),
            password: Some("replacement"),
            secure_note: None,
        },
    )
    .unwrap_err();

    assert!(matches!(err, VaultError::DuplicateEntry(ref n) if n == "github"));
    assert_eq!(fs::read(&paths.vault).unwrap(), before);
    assert_eq!(password_of(&paths, "github"), "original");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_exactly_one_entry() {
    let (_dir, paths) = setup();
    add(&paths, "alpha", "a-pass");
    add(&paths, "bravo", "b-pass");
    add(&paths, "charlie", "c-pass");

    let before = Vault::load(&paths.vault).unwrap();
    delete_entry(&paths, "bravo").unwrap();
    let after = Vault::load(&paths.vault).unwrap();

    assert_eq!(after.len(), 2);
    assert!(!after.contains("bravo"));

    // Untouched entries keep their exact ciphertext.
    for name in ["alpha", "charlie"] {
        assert_eq!(before.get(name).unwrap(), after.get(name).unwrap());
    }
    assert_eq!(password_of(&paths, "alpha"), "a-pass");
    assert_eq!(password_of(&paths, "charlie"), "c-pass");
}

#[test]
fn delete_missing_entry_fails_without_writing() {
    let (_dir, paths) = setup();
    add(&paths, "alpha", "a-pass");
    let before = fs::read(&paths.vault).unwrap();

    let err = delete_entry(&paths, "zulu").unwrap_err();
    assert!(matches!(err, VaultError::EntryNotFound(ref n) if n == "zulu"));
    assert_eq!(fs::read(&paths.vault).unwrap(), before);
}

#[test]
fn deleted_name_can_be_reused() {
    let (_dir, paths) = setup();
    add(&paths, "alpha", "first");
    delete_entry(&paths, "alpha").unwrap();
    add(&paths, "alpha", "second");

    assert_eq!(password_of(&paths, "alpha"), "second");
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[test]
fn list_is_sorted_and_reports_fields() {
    let (_dir, paths) = setup();
    add(&paths, "zeta", "z");
    add_entry(
        &paths,
        "alpha",
        &NewEntry {
            username: None,
            password: None,
            secure_note: Some("wifi: hunter2"),
        },
    )
    .unwrap();

    let entries = list_entries(&paths).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["alpha", "zeta"]);

    assert!(!entries[0].has_password);
    assert!(entries[0].has_secure_note);
    assert_eq!(entries[1].username.as_deref(), Some("user"));
}

#[test]
fn reveal_with_wrong_key_fails() {
    let (_dir, paths) = setup();
    add(&paths, "alpha", "a-pass");

    generate_key_file(&paths.key, true).unwrap();

    let err = reveal_entry(&paths, "alpha").unwrap_err();
    assert!(matches!(err, VaultError::DecryptionFailed));
}
