//! Vault module — field-encrypted entry storage.
//!
//! This module provides:
//! - `Entry` and related record types (`entry`)
//! - The YAML vault file format (`format`)
//! - The `Vault` repository: load, mutate, persist (`store`)
//! - The entry operations used by CLI commands (`ops`)

pub mod entry;
pub mod format;
pub mod ops;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{Entry, EntrySummary, NewEntry};
pub use ops::{
    add_entry, delete_entry, list_entries, reveal_entry, rotate_all, RevealedEntry, RotationReport,
};
pub use store::Vault;
