//! The `Entry` record stored under each name in the vault.
//!
//! `username` is kept as plaintext.  `password` and `secure_note` only
//! ever hold ciphertext (iv || ciphertext || tag), serialized as base64
//! strings so the YAML file stays printable.

use serde::{Deserialize, Serialize};

use super::format::{non_empty_string, optional_base64_decode, optional_base64_encode};

/// A single vault entry as it sits on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty_string"
    )]
    pub username: Option<String>,

    /// Encrypted password bytes, if set.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_base64_encode",
        deserialize_with = "optional_base64_decode"
    )]
    pub password: Option<Vec<u8>>,

    /// Encrypted secure note bytes, if set.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_base64_encode",
        deserialize_with = "optional_base64_decode"
    )]
    pub secure_note: Option<Vec<u8>>,
}

/// The plaintext fields of an entry, before encryption.
#[derive(Debug, Clone, Default)]
pub struct NewEntry<'a> {
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub secure_note: Option<&'a str>,
}

/// What `list` shows about an entry: no ciphertext, no key needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub name: String,
    pub username: Option<String>,
    pub has_password: bool,
    pub has_secure_note: bool,
}

impl EntrySummary {
    pub fn new(name: &str, entry: &Entry) -> Self {
        Self {
            name: name.to_string(),
            username: entry.username.clone(),
            has_password: entry.password.is_some(),
            has_secure_note: entry.secure_note.is_some(),
        }
    }
}
