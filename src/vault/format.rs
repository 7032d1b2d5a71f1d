//! YAML vault file format.
//!
//! A vault file is a single YAML mapping from entry name to entry record:
//!
//! ```text
//! github:
//!   username: alice
//!   password: <base64(iv || ciphertext || tag)>
//!   secure_note: <base64(iv || ciphertext || tag)>
//! ```
//!
//! Unset fields are omitted on write.  On read, an empty string is the
//! same as an absent field, which keeps files written by older tools
//! (`password: ""`) loadable.

use std::collections::BTreeMap;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use super::entry::Entry;
use crate::errors::{Result, VaultError};

/// In-memory entry mapping.  Sorted so the file diffs cleanly.
pub type Entries = BTreeMap<String, Entry>;

/// Decode the contents of the vault file at `path`.
///
/// Blank files decode to an empty mapping.
pub fn decode(path: &Path, text: &str) -> Result<Entries> {
    if text.trim().is_empty() {
        return Ok(Entries::new());
    }

    serde_yaml::from_str(text).map_err(|e| VaultError::StoreCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Encode the full mapping as YAML.
pub fn encode(entries: &Entries) -> Result<String> {
    serde_yaml::to_string(entries)
        .map_err(|e| VaultError::Serialization(format!("vault entries: {e}")))
}

// ---------------------------------------------------------------------------
// Serde helpers for optional fields
// ---------------------------------------------------------------------------

pub(crate) fn optional_base64_encode<S>(
    data: &Option<Vec<u8>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match data {
        Some(bytes) => serializer.serialize_str(&BASE64.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn optional_base64_decode<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<u8>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.is_empty() => BASE64
            .decode(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

pub(crate) fn non_empty_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
