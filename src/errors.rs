use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in cryptorious.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Store errors ---
    #[error("Vault file {path} is corrupt: {reason}")]
    StoreCorrupt { path: PathBuf, reason: String },

    #[error("Failed to write vault file {path}: {source}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Entry errors ---
    #[error("Entry '{0}' already exists in the vault, will not overwrite")]
    DuplicateEntry(String),

    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    #[error("Invalid entry name: {0}")]
    InvalidEntryName(String),

    // --- Cipher errors ---
    #[error("Invalid key: expected {expected} bytes, got {actual}")]
    KeyInvalid { expected: usize, actual: usize },

    #[error("Ciphertext too short: {len} bytes, need at least {min}")]
    CiphertextTooShort { len: usize, min: usize },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    // --- Key lifecycle errors ---
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Key file already exists at {0} (use --force to overwrite)")]
    KeyExists(PathBuf),

    #[error("Key file not found at {0}")]
    KeyNotFound(PathBuf),

    #[error("Bad key data in {path}: {reason}")]
    KeyFormat { path: PathBuf, reason: String },

    #[error("Public key does not belong to the private key")]
    KeyMismatch,

    #[error("Rotation failed on entry '{entry}' ({field}): {source}")]
    RotationFailed {
        entry: String,
        field: &'static str,
        #[source]
        source: Box<VaultError>,
    },

    #[error("Vault was re-keyed but installing new key material failed; new key left at {staged}: {source}")]
    KeyInstall {
        staged: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for cryptorious results.
pub type Result<T> = std::result::Result<T, VaultError>;
