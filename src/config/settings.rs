use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::keys::pair::{KeyAlgorithm, DEFAULT_RSA_BITS};

/// Project-level configuration, loaded from `.cryptorious.toml`.
///
/// Every field has a sensible default so cryptorious works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the project root) holding the vault and keys.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Vault file name inside `vault_dir` (or an absolute path).
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Symmetric key file name.
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// Private key file name.
    #[serde(default = "default_private_key_file")]
    pub private_key_file: String,

    /// Public key file name.
    #[serde(default = "default_public_key_file")]
    pub public_key_file: String,

    /// RSA modulus size for newly generated key pairs.
    #[serde(default = "default_rsa_bits")]
    pub rsa_bits: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".cryptorious".to_string()
}

fn default_vault_file() -> String {
    "vault.yaml".to_string()
}

fn default_key_file() -> String {
    "vault.key".to_string()
}

fn default_private_key_file() -> String {
    "cryptorious_privatekey".to_string()
}

fn default_public_key_file() -> String {
    "cryptorious_publickey.pem".to_string()
}

fn default_rsa_bits() -> usize {
    DEFAULT_RSA_BITS
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            vault_file: default_vault_file(),
            key_file: default_key_file(),
            private_key_file: default_private_key_file(),
            public_key_file: default_public_key_file(),
            rsa_bits: default_rsa_bits(),
        }
    }
}

/// Every file an engine operation touches.
///
/// Resolved once per invocation and passed explicitly into each
/// operation; nothing reads paths from process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub vault: PathBuf,
    pub key: PathBuf,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl VaultPaths {
    /// Lay out all files under a single directory with default names.
    pub fn in_dir(dir: &Path) -> Self {
        Settings::default().resolve(dir, "")
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".cryptorious.toml";

    /// Load settings from `<project_dir>/.cryptorious.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve every file path against `project_dir`.
    ///
    /// File names are joined onto `vault_dir`; absolute names stay as-is.
    pub fn paths(&self, project_dir: &Path) -> VaultPaths {
        self.resolve(project_dir, &self.vault_dir)
    }

    fn resolve(&self, project_dir: &Path, vault_dir: &str) -> VaultPaths {
        let dir = project_dir.join(vault_dir);
        VaultPaths {
            vault: dir.join(&self.vault_file),
            key: dir.join(&self.key_file),
            private_key: dir.join(&self.private_key_file),
            public_key: dir.join(&self.public_key_file),
        }
    }

    /// The algorithm used for new key pairs.
    pub fn key_algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Rsa {
            bits: self.rsa_bits,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
