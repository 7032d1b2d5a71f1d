//! The asymmetric key pair.
//!
//! Key pairs are RSA, written as PKCS#8 (`PRIVATE KEY`) and SPKI
//! (`PUBLIC KEY`) PEM files.  PKCS#1 files (`RSA PRIVATE KEY`,
//! `RSA PUBLIC KEY`) are accepted when loading.  The algorithm is carried
//! as a tagged enum so callers never inspect key types at runtime.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding,
};
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::staging::{StageItem, StagedFiles};
use crate::errors::{Result, VaultError};
use crate::fsio;

/// Smallest RSA modulus accepted, in bits.
pub const MIN_RSA_BITS: usize = 2048;

/// RSA modulus used when nothing else is configured.
pub const DEFAULT_RSA_BITS: usize = 3072;

/// Supported key pair algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa { bits: usize },
}

impl KeyAlgorithm {
    /// Reject parameters below modern security margins.
    pub fn validate(self) -> Result<()> {
        match self {
            Self::Rsa { bits } if bits < MIN_RSA_BITS => Err(VaultError::KeyGeneration(format!(
                "RSA keys must be at least {MIN_RSA_BITS} bits (got {bits})"
            ))),
            Self::Rsa { .. } => Ok(()),
        }
    }
}

impl Default for KeyAlgorithm {
    fn default() -> Self {
        Self::Rsa {
            bits: DEFAULT_RSA_BITS,
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa { bits } => write!(f, "RSA-{bits}"),
        }
    }
}

/// A public key of one of the supported algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
}

impl PublicKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Rsa(key) => KeyAlgorithm::Rsa {
                bits: key.size() * 8,
            },
        }
    }

    /// Encode as SPKI PEM.
    pub fn to_pem(&self) -> Result<String> {
        match self {
            Self::Rsa(key) => key
                .to_public_key_pem(LineEnding::LF)
                .map_err(|e| VaultError::KeyGeneration(format!("public key encoding: {e}"))),
        }
    }

    /// Parse a PEM public key read from `path`.
    pub fn from_pem(path: &Path, pem: &str) -> Result<Self> {
        let bad = |reason: String| VaultError::KeyFormat {
            path: path.to_path_buf(),
            reason,
        };

        let parsed = match pem_label(pem) {
            Some("PUBLIC KEY") => RsaPublicKey::from_public_key_pem(pem).map_err(describe),
            Some("RSA PUBLIC KEY") => RsaPublicKey::from_pkcs1_pem(pem).map_err(describe),
            Some(other) => Err(format!("unknown key type {other:?}, want \"PUBLIC KEY\"")),
            None => Err("not PEM encoded".into()),
        };

        let key = Self::Rsa(parsed.map_err(bad)?);
        check_strength(path, key.algorithm())?;
        Ok(key)
    }

    /// SHA-256 over the DER encoding, base64.
    pub fn fingerprint(&self) -> Result<String> {
        let der = match self {
            Self::Rsa(key) => key
                .to_public_key_der()
                .map_err(|e| VaultError::KeyGeneration(format!("public key encoding: {e}")))?,
        };
        let digest = Sha256::digest(der.as_bytes());
        Ok(format!("SHA256:{}", BASE64.encode(digest)))
    }
}

/// A private key of one of the supported algorithms.
#[derive(Clone)]
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.algorithm())
    }
}

impl PrivateKey {
    /// Generate a fresh private key from the OS random source.
    pub fn generate(algorithm: KeyAlgorithm) -> Result<Self> {
        algorithm.validate()?;
        match algorithm {
            KeyAlgorithm::Rsa { bits } => RsaPrivateKey::new(&mut OsRng, bits)
                .map(Self::Rsa)
                .map_err(|e| VaultError::KeyGeneration(format!("RSA key generation: {e}"))),
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Rsa(key) => KeyAlgorithm::Rsa {
                bits: key.size() * 8,
            },
        }
    }

    /// The matching public half.
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
        }
    }

    /// Encode as PKCS#8 PEM.
    pub fn to_pem(&self) -> Result<Zeroizing<String>> {
        match self {
            Self::Rsa(key) => {
                let pem = key
                    .to_pkcs8_pem(LineEnding::LF)
                    .map_err(|e| VaultError::KeyGeneration(format!("private key encoding: {e}")))?;
                Ok(Zeroizing::new(pem.as_str().to_owned()))
            }
        }
    }

    /// Parse a PEM private key read from `path`.
    pub fn from_pem(path: &Path, pem: &str) -> Result<Self> {
        let bad = |reason: String| VaultError::KeyFormat {
            path: path.to_path_buf(),
            reason,
        };

        let parsed = match pem_label(pem) {
            Some("PRIVATE KEY") => RsaPrivateKey::from_pkcs8_pem(pem).map_err(describe),
            Some("RSA PRIVATE KEY") => RsaPrivateKey::from_pkcs1_pem(pem).map_err(describe),
            Some(other) => Err(format!("unknown key type {other:?}, want \"PRIVATE KEY\"")),
            None => Err("not PEM encoded".into()),
        };
        let key = parsed.map_err(&bad)?;
        key.validate()
            .map_err(|e| bad(format!("inconsistent RSA key: {e}")))?;

        let key = Self::Rsa(key);
        check_strength(path, key.algorithm())?;
        Ok(key)
    }
}

/// A private key together with its public half.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a new key pair in memory.
    pub fn generate(algorithm: KeyAlgorithm) -> Result<Self> {
        let private = PrivateKey::generate(algorithm)?;
        let public = private.public_key();
        Ok(Self { private, public })
    }

    /// Load both halves from disk and check they belong together.
    pub fn load(private_path: &Path, public_path: &Path) -> Result<Self> {
        let private_pem = Zeroizing::new(read_key_file(private_path)?);
        let public_pem = read_key_file(public_path)?;

        let private = PrivateKey::from_pem(private_path, &private_pem)?;
        let public = PublicKey::from_pem(public_path, &public_pem)?;

        if private.public_key() != public {
            return Err(VaultError::KeyMismatch);
        }

        Ok(Self { private, public })
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.private.algorithm()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// PEM text for both halves.
    pub fn encode(&self) -> Result<EncodedKeyPair> {
        Ok(EncodedKeyPair {
            private_pem: self.private.to_pem()?,
            public_pem: self.public.to_pem()?,
        })
    }
}

/// PEM encodings of a key pair, ready to be written.
pub struct EncodedKeyPair {
    pub private_pem: Zeroizing<String>,
    pub public_pem: String,
}

/// What `generate_key_pair` wrote.
#[derive(Debug, Clone)]
pub struct GeneratedKeys {
    pub label: String,
    pub algorithm: KeyAlgorithm,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub fingerprint: String,
}

/// Generate a key pair for `label` and write it to the given paths.
///
/// Refuses to replace existing key files unless `overwrite` is set.
/// Both files are staged first and renamed into place together.  If only
/// one rename lands, it is rolled back: a replaced file gets its old
/// contents again and a new one is removed.
pub fn generate_key_pair(
    label: &str,
    algorithm: KeyAlgorithm,
    private_key_path: &Path,
    public_key_path: &Path,
    overwrite: bool,
) -> Result<GeneratedKeys> {
    if !overwrite {
        for path in [private_key_path, public_key_path] {
            if path.exists() {
                return Err(VaultError::KeyExists(path.to_path_buf()));
            }
        }
    }

    let pair = KeyPair::generate(algorithm)?;
    let encoded = pair.encode()?;
    let fingerprint = pair.public_key().fingerprint()?;

    let targets = [
        (private_key_path, fsio::MODE_PRIVATE),
        (public_key_path, fsio::MODE_PUBLIC),
    ];
    let previous = targets
        .iter()
        .map(|(path, _)| read_previous(path))
        .collect::<Result<Vec<_>>>()?;

    let staged = StagedFiles::stage(
        &[
            StageItem {
                target: private_key_path,
                contents: encoded.private_pem.as_bytes(),
                mode: fsio::MODE_PRIVATE,
            },
            StageItem {
                target: public_key_path,
                contents: encoded.public_pem.as_bytes(),
                mode: fsio::MODE_PUBLIC,
            },
        ],
        "tmp",
    )
    .map_err(|e| VaultError::KeyGeneration(format!("failed to write key files: {e}")))?;

    if let Err(err) = staged.install() {
        for path in &err.remaining {
            let _ = fs::remove_file(path);
        }
        for ((target, mode), old) in targets.iter().zip(&previous) {
            if !err.installed.iter().any(|p| p == target) {
                continue;
            }
            let rolled_back = match old {
                Some(bytes) => fsio::write_atomic(target, bytes, *mode),
                None => fs::remove_file(target),
            };
            if let Err(e) = rolled_back {
                warn!(path = %target.display(), error = %e, "could not roll back key file");
            }
        }
        return Err(VaultError::KeyGeneration(format!(
            "failed to install key files: {}",
            err.source
        )));
    }

    info!(
        user = label,
        algorithm = %algorithm,
        private_key = %private_key_path.display(),
        public_key = %public_key_path.display(),
        "generated key pair"
    );

    Ok(GeneratedKeys {
        label: label.to_string(),
        algorithm,
        private_key_path: private_key_path.to_path_buf(),
        public_key_path: public_key_path.to_path_buf(),
        fingerprint,
    })
}

/// Current contents of a key file about to be replaced, if it is a file.
fn read_previous(path: &Path) -> Result<Option<Zeroizing<Vec<u8>>>> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(Zeroizing::new(fs::read(path)?)))
}

fn read_key_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => VaultError::KeyNotFound(path.to_path_buf()),
        io::ErrorKind::InvalidData => VaultError::KeyFormat {
            path: path.to_path_buf(),
            reason: "not PEM encoded".into(),
        },
        _ => VaultError::Io(e),
    })
}

fn check_strength(path: &Path, algorithm: KeyAlgorithm) -> Result<()> {
    algorithm.validate().map_err(|_| {
        warn!(path = %path.display(), %algorithm, "rejecting weak key");
        VaultError::KeyFormat {
            path: path.to_path_buf(),
            reason: format!("{algorithm} is below the {MIN_RSA_BITS}-bit minimum"),
        }
    })
}

fn describe(err: impl fmt::Display) -> String {
    err.to_string()
}

/// The label of the first PEM block, e.g. `PUBLIC KEY`.
fn pem_label(text: &str) -> Option<&str> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    line.strip_prefix("-----BEGIN ")?.strip_suffix("-----")
}
