//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{Settings, VaultPaths};
use crate::errors::{Result, VaultError};

/// cryptorious: CLI-based encryption for passwords and random data.
#[derive(Parser)]
#[command(
    name = "cryptorious",
    about = "CLI-based encryption for passwords and random data",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the vault and keys (default: .cryptorious)
    #[arg(long, env = "CRYPTORIOUS_VAULT_DIR", global = true)]
    pub vault_dir: Option<String>,

    /// Path to the vault file
    #[arg(
        long,
        visible_alias = "vp",
        env = "CRYPTORIOUS_VAULT_PATH",
        global = true
    )]
    pub vault_path: Option<PathBuf>,

    /// Path to the symmetric key file
    #[arg(long, env = "CRYPTORIOUS_KEY_PATH", global = true)]
    pub key_path: Option<PathBuf>,

    /// Path to the private key
    #[arg(
        long,
        visible_alias = "priv",
        env = "CRYPTORIOUS_PRIVATE_KEY",
        global = true
    )]
    pub private_key: Option<PathBuf>,

    /// Path to the public key
    #[arg(
        long,
        visible_alias = "pub",
        env = "CRYPTORIOUS_PUBLIC_KEY",
        global = true
    )]
    pub public_key: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate the vault key and an RSA public/private key pair for a user
    #[command(visible_alias = "g")]
    Generate {
        /// User the key pair belongs to (default: $USER)
        user: Option<String>,
        /// RSA modulus size in bits (minimum 2048)
        #[arg(long)]
        bits: Option<usize>,
        /// Replace an existing key pair
        #[arg(short, long)]
        force: bool,
    },

    /// Encrypt a new entry into the vault
    #[command(visible_alias = "e")]
    Encrypt {
        /// Entry name (e.g. github)
        name: String,
        /// Username, stored unencrypted
        #[arg(short, long)]
        username: Option<String>,
        /// Password (omit for interactive prompt)
        #[arg(short, long, conflicts_with = "password_stdin")]
        password: Option<String>,
        /// Read the password from stdin
        #[arg(long)]
        password_stdin: bool,
        /// Secure note (omit for interactive prompt)
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Decrypt and show an entry
    #[command(visible_alias = "d")]
    Decrypt {
        /// Entry name
        name: String,
        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Delete an entry
    #[command(visible_alias = "rm")]
    Delete {
        /// Entry name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List all entries
    #[command(visible_alias = "ls")]
    List,

    /// Replace all keys and re-encrypt every entry
    Rotate {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the working directory and apply CLI overrides.
///
/// Relative override paths are taken relative to the working directory.
pub fn resolve(cli: &Cli) -> Result<(Settings, VaultPaths)> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;

    if let Some(dir) = &cli.vault_dir {
        settings.vault_dir = dir.clone();
    }

    let mut paths = settings.paths(&cwd);
    if let Some(p) = &cli.vault_path {
        paths.vault = cwd.join(p);
    }
    if let Some(p) = &cli.key_path {
        paths.key = cwd.join(p);
    }
    if let Some(p) = &cli.private_key {
        paths.private_key = cwd.join(p);
    }
    if let Some(p) = &cli.public_key {
        paths.public_key = cwd.join(p);
    }

    Ok((settings, paths))
}

/// Label for key pairs when no user is given.
pub fn default_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "cryptorious".to_string())
}

/// Prompt for a hidden value.  Empty input means "not set".
///
/// Returns `Zeroizing<String>` so the value is wiped from memory on drop.
pub fn prompt_secret(prompt: &str) -> Result<Option<Zeroizing<String>>> {
    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Some(Zeroizing::new(value)).filter(|v| !v.is_empty()))
}

/// Prompt for a visible, optional line of text.
pub fn prompt_line(prompt: &str) -> Result<Option<String>> {
    let value: String = dialoguer::Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Some(value).filter(|v| !v.is_empty()))
}

/// Ask for a yes/no confirmation, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}
