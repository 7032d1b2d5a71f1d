//! `cryptorious generate` — create the vault key and an RSA key pair.
//!
//! The symmetric key is only created when missing: replacing it would make
//! every existing entry unreadable, which is what `rotate` is for.

use crate::cli::output;
use crate::cli::{default_user, resolve, Cli};
use crate::crypto::keyfile::generate_key_file;
use crate::errors::Result;
use crate::keys::pair::{generate_key_pair, KeyAlgorithm};

/// Execute the `generate` command.
pub fn execute(cli: &Cli, user: Option<&str>, bits: Option<usize>, force: bool) -> Result<()> {
    let (settings, paths) = resolve(cli)?;
    let label = user.map_or_else(default_user, str::to_string);

    let algorithm = match bits {
        Some(bits) => KeyAlgorithm::Rsa { bits },
        None => settings.key_algorithm(),
    };
    algorithm.validate()?;

    // Created even when the key pair below is refused.
    if paths.key.exists() {
        output::info(&format!("Keeping existing vault key at {}", paths.key.display()));
    } else {
        generate_key_file(&paths.key, false)?;
        output::success(&format!("Vault key written to {}", paths.key.display()));
    }

    output::info(&format!("Generating new {algorithm} public/private key pair for '{label}'"));
    let generated = generate_key_pair(
        &label,
        algorithm,
        &paths.private_key,
        &paths.public_key,
        force,
    )?;

    output::success(&format!(
        "Private key written to {}",
        generated.private_key_path.display()
    ));
    output::success(&format!(
        "Public key written to {}",
        generated.public_key_path.display()
    ));
    output::info(&format!("Fingerprint: {}", generated.fingerprint));

    output::warning("Keep these files secret! Anyone with the vault key can read your vault.");
    output::tip("Run `cryptorious encrypt <NAME>` to add your first entry.");

    Ok(())
}
