//! `cryptorious rotate` — replace every key and re-encrypt the vault.
//!
//! The current key pair has to be present and consistent.  A fresh vault
//! key and key pair are generated, every entry is re-encrypted in memory,
//! and nothing on disk changes unless all of that succeeds.

use crate::cli::output;
use crate::cli::{confirm, default_user, resolve, Cli};
use crate::errors::Result;
use crate::vault::rotate_all;

/// Execute the `rotate` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let (settings, paths) = resolve(cli)?;

    if !force
        && !confirm("Replace the vault key and key pair and re-encrypt every entry?")?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    let algorithm = settings.key_algorithm();
    output::info(&format!("Generating new vault key and {algorithm} key pair..."));

    let report = rotate_all(&paths, algorithm, &default_user())?;

    output::success(&format!(
        "Rotated keys and re-encrypted {} entr{}",
        report.entries,
        if report.entries == 1 { "y" } else { "ies" }
    ));
    output::info(&format!("New fingerprint: {}", report.fingerprint));
    output::tip("Back up the new key files; the old ones can no longer decrypt this vault.");

    Ok(())
}
