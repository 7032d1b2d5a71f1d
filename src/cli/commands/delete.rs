//! `cryptorious delete` — remove an entry from the vault.

use crate::cli::output;
use crate::cli::{confirm, resolve, Cli};
use crate::errors::Result;
use crate::vault::delete_entry;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let (_, paths) = resolve(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete entry '{name}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    delete_entry(&paths, name)?;
    output::success(&format!("Deleted entry '{name}'"));

    Ok(())
}
