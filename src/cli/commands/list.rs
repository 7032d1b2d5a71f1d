//! `cryptorious list` — display all entries in a table.

use crate::cli::output;
use crate::cli::{resolve, Cli};
use crate::errors::Result;
use crate::vault::list_entries;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_, paths) = resolve(cli)?;
    let entries = list_entries(&paths)?;

    if !entries.is_empty() {
        output::info(&format!(
            "{} ({} entr{})",
            paths.vault.display(),
            entries.len(),
            if entries.len() == 1 { "y" } else { "ies" }
        ));
    }
    output::print_entries_table(&entries);

    Ok(())
}
