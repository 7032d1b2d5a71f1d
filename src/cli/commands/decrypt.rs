//! `cryptorious decrypt` — decrypt and print a single entry.

use std::time::Duration;

use crate::cli::output;
use crate::cli::{resolve, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::reveal_entry;

/// How long the password stays on the clipboard when we have to own it.
const CLIPBOARD_HOLD: Duration = Duration::from_secs(30);

/// Execute the `decrypt` command.
pub fn execute(cli: &Cli, name: &str, copy: bool) -> Result<()> {
    let (_, paths) = resolve(cli)?;
    let entry = reveal_entry(&paths, name)?;

    match (&entry.password, copy) {
        (Some(password), true) => {
            output::print_revealed(&entry, true);
            copy_to_clipboard(password)?;
            output::success(&format!("Password for '{name}' copied to clipboard"));
        }
        (None, true) => {
            output::print_revealed(&entry, false);
            output::warning(&format!("'{name}' has no password to copy"));
        }
        (_, false) => output::print_revealed(&entry, false),
    }

    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::SetExtLinux;

    // X11/Wayland clipboards are served by the owning process, so keep it
    // alive until another program takes the selection or the hold expires.
    let deadline = std::time::Instant::now() + CLIPBOARD_HOLD;
    clipboard()?
        .set()
        .wait_until(deadline)
        .text(text.to_string())
        .map_err(clipboard_error)
}

#[cfg(not(target_os = "linux"))]
fn copy_to_clipboard(text: &str) -> Result<()> {
    let _ = CLIPBOARD_HOLD;
    clipboard()?
        .set_text(text.to_string())
        .map_err(clipboard_error)
}

fn clipboard() -> Result<arboard::Clipboard> {
    arboard::Clipboard::new().map_err(clipboard_error)
}

fn clipboard_error(e: arboard::Error) -> VaultError {
    VaultError::CommandFailed(format!("clipboard unavailable: {e}"))
}
