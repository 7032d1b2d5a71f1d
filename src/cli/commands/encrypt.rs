//! `cryptorious encrypt` — add a new entry to the vault.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{prompt_line, prompt_secret, resolve, Cli};
use crate::errors::Result;
use crate::vault::{add_entry, NewEntry};

/// Field values as given on the command line.
pub struct EncryptArgs<'a> {
    pub name: &'a str,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub password_stdin: bool,
    pub note: Option<&'a str>,
}

/// Execute the `encrypt` command.
pub fn execute(cli: &Cli, args: &EncryptArgs<'_>) -> Result<()> {
    let (_, paths) = resolve(cli)?;
    let interactive = io::stdin().is_terminal() && !args.password_stdin;

    // Each field comes from its flag, then (on a terminal) a prompt.
    let username = match args.username {
        Some(u) => Some(u.to_string()),
        None if interactive => prompt_line("Username (optional)")?,
        None => None,
    };

    let password = if let Some(p) = args.password {
        output::warning("Password given on the command line may end up in shell history.");
        Some(Zeroizing::new(p.to_string()))
    } else if args.password_stdin {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']);
        Some(Zeroizing::new(trimmed.to_string())).filter(|p| !p.is_empty())
    } else if interactive {
        prompt_secret("Password (leave empty to skip)")?
    } else {
        None
    };

    let note = match args.note {
        Some(n) => Some(Zeroizing::new(n.to_string())),
        None if interactive => prompt_line("Secure note (optional)")?.map(Zeroizing::new),
        None => None,
    };

    add_entry(
        &paths,
        args.name,
        &NewEntry {
            username: username.as_deref(),
            password: password.as_deref().map(String::as_str),
            secure_note: note.as_deref().map(String::as_str),
        },
    )?;

    output::success(&format!(
        "Encrypted '{}' into {}",
        args.name,
        paths.vault.display()
    ));
    output::tip(&format!("Run `cryptorious decrypt {}` to read it back.", args.name));

    Ok(())
}
