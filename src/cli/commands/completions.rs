//! `cryptorious completions` — print a shell completion script.
//!
//! Usage:
//!   cryptorious completions bash > ~/.local/share/bash-completion/completions/cryptorious
//!   cryptorious completions zsh > ~/.zfunc/_cryptorious

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "cryptorious", &mut io::stdout());
    Ok(())
}

fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_ascii_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        other => Err(VaultError::CommandFailed(format!(
            "unsupported shell '{other}' (expected bash, zsh, fish, powershell or elvish)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_shells() {
        assert_eq!(parse_shell("Bash").unwrap(), Shell::Bash);
        assert_eq!(parse_shell("pwsh").unwrap(), Shell::PowerShell);
        assert_eq!(parse_shell("fish").unwrap(), Shell::Fish);
    }

    #[test]
    fn unknown_shell_is_an_error() {
        let err = parse_shell("tcsh").unwrap_err();
        assert!(err.to_string().contains("tcsh"));
    }
}
