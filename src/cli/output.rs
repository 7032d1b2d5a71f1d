//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{EntrySummary, RevealedEntry};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entries (Name, Username, Password, Secure note).
pub fn print_entries_table(entries: &[EntrySummary]) {
    if entries.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `cryptorious encrypt <NAME>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Username", "Password", "Secure note"]);

    let mark = |set: bool| if set { "\u{2713}" } else { "-" };
    for e in entries {
        table.add_row(vec![
            e.name.clone(),
            e.username.clone().unwrap_or_else(|| "-".to_string()),
            mark(e.has_password).to_string(),
            mark(e.has_secure_note).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print a decrypted entry.  The password is left out when `hide_password`
/// is set (it went to the clipboard instead).
pub fn print_revealed(entry: &RevealedEntry, hide_password: bool) {
    let field = |label: &str, value: Option<&str>| {
        println!(
            "{} {}",
            style(format!("{label}:")).bold(),
            value.unwrap_or("-")
        );
    };

    field("username", entry.username.as_deref());
    if !hide_password {
        field("password", entry.password.as_deref().map(String::as_str));
    }
    let note = entry.secure_note.as_deref().map(String::as_str);
    field("secure_note", note);
}
