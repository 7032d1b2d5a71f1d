use clap::Parser;
use cryptorious::cli::commands::encrypt::EncryptArgs;
use cryptorious::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            ref user,
            bits,
            force,
        } => cryptorious::cli::commands::generate::execute(&cli, user.as_deref(), bits, force),
        Commands::Encrypt {
            ref name,
            ref username,
            ref password,
            password_stdin,
            ref note,
        } => cryptorious::cli::commands::encrypt::execute(
            &cli,
            &EncryptArgs {
                name,
                username: username.as_deref(),
                password: password.as_deref(),
                password_stdin,
                note: note.as_deref(),
            },
        ),
        Commands::Decrypt { ref name, copy } => {
            cryptorious::cli::commands::decrypt::execute(&cli, name, copy)
        }
        Commands::Delete { ref name, force } => {
            cryptorious::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::List => cryptorious::cli::commands::list::execute(&cli),
        Commands::Rotate { force } => cryptorious::cli::commands::rotate::execute(&cli, force),
        Commands::Completions { ref shell } => {
            cryptorious::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        cryptorious::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr.  `CRYPTORIOUS_LOG` takes precedence over `-v` flags.
fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("CRYPTORIOUS_LOG").unwrap_or_else(|_| level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}
