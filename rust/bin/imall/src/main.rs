//! `imall` — inspect and manage the admin console session from a terminal.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imall_admin::{SessionConfig, SessionContext};

/// I-Mall admin CLI.
#[derive(Parser, Debug)]
#[command(name = "imall", about = "I-Mall admin session CLI")]
struct Cli {
    /// Path to session config file (default: ~/.imall/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Session token operations.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Admin record helpers.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    /// Print the current token.
    Show,
    /// Store a token.
    Set { token: String },
    /// Clear the token.
    Reset,
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// Apply a partial update to an admin record and print the result.
    Apply {
        /// Admin record as JSON, or a path to a JSON file.
        #[arg(long)]
        record: String,
        /// Update parameters as JSON.
        #[arg(long)]
        params: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(SessionConfig::default_path);

    match cli.command {
        Commands::Token { action } => {
            let config = SessionConfig::load(&config_path)?;
            let session = SessionContext::open(&config)?;
            match action {
                TokenAction::Show => commands::token::show(&session),
                TokenAction::Set { token } => commands::token::set(&session, &token)?,
                TokenAction::Reset => commands::token::reset(&session)?,
            }
        }

        Commands::Admin { action } => match action {
            AdminAction::Apply { record, params } => {
                let output = commands::admin::apply(&record, &params)?;
                println!("{}", output);
            }
        },

        Commands::Version => {
            println!("imall cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
