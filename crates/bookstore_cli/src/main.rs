//! `bookstore` command-line entry point.
//!
//! # Responsibility
//! - `importauthors <file_path>`: bulk-load authors from a CSV file.
//! - `serve`: run the HTTP API.
//!
//! Any failure exits non-zero with a descriptive message on stderr.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let log_dir = cli.resolved_log_dir(&cwd);
    let log_dir = log_dir
        .to_str()
        .context("log directory must be valid UTF-8")?;
    bookstore_core::init_logging(cli.resolved_log_level(), log_dir).map_err(anyhow::Error::msg)?;
    log::info!(
        "event=cli_start module=cli status=ok core_version={}",
        bookstore_core::core_version()
    );

    match &cli.command {
        Command::ImportAuthors { file_path } => {
            let report = commands::import_authors_command(&cli.db, file_path)?;
            println!(
                "Imported {} rows ({} new authors)",
                report.rows_read, report.authors_created
            );
        }
        Command::Serve { bind, page_size } => {
            commands::serve_command(&cli.db, *bind, *page_size).await?;
        }
    }
    Ok(())
}
