//! Command-line and environment configuration.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "bookstore")]
#[command(about = "Bookstore catalog API and maintenance commands", version)]
pub struct Cli {
    /// Path to the SQLite catalog database
    #[arg(long, env = "BOOKSTORE_DB", default_value = "bookstore.db", global = true)]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults per build mode
    #[arg(long, env = "BOOKSTORE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory for rolling log files; defaults to `./logs`
    #[arg(long, env = "BOOKSTORE_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Import author list from .csv file
    #[command(name = "importauthors")]
    ImportAuthors {
        /// Provides the authors csv file path
        file_path: PathBuf,
    },
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "BOOKSTORE_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,

        /// Items per listing page (1..=100)
        #[arg(long, env = "BOOKSTORE_PAGE_SIZE", default_value_t = 10)]
        page_size: u32,
    },
}

impl Cli {
    /// Resolves the log directory to an absolute path.
    pub fn resolved_log_dir(&self, cwd: &Path) -> PathBuf {
        match &self.log_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.join("logs"),
        }
    }

    pub fn resolved_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| bookstore_core::default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::{Path, PathBuf};

    #[test]
    fn importauthors_takes_a_file_path() {
        let cli = Cli::try_parse_from(["bookstore", "importauthors", "authors.csv"]).unwrap();
        assert_eq!(
            cli.command,
            Command::ImportAuthors {
                file_path: PathBuf::from("authors.csv")
            }
        );
    }

    #[test]
    fn importauthors_requires_a_file_path() {
        assert!(Cli::try_parse_from(["bookstore", "importauthors"]).is_err());
    }

    #[test]
    fn serve_accepts_bind_and_page_size() {
        let cli = Cli::try_parse_from([
            "bookstore",
            "--db",
            "/tmp/catalog.db",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--page-size",
            "25",
        ])
        .unwrap();

        assert_eq!(cli.db, PathBuf::from("/tmp/catalog.db"));
        match cli.command {
            Command::Serve { bind, page_size } => {
                assert_eq!(bind.port(), 9000);
                assert_eq!(page_size, 25);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_dir_resolves_against_cwd() {
        let cwd = Path::new("/srv/bookstore");
        let cli = Cli::try_parse_from(["bookstore", "importauthors", "a.csv"]).unwrap();
        assert_eq!(cli.resolved_log_dir(cwd), PathBuf::from("/srv/bookstore/logs"));

        let cli = Cli::try_parse_from(["bookstore", "--log-dir", "var/log", "importauthors", "a.csv"])
            .unwrap();
        assert_eq!(
            cli.resolved_log_dir(cwd),
            PathBuf::from("/srv/bookstore/var/log")
        );
    }
}
