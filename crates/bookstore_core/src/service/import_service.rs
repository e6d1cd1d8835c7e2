//! Bulk author import from CSV files.
//!
//! # Responsibility
//! - Read a CSV file with a `name` header column row by row.
//! - Upsert one author per row by exact name.
//!
//! # Invariants
//! - The whole run is one transaction: any error leaves `authors` exactly
//!   as it was before the run.
//! - Repeated names, within one file or across runs, never create
//!   duplicate authors.
//! - A file with no data rows succeeds without writes.

use crate::model::{validate_name, ModelValidationError};
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::RepoError;
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Prefix of every import failure message shown to operators.
pub const IMPORT_ERROR_PREFIX: &str = "Oops, there was a problem processing your file - ";

const NAME_COLUMN: &str = "name";

/// Import failure. Displays as [`IMPORT_ERROR_PREFIX`] followed by the cause.
#[derive(Debug)]
pub enum ImportError {
    /// File could not be opened.
    Io(std::io::Error),
    /// File is not valid CSV (for example a row with a different field count).
    Csv(csv::Error),
    /// Header row has no `name` column.
    MissingNameColumn,
    /// Row at `line` has an empty name.
    BlankName { line: u64 },
    /// Row at `line` has a name the catalog cannot store.
    InvalidName {
        line: u64,
        source: ModelValidationError,
    },
    /// Store failure while upserting.
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(IMPORT_ERROR_PREFIX)?;
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::MissingNameColumn => write!(f, "missing `{NAME_COLUMN}` column"),
            Self::BlankName { line } => write!(f, "blank author name on line {line}"),
            Self::InvalidName { line, source } => {
                write!(f, "invalid author name on line {line}: {source}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidName { source, .. } => Some(source),
            Self::MissingNameColumn | Self::BlankName { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Summary of a successful import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Data rows read, header excluded.
    pub rows_read: u64,
    /// Authors inserted by this run.
    pub authors_created: u64,
}

/// Imports authors from the CSV file at `path` in one transaction.
///
/// # Errors
/// - Returns [`ImportError`] on a missing file, malformed row, blank name or
///   store failure; every insertion of the run is rolled back.
pub fn import_authors(
    conn: &mut Connection,
    path: impl AsRef<Path>,
) -> Result<ImportReport, ImportError> {
    let started_at = Instant::now();
    let path = path.as_ref();
    info!(
        "event=author_import module=import status=start path={}",
        path.display()
    );

    match run_import(conn, path) {
        Ok(report) => {
            info!(
                "event=author_import module=import status=ok rows={} created={} duration_ms={}",
                report.rows_read,
                report.authors_created,
                started_at.elapsed().as_millis()
            );
            Ok(report)
        }
        Err(err) => {
            error!(
                "event=author_import module=import status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn run_import(conn: &mut Connection, path: &Path) -> Result<ImportReport, ImportError> {
    let mut reader = csv::Reader::from_reader(File::open(path)?);
    let name_index = reader
        .headers()?
        .iter()
        .position(|header| header == NAME_COLUMN);

    let tx = conn.transaction()?;
    let repo = SqliteAuthorRepository::new(&tx);
    let mut report = ImportReport::default();

    for record in reader.records() {
        let record = record?;
        let name_index = name_index.ok_or(ImportError::MissingNameColumn)?;
        let line = record.position().map_or(0, |position| position.line());
        let name = record.get(name_index).unwrap_or_default();
        if name.trim().is_empty() {
            return Err(ImportError::BlankName { line });
        }
        validate_name(NAME_COLUMN, name)
            .map_err(|source| ImportError::InvalidName { line, source })?;

        report.rows_read += 1;
        if repo.find_or_create_by_name(name)?.created {
            report.authors_created += 1;
        }
    }

    tx.commit()?;
    Ok(report)
}
