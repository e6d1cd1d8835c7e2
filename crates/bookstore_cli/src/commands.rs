//! Subcommand implementations.

use anyhow::{Context, Result};
use bookstore_api::{ApiConfig, AppState};
use bookstore_core::db::open_db;
use bookstore_core::{import_authors, ImportReport};
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;

/// Imports the authors CSV at `file_path` into the database at `db`.
///
/// Import failures surface with their operator-facing message unchanged.
pub fn import_authors_command(db: &Path, file_path: &Path) -> Result<ImportReport> {
    let mut conn =
        open_db(db).with_context(|| format!("failed to open database `{}`", db.display()))?;
    let report = import_authors(&mut conn, file_path)?;
    Ok(report)
}

pub async fn serve_command(db: &Path, bind: SocketAddr, page_size: u32) -> Result<()> {
    let conn =
        open_db(db).with_context(|| format!("failed to open database `{}`", db.display()))?;
    let state = AppState::new(conn, ApiConfig::new(page_size));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    println!("bookstore listening on http://{}", listener.local_addr()?);

    bookstore_api::serve(listener, state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::import_authors_command;
    use bookstore_core::db::open_db;
    use bookstore_core::{AuthorRepository, SqliteAuthorRepository};
    use std::fs;

    #[test]
    fn import_command_reports_rows_and_created_authors() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("catalog.db");
        let csv = dir.path().join("authors.csv");
        fs::write(&csv, "name\nJ.D Salinger\nHugo Pellissari\nJ.D Salinger\n").unwrap();

        let report = import_authors_command(&db, &csv).unwrap();
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.authors_created, 2);

        let conn = open_db(&db).unwrap();
        let repo = SqliteAuthorRepository::new(&conn);
        assert_eq!(repo.count_authors().unwrap(), 2);
    }

    #[test]
    fn import_command_fails_with_operator_message_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("catalog.db");

        let err = import_authors_command(&db, &dir.path().join("absent.csv")).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Oops, there was a problem processing your file - "));
    }
}
