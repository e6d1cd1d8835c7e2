//! Author repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup/create APIs over the `authors` table.
//! - Provide the find-or-create upsert used by the import pipeline.
//!
//! # Invariants
//! - Names are not unique in storage; lookups by name resolve to the lowest id.
//! - Authors are never deleted through this repository.

use crate::model::author::{Author, AuthorId};
use crate::model::validate_name;
use crate::repo::{PageRequest, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT id, name FROM authors";

/// Outcome of [`AuthorRepository::find_or_create_by_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorUpsert {
    pub author: Author,
    /// `true` when the row was inserted by this call.
    pub created: bool,
}

/// Repository interface for author operations.
pub trait AuthorRepository {
    /// Inserts one author and returns it with its assigned id.
    fn create_author(&self, name: &str) -> RepoResult<Author>;
    /// Returns the existing author with `name`, or creates one.
    fn find_or_create_by_name(&self, name: &str) -> RepoResult<AuthorUpsert>;
    /// Gets one author by id.
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    /// Gets one author by exact name.
    fn get_author_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    /// Lists authors ordered by id within the requested window.
    fn list_authors(&self, page: &PageRequest) -> RepoResult<Vec<Author>>;
    /// Returns the total number of authors.
    fn count_authors(&self) -> RepoResult<u64>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Wraps a migrated connection (or an open transaction through deref).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, name: &str) -> RepoResult<Author> {
        validate_name("name", name).map_err(|err| RepoError::InvalidInput(err.to_string()))?;

        self.conn
            .execute("INSERT INTO authors (name) VALUES (?1);", [name])?;

        Ok(Author {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn find_or_create_by_name(&self, name: &str) -> RepoResult<AuthorUpsert> {
        if let Some(author) = self.get_author_by_name(name)? {
            return Ok(AuthorUpsert {
                author,
                created: false,
            });
        }

        let author = self.create_author(name)?;
        Ok(AuthorUpsert {
            author,
            created: true,
        })
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_author_row,
            )
            .optional()?;
        Ok(author)
    }

    fn get_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC LIMIT 1;"),
                [name],
                parse_author_row,
            )
            .optional()?;
        Ok(author)
    }

    fn list_authors(&self, page: &PageRequest) -> RepoResult<Vec<Author>> {
        let mut sql = format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        page.push_sql(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let authors = stmt
            .query_map(params_from_iter(bind_values), parse_author_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }

    fn count_authors(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative author count `{count}`")))
    }
}

fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
