//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist book rows together with their `book_authors` association set.
//! - Apply [`BookFilter`] restrictions to book listings.
//!
//! # Invariants
//! - Row and association writes for one book happen in a single transaction.
//! - Association replacement clears the previous set before inserting the new
//!   one, so a book never mixes old and new authors.
//! - Authors are read back in association `position` order.
//! - Read paths reject persisted books without authors instead of masking it.

use crate::filter::book_filter::BookFilter;
use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookFields, BookId};
use crate::repo::{PageRequest, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const BOOK_SELECT_SQL: &str = "SELECT id, name, edition, publication_year FROM books";

/// Query options for listing books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookListQuery {
    pub filter: BookFilter,
    pub page: PageRequest,
}

/// Repository interface for book aggregate persistence.
///
/// Callers are expected to have validated `author_ids` against the author
/// store; the foreign key on `book_authors` is the last line of enforcement.
pub trait BookRepository {
    /// Inserts one book and associates it with `author_ids` in order.
    fn insert_book(&self, fields: &BookFields, author_ids: &[AuthorId]) -> RepoResult<BookId>;
    /// Overwrites scalar columns and, when `author_ids` is `Some`, replaces the
    /// whole association set.
    fn update_book(
        &self,
        id: BookId,
        fields: &BookFields,
        author_ids: Option<&[AuthorId]>,
    ) -> RepoResult<()>;
    /// Deletes one book and its association rows. Authors are untouched.
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
    /// Gets one book with its authors.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Lists books ordered by id, applying filter and window.
    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>>;
    /// Counts books matching `filter`.
    fn count_books(&self, filter: &BookFilter) -> RepoResult<u64>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert_book(&self, fields: &BookFields, author_ids: &[AuthorId]) -> RepoResult<BookId> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO books (name, edition, publication_year) VALUES (?1, ?2, ?3);",
            params![fields.name.as_str(), fields.edition, fields.publication_year],
        )?;
        let book_id = tx.last_insert_rowid();
        replace_book_authors(&tx, book_id, author_ids)?;
        tx.commit()?;

        Ok(book_id)
    }

    fn update_book(
        &self,
        id: BookId,
        fields: &BookFields,
        author_ids: Option<&[AuthorId]>,
    ) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE books
             SET
                name = ?2,
                edition = ?3,
                publication_year = ?4
             WHERE id = ?1;",
            params![id, fields.name.as_str(), fields.edition, fields.publication_year],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "book", id });
        }

        if let Some(author_ids) = author_ids {
            replace_book_authors(&tx, id, author_ids)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM book_authors WHERE book_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "book", id });
        }

        tx.commit()?;
        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let row = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(Some(attach_authors(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>> {
        let mut sql = format!("{BOOK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_filter_sql(&query.filter, &mut sql, &mut bind_values);
        sql.push_str(" ORDER BY id ASC");
        query.page.push_sql(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(bind_values), parse_book_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| attach_authors(self.conn, row))
            .collect()
    }

    fn count_books(&self, filter: &BookFilter) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM books WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_filter_sql(filter, &mut sql, &mut bind_values);

        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative book count `{count}`")))
    }
}

/// Scalar columns of one `books` row before authors are attached.
struct BookRow {
    id: BookId,
    fields: BookFields,
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<BookRow> {
    Ok(BookRow {
        id: row.get("id")?,
        fields: BookFields {
            name: row.get("name")?,
            edition: row.get("edition")?,
            publication_year: row.get("publication_year")?,
        },
    })
}

fn attach_authors(conn: &Connection, row: BookRow) -> RepoResult<Book> {
    let authors = load_authors_for_book(conn, row.id)?;
    if authors.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "book {} has no associated authors",
            row.id
        )));
    }

    Ok(Book {
        id: row.id,
        name: row.fields.name,
        edition: row.fields.edition,
        publication_year: row.fields.publication_year,
        authors,
    })
}

fn load_authors_for_book(conn: &Connection, book_id: BookId) -> RepoResult<Vec<Author>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.name
         FROM book_authors ba
         INNER JOIN authors a ON a.id = ba.author_id
         WHERE ba.book_id = ?1
         ORDER BY ba.position ASC;",
    )?;
    let authors = stmt
        .query_map([book_id], |row| {
            Ok(Author {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(authors)
}

fn replace_book_authors(
    conn: &Connection,
    book_id: BookId,
    author_ids: &[AuthorId],
) -> RepoResult<()> {
    conn.execute("DELETE FROM book_authors WHERE book_id = ?1;", [book_id])?;

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO book_authors (book_id, author_id, position)
         VALUES (?1, ?2, ?3);",
    )?;
    for (position, author_id) in author_ids.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| RepoError::InvalidData("author list too long".to_string()))?;
        stmt.execute(params![book_id, author_id, position])?;
    }

    Ok(())
}

fn push_filter_sql(filter: &BookFilter, sql: &mut String, bind_values: &mut Vec<Value>) {
    if let Some(name) = filter.name.as_ref() {
        sql.push_str(" AND name = ?");
        bind_values.push(Value::Text(name.clone()));
    }

    if let Some(edition) = filter.edition {
        sql.push_str(" AND edition = ?");
        bind_values.push(Value::Integer(edition));
    }

    if let Some(year) = filter.publication_year {
        sql.push_str(" AND publication_year = ?");
        bind_values.push(Value::Integer(year));
    }

    if !filter.authors.is_empty() {
        let placeholders = vec!["?"; filter.authors.len()].join(", ");
        sql.push_str(&format!(
            " AND EXISTS (
                SELECT 1
                FROM book_authors ba
                WHERE ba.book_id = books.id
                  AND ba.author_id IN ({placeholders})
            )"
        ));
        bind_values.extend(filter.authors.iter().map(|id| Value::Integer(*id)));
    }
}
