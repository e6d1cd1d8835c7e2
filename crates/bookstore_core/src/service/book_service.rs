//! Book aggregate use-case service.
//!
//! # Responsibility
//! - Create, update, delete and read books together with their authors.
//! - Validate requests and resolve every referenced author before any write.
//!
//! # Invariants
//! - A book never ends up with zero authors.
//! - The first unresolved author id aborts the whole operation with no
//!   persistent effect.
//! - Omitted scalar fields keep their current values, in both update modes.
//! - Returned authors follow the order of the supplied ids, first occurrence
//!   wins on duplicates.

use crate::filter::book_filter::{BookFilter, FilterError};
use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookFields, BookId};
use crate::model::{validate_name, validate_small_int, ModelValidationError};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::{BookListQuery, BookRepository};
use crate::repo::{PageRequest, RepoError};
use crate::service::Page;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const AUTHORS_REQUIRED_MESSAGE: &str = "at least one author is required";
pub const AUTHOR_MISSING_MESSAGE: &str = "author does not exist";

/// Errors from book service operations.
#[derive(Debug)]
pub enum BookServiceError {
    /// Client-supplied data violates a catalog invariant.
    Validation(String),
    /// Target book does not exist.
    BookNotFound(BookId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent book state: {details}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BookServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "book",
                id,
            } => Self::BookNotFound(id),
            RepoError::InvalidInput(message) => Self::Validation(message),
            other => Self::Repo(other),
        }
    }
}

impl From<ModelValidationError> for BookServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<FilterError> for BookServiceError {
    fn from(value: FilterError) -> Self {
        Self::Validation(value.to_string())
    }
}

/// Request model for creating a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookRequest {
    pub name: String,
    pub edition: i64,
    pub publication_year: i64,
    /// Referenced author ids, in the order they should be listed.
    pub author_ids: Vec<AuthorId>,
}

/// How an update request treats the author association set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Full replace: a non-empty author list is mandatory.
    Replace,
    /// Partial update: every field is optional.
    Partial,
}

/// Request model for updating a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBookRequest {
    pub mode: UpdateMode,
    pub name: Option<String>,
    pub edition: Option<i64>,
    pub publication_year: Option<i64>,
    /// `None` or an empty list leaves the association set untouched.
    pub author_ids: Option<Vec<AuthorId>>,
}

impl UpdateBookRequest {
    /// Creates an update request with no field set.
    pub fn new(mode: UpdateMode) -> Self {
        Self {
            mode,
            name: None,
            edition: None,
            publication_year: None,
            author_ids: None,
        }
    }
}

/// Book aggregate service over book and author repositories.
pub struct BookService<B: BookRepository, A: AuthorRepository> {
    books: B,
    authors: A,
}

impl<B: BookRepository, A: AuthorRepository> BookService<B, A> {
    /// Creates a service using the provided repository implementations.
    pub fn new(books: B, authors: A) -> Self {
        Self { books, authors }
    }

    /// Creates one book and associates it with every referenced author.
    ///
    /// # Errors
    /// - `Validation` when `author_ids` is empty, any id is unknown, or a
    ///   scalar field is out of bounds. Nothing is written in that case.
    pub fn create(&self, request: CreateBookRequest) -> Result<Book, BookServiceError> {
        if request.author_ids.is_empty() {
            warn!("event=book_create module=service status=error error_code=authors_required");
            return Err(BookServiceError::Validation(
                AUTHORS_REQUIRED_MESSAGE.to_string(),
            ));
        }

        let fields = validate_fields(
            request.name,
            request.edition,
            request.publication_year,
        )?;
        let authors = self.resolve_authors(&request.author_ids)?;
        let author_ids: Vec<AuthorId> = authors.iter().map(|author| author.id).collect();

        let book_id = self.books.insert_book(&fields, &author_ids)?;
        info!(
            "event=book_create module=service status=ok book_id={} author_count={}",
            book_id,
            author_ids.len()
        );

        self.books
            .get_book(book_id)?
            .ok_or(BookServiceError::InconsistentState(
                "created book not found in read-back",
            ))
    }

    /// Updates scalar fields and optionally replaces the author set.
    ///
    /// # Errors
    /// - `BookNotFound` when `id` does not exist.
    /// - `Validation` when a replace request carries no authors, any author
    ///   id is unknown, or a scalar field is out of bounds. Nothing is
    ///   written in that case.
    pub fn update(
        &self,
        id: BookId,
        request: UpdateBookRequest,
    ) -> Result<Book, BookServiceError> {
        let current = self
            .books
            .get_book(id)?
            .ok_or(BookServiceError::BookNotFound(id))?;

        let author_ids = request.author_ids.filter(|ids| !ids.is_empty());
        if request.mode == UpdateMode::Replace && author_ids.is_none() {
            warn!(
                "event=book_update module=service status=error book_id={} error_code=authors_required",
                id
            );
            return Err(BookServiceError::Validation(
                AUTHORS_REQUIRED_MESSAGE.to_string(),
            ));
        }

        let fields = validate_fields(
            request.name.unwrap_or(current.name),
            request
                .edition
                .unwrap_or_else(|| i64::from(current.edition)),
            request
                .publication_year
                .unwrap_or_else(|| i64::from(current.publication_year)),
        )?;

        let resolved = match author_ids {
            Some(ids) => Some(
                self.resolve_authors(&ids)?
                    .into_iter()
                    .map(|author| author.id)
                    .collect::<Vec<_>>(),
            ),
            None => None,
        };

        self.books.update_book(id, &fields, resolved.as_deref())?;
        info!(
            "event=book_update module=service status=ok book_id={} authors_replaced={}",
            id,
            resolved.is_some()
        );

        self.books
            .get_book(id)?
            .ok_or(BookServiceError::InconsistentState(
                "updated book not found in read-back",
            ))
    }

    /// Deletes one book and its author associations.
    pub fn delete(&self, id: BookId) -> Result<(), BookServiceError> {
        self.books.delete_book(id)?;
        info!("event=book_delete module=service status=ok book_id={}", id);
        Ok(())
    }

    /// Gets one book by id.
    pub fn get(&self, id: BookId) -> Result<Book, BookServiceError> {
        self.books
            .get_book(id)?
            .ok_or(BookServiceError::BookNotFound(id))
    }

    /// Lists books matching `filter` within `page`, with the total match count.
    pub fn list(
        &self,
        filter: BookFilter,
        page: PageRequest,
    ) -> Result<Page<Book>, BookServiceError> {
        let filtered = !filter.is_empty();
        let count = self.books.count_books(&filter)?;
        let items = self.books.list_books(&BookListQuery { filter, page })?;
        debug!(
            "event=book_list module=service status=ok filtered={} count={} returned={}",
            filtered,
            count,
            items.len()
        );
        Ok(Page { count, items })
    }

    fn resolve_authors(&self, ids: &[AuthorId]) -> Result<Vec<Author>, BookServiceError> {
        let mut resolved: Vec<Author> = Vec::with_capacity(ids.len());
        for id in ids {
            if resolved.iter().any(|author| author.id == *id) {
                continue;
            }
            match self.authors.get_author(*id)? {
                Some(author) => resolved.push(author),
                None => {
                    warn!(
                        "event=author_resolve module=service status=error author_id={} error_code=author_missing",
                        id
                    );
                    return Err(BookServiceError::Validation(
                        AUTHOR_MISSING_MESSAGE.to_string(),
                    ));
                }
            }
        }
        Ok(resolved)
    }
}

fn validate_fields(
    name: String,
    edition: i64,
    publication_year: i64,
) -> Result<BookFields, ModelValidationError> {
    validate_name("name", &name)?;
    Ok(BookFields {
        name,
        edition: validate_small_int("edition", edition)?,
        publication_year: validate_small_int("publication_year", publication_year)?,
    })
}
