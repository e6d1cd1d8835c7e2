//! Core domain logic for the bookstore catalog.
//! This crate is the single source of truth for Author/Book invariants.

pub mod db;
pub mod filter;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use filter::book_filter::{BookFilter, FilterError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::author::{Author, AuthorId};
pub use model::book::{Book, BookFields, BookId};
pub use model::ModelValidationError;
pub use repo::author_repo::{AuthorRepository, AuthorUpsert, SqliteAuthorRepository};
pub use repo::book_repo::{BookListQuery, BookRepository, SqliteBookRepository};
pub use repo::{PageRequest, RepoError, RepoResult};
pub use service::author_service::{AuthorService, AuthorServiceError};
pub use service::book_service::{
    BookService, BookServiceError, CreateBookRequest, UpdateBookRequest, UpdateMode,
};
pub use service::import_service::{import_authors, ImportError, ImportReport};
pub use service::Page;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
