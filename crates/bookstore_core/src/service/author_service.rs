//! Author read use-case service.
//!
//! Backs the read-only author listing and detail endpoints. Authors are
//! created by the import pipeline, not through this service.

use crate::model::author::Author;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::{PageRequest, RepoError};
use crate::service::Page;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from author service operations.
#[derive(Debug)]
pub enum AuthorServiceError {
    /// No author carries the requested name.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AuthorServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "author not found: `{name}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthorServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for AuthorServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Author service facade over repository implementations.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists authors ordered by id, with the total author count.
    pub fn list(&self, page: PageRequest) -> Result<Page<Author>, AuthorServiceError> {
        let count = self.repo.count_authors()?;
        let items = self.repo.list_authors(&page)?;
        Ok(Page { count, items })
    }

    /// Gets one author by exact name.
    pub fn get_by_name(&self, name: &str) -> Result<Author, AuthorServiceError> {
        self.repo
            .get_author_by_name(name)?
            .ok_or_else(|| AuthorServiceError::NotFound(name.to_string()))
    }
}
