//! Book aggregate record.
//!
//! # Invariants
//! - `authors` is non-empty and free of duplicates.
//! - `authors` keeps the order in which ids were supplied on the last write
//!   that touched the association set.

use crate::model::author::{Author, AuthorId};
use serde::{Deserialize, Serialize};

/// Store-assigned book identifier.
pub type BookId = i64;

/// A book together with its resolved authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub edition: u16,
    pub publication_year: u16,
    pub authors: Vec<Author>,
}

impl Book {
    /// Returns author ids in association order.
    pub fn author_ids(&self) -> Vec<AuthorId> {
        self.authors.iter().map(|author| author.id).collect()
    }
}

/// Validated scalar columns of a book row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub name: String,
    pub edition: u16,
    pub publication_year: u16,
}
