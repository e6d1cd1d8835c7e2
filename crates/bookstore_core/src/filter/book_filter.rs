//! Book listing filter.
//!
//! # Responsibility
//! - Recognize `authors`, `edition`, `name` and `publication_year` keys.
//! - Ignore every other key, including pagination keys.
//!
//! # Invariants
//! - A recognized key with an empty value does not narrow the result.
//! - Distinct keys combine with AND; repeated `authors` keys combine with OR.

use crate::model::author::AuthorId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Query keys that narrow a book listing.
pub const BOOK_FILTER_KEYS: [&str; 4] = ["authors", "edition", "name", "publication_year"];

/// Error for recognized filter keys carrying unparseable values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterError {
    pub key: String,
    pub value: String,
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value `{}` for filter `{}`: expected an integer",
            self.value, self.key
        )
    }
}

impl Error for FilterError {}

/// Exact-match restrictions applied to a book listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub name: Option<String>,
    pub edition: Option<i64>,
    pub publication_year: Option<i64>,
    /// Books associated with any of these authors.
    pub authors: Vec<AuthorId>,
}

impl BookFilter {
    /// Builds a filter from raw `(key, value)` query pairs.
    ///
    /// # Errors
    /// - Returns [`FilterError`] when `authors`, `edition` or
    ///   `publication_year` carries a non-integer value.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, FilterError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if value.is_empty() || !BOOK_FILTER_KEYS.contains(&key) {
                continue;
            }

            match key {
                "name" => filter.name = Some(value.to_string()),
                "edition" => filter.edition = Some(parse_int(key, value)?),
                "publication_year" => filter.publication_year = Some(parse_int(key, value)?),
                "authors" => {
                    let id = parse_int(key, value)?;
                    if !filter.authors.contains(&id) {
                        filter.authors.push(id);
                    }
                }
                _ => {}
            }
        }
        Ok(filter)
    }

    /// Returns whether no restriction is active.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.edition.is_none()
            && self.publication_year.is_none()
            && self.authors.is_empty()
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64, FilterError> {
    value.trim().parse::<i64>().map_err(|_| FilterError {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{BookFilter, FilterError};

    #[test]
    fn unrecognized_and_empty_keys_are_ignored() {
        let filter =
            BookFilter::from_pairs([("page", "2"), ("title", "x"), ("name", ""), ("edition", "")])
                .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn recognized_keys_are_parsed() {
        let filter = BookFilter::from_pairs([
            ("name", "Dune"),
            ("edition", "2"),
            ("publication_year", "1965"),
            ("authors", "3"),
            ("authors", "4"),
            ("authors", "3"),
        ])
        .unwrap();

        assert_eq!(filter.name.as_deref(), Some("Dune"));
        assert_eq!(filter.edition, Some(2));
        assert_eq!(filter.publication_year, Some(1965));
        assert_eq!(filter.authors, vec![3, 4]);
    }

    #[test]
    fn non_integer_value_is_rejected() {
        let err = BookFilter::from_pairs([("edition", "first")]).unwrap_err();
        assert_eq!(
            err,
            FilterError {
                key: "edition".to_string(),
                value: "first".to_string(),
            }
        );
    }
}
