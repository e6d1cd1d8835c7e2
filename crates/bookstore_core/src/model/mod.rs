//! Catalog domain model.
//!
//! # Responsibility
//! - Define the Author and Book records shared by repositories, services
//!   and the HTTP surface.
//! - Own field-level validation rules applied before any write.
//!
//! # Invariants
//! - Ids are store-assigned and never reused.
//! - A persisted Book always carries at least one Author.

pub mod author;
pub mod book;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum length, in characters, of author and book names.
pub const NAME_MAX_CHARS: usize = 200;

/// Upper bound of small integer columns (`edition`, `publication_year`).
pub const SMALL_INT_MAX: i64 = 32_767;

/// Field-level validation failure for catalog records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Named text field is empty or whitespace only.
    BlankField(&'static str),
    /// Named text field exceeds `NAME_MAX_CHARS`.
    FieldTooLong { field: &'static str, chars: usize },
    /// Named integer field is outside `0..=SMALL_INT_MAX`.
    OutOfRange { field: &'static str, value: i64 },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} may not be blank"),
            Self::FieldTooLong { field, chars } => write!(
                f,
                "{field} must have at most {NAME_MAX_CHARS} characters (got {chars})"
            ),
            Self::OutOfRange { field, value } => write!(
                f,
                "{field} must be between 0 and {SMALL_INT_MAX} (got {value})"
            ),
        }
    }
}

impl Error for ModelValidationError {}

/// Validates a required name-like text field.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::BlankField(field));
    }
    let chars = value.chars().count();
    if chars > NAME_MAX_CHARS {
        return Err(ModelValidationError::FieldTooLong { field, chars });
    }
    Ok(())
}

/// Validates a small non-negative integer field and narrows it to `u16`.
pub fn validate_small_int(field: &'static str, value: i64) -> Result<u16, ModelValidationError> {
    if !(0..=SMALL_INT_MAX).contains(&value) {
        return Err(ModelValidationError::OutOfRange { field, value });
    }
    u16::try_from(value).map_err(|_| ModelValidationError::OutOfRange { field, value })
}
