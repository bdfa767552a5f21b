//! Input validation errors shared by all write and page requests.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection raised before a request reaches SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Annotation title is missing or empty.
    MissingTitle,
    /// Category name is missing or empty.
    MissingName,
    /// A payload field has the wrong shape (e.g. a number where text is expected).
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    /// An identifier is zero, negative or not an integer.
    NonPositiveId { field: &'static str, value: String },
    /// Page or limit is zero or negative.
    NonPositivePaging { page: i64, limit: i64 },
    /// Page window does not fit in a SQLite integer.
    PagingOutOfRange { page: i64, limit: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "no title has been provided to annotation"),
            Self::MissingName => write!(f, "no name has been provided to category"),
            Self::InvalidField { field, expected } => write!(f, "{field} must be {expected}"),
            Self::NonPositiveId { field, value } => {
                write!(f, "{field} must be a positive integer, got `{value}`")
            }
            Self::NonPositivePaging { page, limit } => write!(
                f,
                "page and limit must be positive integers, got page={page} limit={limit}"
            ),
            Self::PagingOutOfRange { page, limit } => {
                write!(f, "page window out of range: page={page} limit={limit}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Rejects non-positive identifiers.
pub fn ensure_positive_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveId {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}
