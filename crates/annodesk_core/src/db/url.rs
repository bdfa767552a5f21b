//! Connection string parsing.
//!
//! Hosts hand over SQL-plugin style URLs (`sqlite:annotations.db`,
//! `sqlite://path/to/file.db`, `sqlite::memory:`) or bare filesystem paths.

use super::{DbError, DbResult};
use std::path::PathBuf;

const SQLITE_SCHEME: &str = "sqlite:";
const MEMORY_TARGET: &str = ":memory:";

/// Where a connection string points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    /// Private in-memory database, discarded with the connection.
    Memory,
    /// Database file, created on first open.
    File(PathBuf),
}

impl DbTarget {
    /// Parses a host connection string.
    ///
    /// # Errors
    /// - Returns `DbError::InvalidConnectionString` for blank input, an empty
    ///   path after the scheme, or a non-`sqlite` scheme.
    pub fn parse(db_url: &str) -> DbResult<Self> {
        let trimmed = db_url.trim();
        if trimmed.is_empty() {
            return Err(DbError::InvalidConnectionString(db_url.to_string()));
        }

        let Some(rest) = trimmed.strip_prefix(SQLITE_SCHEME) else {
            if has_foreign_scheme(trimmed) {
                return Err(DbError::InvalidConnectionString(trimmed.to_string()));
            }
            return Ok(Self::File(PathBuf::from(trimmed)));
        };

        let location = rest.strip_prefix("//").unwrap_or(rest);
        if location == MEMORY_TARGET {
            return Ok(Self::Memory);
        }

        // Query parameters such as `?mode=rwc` carry no meaning here.
        let location = location.split('?').next().unwrap_or_default();
        if location.is_empty() {
            return Err(DbError::InvalidConnectionString(trimmed.to_string()));
        }
        Ok(Self::File(PathBuf::from(location)))
    }
}

// `C:\data\a.db` is a path, `postgres://...` is not.
fn has_foreign_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    scheme.len() > 1 && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+')
}
