//! Page request and row-number window arithmetic.
//!
//! # Invariants
//! - `page` and `limit` are positive.
//! - A window is half-open: `start <= line_num < end`, so it never holds
//!   more than `limit` rows.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Offset arithmetic used to turn `(page, limit)` into row numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paging {
    /// `start = page > 1 ? page * limit : page`.
    ///
    /// Page 2 starts at row `2 * limit`, skipping rows `limit + 1 ..
    /// 2 * limit - 1`. Kept as the default because existing callers page
    /// with it; prefer [`Paging::Offset`] for contiguous pages. The window
    /// end is exclusive, so page 2 at limit 10 covers rows 20 through 29.
    #[default]
    Legacy,
    /// `start = (page - 1) * limit + 1`.
    Offset,
}

/// Page request for annotation listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    #[serde(default)]
    pub paging: Paging,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            paging: Paging::Legacy,
        }
    }
}

/// Row-number window `[start, end)` over the ranked annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: i64,
    pub end: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page,
            limit,
            paging: Paging::Legacy,
        }
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    /// Validates the request and computes its row-number window.
    pub fn window(&self) -> Result<RowWindow, ValidationError> {
        let (page, limit) = (self.page, self.limit);
        if page <= 0 || limit <= 0 {
            return Err(ValidationError::NonPositivePaging { page, limit });
        }

        let start = match self.paging {
            Paging::Legacy if page > 1 => page.checked_mul(limit),
            Paging::Legacy => Some(page),
            Paging::Offset => (page - 1)
                .checked_mul(limit)
                .and_then(|offset| offset.checked_add(1)),
        };
        let end = start.and_then(|start| start.checked_add(limit));

        match (start, end) {
            (Some(start), Some(end)) => Ok(RowWindow { start, end }),
            _ => Err(ValidationError::PagingOutOfRange { page, limit }),
        }
    }
}
