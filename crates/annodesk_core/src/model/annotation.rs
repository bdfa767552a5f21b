//! Annotation domain model.
//!
//! # Responsibility
//! - Define the create request and its validation rules.
//! - Define the paged read model with embedded category summaries.
//!
//! # Invariants
//! - `title` is always present and non-empty.
//! - `last_modify >= create_at` (enforced by the schema).

use super::category::CategorySummary;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Engine-assigned annotation identifier.
pub type AnnotationId = i64;

/// Create request for one annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnnotation {
    pub title: String,
    /// Free text body.
    #[serde(default)]
    pub text: Option<String>,
    /// Attached file path or identifier.
    #[serde(default)]
    pub file: Option<String>,
}

impl NewAnnotation {
    /// Creates a title-only request.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: None,
            file: None,
        }
    }

    /// Sets the free text body.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the attached file reference.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Checks write invariants.
    ///
    /// `text` and `file` are typed as text already; only `title` needs a
    /// runtime check here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        Ok(())
    }
}

/// One row of an annotation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: AnnotationId,
    pub title: String,
    pub text: Option<String>,
    pub file: Option<String>,
    /// Epoch milliseconds.
    pub last_modify: i64,
    /// Epoch milliseconds.
    pub create_at: i64,
    /// 1-based rank by `last_modify DESC` within the query that produced it.
    pub line_num: i64,
    /// Aggregated categories. Holds a single placeholder entry when the
    /// annotation has no linked category.
    pub categories: Vec<CategorySummary>,
}

impl AnnotationRecord {
    /// Categories excluding the null placeholder produced by the left join.
    pub fn linked_categories(&self) -> impl Iterator<Item = &CategorySummary> {
        self.categories
            .iter()
            .filter(|category| !category.is_placeholder())
    }
}

#[cfg(test)]
mod tests {
    use super::{AnnotationRecord, NewAnnotation};
    use crate::model::category::CategorySummary;
    use crate::model::validation::ValidationError;

    #[test]
    fn validate_rejects_empty_title_only() {
        assert_eq!(
            NewAnnotation::new("").validate(),
            Err(ValidationError::MissingTitle)
        );
        for title in ["   ", "\n\t"] {
            assert!(NewAnnotation::new(title).validate().is_ok());
        }
    }

    #[test]
    fn validate_accepts_title_with_optional_fields() {
        let annotation = NewAnnotation::new("Reading list")
            .with_text("chapter 3")
            .with_file("books/dune.pdf");
        assert!(annotation.validate().is_ok());
        assert_eq!(annotation.file.as_deref(), Some("books/dune.pdf"));
    }

    #[test]
    fn linked_categories_skips_placeholder() {
        let record = AnnotationRecord {
            id: 1,
            title: "t".to_string(),
            text: None,
            file: None,
            last_modify: 0,
            create_at: 0,
            line_num: 1,
            categories: vec![CategorySummary::default()],
        };
        assert_eq!(record.linked_categories().count(), 0);
    }
}
