//! Category domain model.

use super::annotation::AnnotationId;
use super::validation::{ensure_positive_id, ValidationError};
use serde::{Deserialize, Serialize};

/// Engine-assigned category identifier.
pub type CategoryId = i64;

/// Create request for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Rejects an empty name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        Ok(())
    }
}

/// Persisted category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

/// Category entry embedded in an annotation page row.
///
/// Every field is nullable: an annotation without categories still
/// aggregates one object whose fields are all `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Option<CategoryId>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategorySummary {
    /// Whether this entry is the all-null join placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_none()
    }
}

/// Join row between one annotation and one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationCategoryLink {
    pub annotation_id: AnnotationId,
    pub category_id: CategoryId,
}

impl AnnotationCategoryLink {
    pub fn new(annotation_id: AnnotationId, category_id: CategoryId) -> Self {
        Self {
            annotation_id,
            category_id,
        }
    }

    /// Both ids must be positive; existence is left to foreign keys.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive_id("annotationId", self.annotation_id)?;
        ensure_positive_id("categoryId", self.category_id)?;
        Ok(())
    }
}
