//! Annotation use-case service.
//!
//! # Responsibility
//! - Provide create/link/page entry points for core callers.
//! - Reject invalid input before the repository is touched.
//! - Emit metadata-only events for every write and page read.
//!
//! # Invariants
//! - Validation failures never reach SQLite (no partial writes).
//! - Engine errors are returned unchanged inside `RepoError::Db`.
//! - Titles, names and bodies are never logged.

use crate::model::annotation::{AnnotationId, AnnotationRecord, NewAnnotation};
use crate::model::category::{AnnotationCategoryLink, Category, CategoryId, NewCategory};
use crate::model::page::PageRequest;
use crate::repo::annotation_repo::{AnnotationRepository, RepoResult};
use crate::service::payload::{link_from_json, new_annotation_from_json, new_category_from_json};
use log::{debug, info, warn};
use serde_json::Value;

/// Use-case service wrapper for annotation/category operations.
pub struct AnnotationService<R: AnnotationRepository> {
    repo: R,
}

impl<R: AnnotationRepository> AnnotationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one annotation and returns its id.
    ///
    /// # Errors
    /// - `RepoError::Validation(MissingTitle)` for an empty title.
    /// - `RepoError::Db` for engine failures.
    pub fn create_annotation(&self, annotation: &NewAnnotation) -> RepoResult<AnnotationId> {
        if let Err(err) = annotation.validate() {
            debug!("event=annotation_create module=service status=rejected reason={err}");
            return Err(err.into());
        }

        let id = self.repo.create_annotation(annotation).inspect_err(|err| {
            warn!("event=annotation_create module=service status=error error={err}");
        })?;
        info!(
            "event=annotation_create module=service status=ok annotation_id={id} has_text={} has_file={}",
            annotation.text.is_some(),
            annotation.file.is_some()
        );
        Ok(id)
    }

    /// Creates one category and returns its id.
    pub fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId> {
        if let Err(err) = category.validate() {
            debug!("event=category_create module=service status=rejected reason={err}");
            return Err(err.into());
        }

        let id = self.repo.create_category(category).inspect_err(|err| {
            warn!("event=category_create module=service status=error error={err}");
        })?;
        info!("event=category_create module=service status=ok category_id={id}");
        Ok(id)
    }

    /// Links one category to one annotation.
    ///
    /// Referenced rows are not looked up first; a dangling id fails with
    /// the engine's foreign key error.
    pub fn add_category(
        &self,
        annotation_id: AnnotationId,
        category_id: CategoryId,
    ) -> RepoResult<()> {
        let link = AnnotationCategoryLink::new(annotation_id, category_id);
        self.link(&link)
    }

    /// Returns one page of annotations ranked by last modification.
    ///
    /// See [`crate::model::page::Paging::Legacy`] for the default offset
    /// arithmetic.
    pub fn get_annotations(&self, page: i64, limit: i64) -> RepoResult<Vec<AnnotationRecord>> {
        self.get_annotations_with(&PageRequest::new(page, limit))
    }

    /// Same as [`Self::get_annotations`] with explicit paging mode.
    pub fn get_annotations_with(&self, request: &PageRequest) -> RepoResult<Vec<AnnotationRecord>> {
        let window = match request.window() {
            Ok(window) => window,
            Err(err) => {
                debug!("event=annotation_page module=service status=rejected reason={err}");
                return Err(err.into());
            }
        };

        let rows = self.repo.get_annotations(request).inspect_err(|err| {
            warn!("event=annotation_page module=service status=error error={err}");
        })?;
        debug!(
            "event=annotation_page module=service status=ok page={} limit={} start={} end={} rows={}",
            request.page,
            request.limit,
            window.start,
            window.end,
            rows.len()
        );
        Ok(rows)
    }

    /// Lists every category sorted by name.
    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.repo.list_categories()
    }

    /// Counts stored annotations.
    pub fn count_annotations(&self) -> RepoResult<i64> {
        self.repo.count_annotations()
    }

    /// Creates an annotation from a loosely typed host payload.
    pub fn create_annotation_from_json(&self, payload: &Value) -> RepoResult<AnnotationId> {
        let annotation = new_annotation_from_json(payload).inspect_err(|err| {
            debug!("event=annotation_create module=service status=rejected reason={err}");
        })?;
        self.create_annotation(&annotation)
    }

    /// Creates a category from a loosely typed host payload.
    pub fn create_category_from_json(&self, payload: &Value) -> RepoResult<CategoryId> {
        let category = new_category_from_json(payload).inspect_err(|err| {
            debug!("event=category_create module=service status=rejected reason={err}");
        })?;
        self.create_category(&category)
    }

    /// Links a category using loosely typed host ids.
    pub fn add_category_from_json(
        &self,
        annotation_id: &Value,
        category_id: &Value,
    ) -> RepoResult<()> {
        let link = link_from_json(annotation_id, category_id).inspect_err(|err| {
            debug!("event=category_link module=service status=rejected reason={err}");
        })?;
        self.link(&link)
    }

    fn link(&self, link: &AnnotationCategoryLink) -> RepoResult<()> {
        if let Err(err) = link.validate() {
            debug!("event=category_link module=service status=rejected reason={err}");
            return Err(err.into());
        }

        self.repo.add_category(link).inspect_err(|err| {
            warn!(
                "event=category_link module=service status=error annotation_id={} category_id={} error={err}",
                link.annotation_id, link.category_id
            );
        })?;
        info!(
            "event=category_link module=service status=ok annotation_id={} category_id={}",
            link.annotation_id, link.category_id
        );
        Ok(())
    }
}
