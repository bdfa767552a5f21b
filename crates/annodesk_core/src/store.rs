//! Process-wide annotation data access.
//!
//! # Responsibility
//! - Lazily open one shared database handle from host configuration.
//! - Expose create/link/page operations on that handle.
//!
//! # Invariants
//! - The shared handle is set at most once and never torn down.
//! - A failed `init` leaves the module uninitialized; a later call may retry.
//! - Operations before `init` fail with `StoreError::NotInitialized`.
//! - One engine round trip at a time per handle (`rusqlite::Connection` is
//!   not `Sync`); callers needing ordering across calls must serialize.

use crate::config::{ConfigError, ConfigProvider};
use crate::db::{open_db_url, DbError};
use crate::model::annotation::{AnnotationId, AnnotationRecord, NewAnnotation};
use crate::model::category::{Category, CategoryId, NewCategory};
use crate::model::page::PageRequest;
use crate::model::validation::ValidationError;
use crate::repo::annotation_repo::{RepoError, RepoResult, SqliteAnnotationRepository};
use crate::service::annotation_service::AnnotationService;
use log::{error, info};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;
use std::time::Instant;

static STORE: OnceCell<AnnotationStore> = OnceCell::new();

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    NotInitialized,
    Config(ConfigError),
    Repo(RepoError),
    Poisoned,
}

impl StoreError {
    /// Returns the validation failure carried by this error, if any.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Repo(RepoError::Validation(err)) => Some(err),
            _ => None,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "annotation store is not initialized"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "annotation store connection lock is poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotInitialized | Self::Poisoned => None,
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Repo(RepoError::Validation(value))
    }
}

/// One shared connection plus the operations the host calls on it.
pub struct AnnotationStore {
    conn: Mutex<Connection>,
}

impl AnnotationStore {
    /// Opens and migrates the database `db_url` points to.
    pub fn open(db_url: &str) -> StoreResult<Self> {
        let conn = open_db_url(db_url)?;
        Self::from_connection(conn)
    }

    /// Wraps an already migrated connection.
    ///
    /// # Errors
    /// - `RepoError::MissingRequiredTable`/`MissingRequiredColumn` when the
    ///   schema does not match.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        SqliteAnnotationRepository::try_new(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn create_annotation(&self, annotation: &NewAnnotation) -> StoreResult<AnnotationId> {
        self.with_service(|service| service.create_annotation(annotation))
    }

    pub fn create_category(&self, category: &NewCategory) -> StoreResult<CategoryId> {
        self.with_service(|service| service.create_category(category))
    }

    pub fn add_category(
        &self,
        annotation_id: AnnotationId,
        category_id: CategoryId,
    ) -> StoreResult<()> {
        self.with_service(|service| service.add_category(annotation_id, category_id))
    }

    pub fn get_annotations(&self, page: i64, limit: i64) -> StoreResult<Vec<AnnotationRecord>> {
        self.with_service(|service| service.get_annotations(page, limit))
    }

    pub fn get_annotations_with(
        &self,
        request: &PageRequest,
    ) -> StoreResult<Vec<AnnotationRecord>> {
        self.with_service(|service| service.get_annotations_with(request))
    }

    pub fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.with_service(|service| service.list_categories())
    }

    pub fn count_annotations(&self) -> StoreResult<i64> {
        self.with_service(|service| service.count_annotations())
    }

    pub fn create_annotation_from_json(&self, payload: &Value) -> StoreResult<AnnotationId> {
        self.with_service(|service| service.create_annotation_from_json(payload))
    }

    pub fn create_category_from_json(&self, payload: &Value) -> StoreResult<CategoryId> {
        self.with_service(|service| service.create_category_from_json(payload))
    }

    pub fn add_category_from_json(
        &self,
        annotation_id: &Value,
        category_id: &Value,
    ) -> StoreResult<()> {
        self.with_service(|service| service.add_category_from_json(annotation_id, category_id))
    }

    fn with_service<T>(
        &self,
        f: impl FnOnce(&AnnotationService<SqliteAnnotationRepository<'_>>) -> RepoResult<T>,
    ) -> StoreResult<T> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        // Schema was checked in `from_connection`.
        let service = AnnotationService::new(SqliteAnnotationRepository::assume_ready(&conn));
        Ok(f(&service)?)
    }
}

/// Initializes the shared store from host configuration.
///
/// Returns immediately when already initialized; the provider is not
/// consulted again.
///
/// # Errors
/// - `StoreError::Config` when the provider fails.
/// - `StoreError::Repo` when the database cannot be opened or migrated.
pub fn init(provider: &dyn ConfigProvider) -> StoreResult<&'static AnnotationStore> {
    if let Some(store) = STORE.get() {
        return Ok(store);
    }

    STORE.get_or_try_init(|| {
        let started_at = Instant::now();
        info!("event=store_init module=store status=start");
        let opened = provider
            .fetch_config()
            .map_err(StoreError::from)
            .and_then(|config| AnnotationStore::open(&config.db_url));
        match &opened {
            Ok(_) => info!(
                "event=store_init module=store status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_init module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        opened
    })
}

/// Whether [`init`] has completed successfully in this process.
pub fn is_initialized() -> bool {
    STORE.get().is_some()
}

/// Returns the shared store.
pub fn store() -> StoreResult<&'static AnnotationStore> {
    STORE.get().ok_or(StoreError::NotInitialized)
}

/// Creates an annotation on the shared store.
pub fn create_annotation(annotation: &NewAnnotation) -> StoreResult<AnnotationId> {
    store()?.create_annotation(annotation)
}

/// Creates a category on the shared store.
pub fn create_category(category: &NewCategory) -> StoreResult<CategoryId> {
    store()?.create_category(category)
}

/// Links a category to an annotation on the shared store.
pub fn add_category(annotation_id: AnnotationId, category_id: CategoryId) -> StoreResult<()> {
    store()?.add_category(annotation_id, category_id)
}

/// Reads one annotation page from the shared store.
pub fn get_annotations(page: i64, limit: i64) -> StoreResult<Vec<AnnotationRecord>> {
    store()?.get_annotations(page, limit)
}
