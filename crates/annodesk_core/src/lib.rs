//! Core data access for AnnoDesk annotations and categories.
//! This crate is the single source of truth for storage invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{
    AppConfig, ConfigError, ConfigProvider, ConfigResult, EnvConfigProvider,
    JsonFileConfigProvider, StaticConfigProvider,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::annotation::{AnnotationId, AnnotationRecord, NewAnnotation};
pub use model::category::{
    AnnotationCategoryLink, Category, CategoryId, CategorySummary, NewCategory,
};
pub use model::page::{PageRequest, Paging, RowWindow, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use model::validation::ValidationError;
pub use repo::annotation_repo::{
    AnnotationRepository, RepoError, RepoResult, SqliteAnnotationRepository,
};
pub use service::annotation_service::AnnotationService;
pub use store::{AnnotationStore, StoreError, StoreResult};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
