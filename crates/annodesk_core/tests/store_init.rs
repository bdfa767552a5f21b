//! Process-wide store lifecycle.
//!
//! Everything runs inside one test: the shared handle is per process and
//! test functions in this binary would race on it.

use annodesk_core::store::{self, StoreError};
use annodesk_core::{
    AppConfig, ConfigError, ConfigProvider, ConfigResult, NewAnnotation, NewCategory,
    StaticConfigProvider, ValidationError,
};
use std::cell::Cell;

struct FailingProvider;

impl ConfigProvider for FailingProvider {
    fn fetch_config(&self) -> ConfigResult<AppConfig> {
        Err(ConfigError::MissingEnv("ANNODESK_DB_URL"))
    }
}

#[derive(Default)]
struct CountingProvider {
    fetches: Cell<u32>,
}

impl ConfigProvider for CountingProvider {
    fn fetch_config(&self) -> ConfigResult<AppConfig> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(AppConfig::new("sqlite::memory:"))
    }
}

#[test]
fn shared_store_lifecycle() {
    // Before init every operation reports the missing handle.
    assert!(!store::is_initialized());
    assert!(matches!(
        store::create_annotation(&NewAnnotation::new("early")),
        Err(StoreError::NotInitialized)
    ));
    assert!(matches!(
        store::get_annotations(1, 10),
        Err(StoreError::NotInitialized)
    ));

    // Failed config and unopenable URLs leave the module uninitialized.
    let err = store::init(&FailingProvider).err().unwrap();
    assert!(matches!(err, StoreError::Config(ConfigError::MissingEnv(_))));
    let err = store::init(&StaticConfigProvider::new("redis://cache"))
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::Repo(_)));
    assert!(!store::is_initialized());

    let provider = CountingProvider::default();
    let first = store::init(&provider).unwrap();
    let second = store::init(&provider).unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(provider.fetches.get(), 1);
    assert!(store::init(&FailingProvider).is_ok());

    let annotation_id = store::create_annotation(
        &NewAnnotation::new("from host")
            .with_text("body")
            .with_file("scan.png"),
    )
    .unwrap();
    let category_id = store::create_category(&NewCategory::new("inbox")).unwrap();
    store::add_category(annotation_id, category_id).unwrap();

    let err = store::create_category(&NewCategory::new("")).unwrap_err();
    assert_eq!(err.validation(), Some(&ValidationError::MissingName));
    let err = store::add_category(annotation_id, 0).unwrap_err();
    assert!(matches!(
        err.validation(),
        Some(ValidationError::NonPositiveId { .. })
    ));

    let rows = store::get_annotations(1, 10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, annotation_id);
    assert_eq!(rows[0].file.as_deref(), Some("scan.png"));
    assert_eq!(rows[0].categories.len(), 1);
    assert_eq!(rows[0].categories[0].name.as_deref(), Some("inbox"));

    let shared = store::store().unwrap();
    assert_eq!(shared.count_annotations().unwrap(), 1);
    assert_eq!(shared.list_categories().unwrap().len(), 1);
}
