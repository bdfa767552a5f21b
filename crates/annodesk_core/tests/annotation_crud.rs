use annodesk_core::db::{open_db_in_memory, DbError};
use annodesk_core::{
    AnnotationService, NewAnnotation, NewCategory, RepoError, SqliteAnnotationRepository,
    ValidationError,
};
use rusqlite::{Connection, ErrorCode};
use serde_json::json;

#[test]
fn create_annotation_persists_row_with_engine_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());

    let id = service
        .create_annotation(
            &NewAnnotation::new("Chapter 1")
                .with_text("opening lines")
                .with_file("books/novel.epub"),
        )
        .unwrap();
    assert!(id > 0);

    let (title, text, file, create_at, last_modify): (
        String,
        Option<String>,
        Option<String>,
        i64,
        i64,
    ) = conn
        .query_row(
            "SELECT title, text, file, create_at, last_modify FROM annotations WHERE id = ?1",
            [id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )
        .unwrap();
    assert_eq!(title, "Chapter 1");
    assert_eq!(text.as_deref(), Some("opening lines"));
    assert_eq!(file.as_deref(), Some("books/novel.epub"));
    assert!(create_at > 0);
    assert!(last_modify >= create_at);
}

#[test]
fn create_annotation_without_title_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());

    let err = service
        .create_annotation(&NewAnnotation::new("").with_text("orphan body"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingTitle)
    ));
    assert_eq!(row_count(&conn, "annotations"), 0);
}

#[test]
fn create_annotation_from_json_rejects_non_text_file() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());

    let err = service
        .create_annotation_from_json(&json!({"title": "scan", "file": {"path": "a.png"}}))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidField { field: "file", .. })
    ));
    assert_eq!(row_count(&conn, "annotations"), 0);

    let id = service
        .create_annotation_from_json(&json!({"title": "scan", "file": "a.png"}))
        .unwrap();
    assert_eq!(service.count_annotations().unwrap(), 1);
    assert!(id > 0);
}

#[test]
fn create_category_requires_name() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());

    let err = service
        .create_category(&NewCategory::new("").with_description("no name"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingName)
    ));

    let id = service
        .create_category(&NewCategory::new("Research").with_description("papers"))
        .unwrap();
    let categories = service.list_categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, id);
    assert_eq!(categories[0].name, "Research");
    assert_eq!(categories[0].description.as_deref(), Some("papers"));
}

#[test]
fn whitespace_title_and_name_are_stored_as_given() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());

    let annotation_id = service.create_annotation(&NewAnnotation::new("   ")).unwrap();
    let category_id = service.create_category(&NewCategory::new(" ")).unwrap();
    service
        .create_annotation_from_json(&json!({"title": "\t"}))
        .unwrap();

    let title: String = conn
        .query_row(
            "SELECT title FROM annotations WHERE id = ?1;",
            [annotation_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(title, "   ");
    let categories = service.list_categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, category_id);
    assert_eq!(categories[0].name, " ");
    assert_eq!(row_count(&conn, "annotations"), 2);
}

#[test]
fn list_categories_sorts_by_name_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());
    for name in ["beta", "Alpha", "gamma"] {
        service.create_category(&NewCategory::new(name)).unwrap();
    }

    let names = service
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
}

#[test]
fn add_category_creates_exactly_one_join_row() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());
    let annotation_id = service
        .create_annotation(&NewAnnotation::new("linked"))
        .unwrap();
    let category_id = service.create_category(&NewCategory::new("tag")).unwrap();

    service.add_category(annotation_id, category_id).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM annotations_categories
             WHERE annotation_id = ?1 AND category_id = ?2",
            [annotation_id, category_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(row_count(&conn, "annotations_categories"), 1);
}

#[test]
fn add_category_rejects_non_positive_and_non_integer_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());

    for (annotation_id, category_id) in [(0, 1), (1, 0), (-4, 2), (3, -1)] {
        let err = service.add_category(annotation_id, category_id).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ValidationError::NonPositiveId { .. })
        ));
    }

    let err = service
        .add_category_from_json(&json!(1.25), &json!(1))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonPositiveId {
            field: "annotationId",
            ..
        })
    ));
    assert_eq!(row_count(&conn, "annotations_categories"), 0);
}

#[test]
fn add_category_with_missing_rows_surfaces_engine_constraint_error() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());

    let err = service.add_category(41, 42).unwrap_err();
    match err {
        RepoError::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(failure, _))) => {
            assert_eq!(failure.code, ErrorCode::ConstraintViolation);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn add_category_allows_duplicate_links() {
    let conn = open_db_in_memory().unwrap();
    let service = AnnotationService::new(SqliteAnnotationRepository::try_new(&conn).unwrap());
    let annotation_id = service.create_annotation(&NewAnnotation::new("dup")).unwrap();
    let category_id = service.create_category(&NewCategory::new("dup")).unwrap();

    service.add_category(annotation_id, category_id).unwrap();
    service.add_category(annotation_id, category_id).unwrap();

    assert_eq!(row_count(&conn, "annotations_categories"), 2);
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
