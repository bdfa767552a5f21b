//! Annotation/category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Insert annotations, categories and their links with bound parameters.
//! - Produce ranked annotation pages with aggregated category arrays.
//!
//! # Invariants
//! - Pages are ranked by `last_modify DESC, id DESC`.
//! - Link inserts do not check referenced rows; foreign keys do.
//! - Malformed category aggregates are reported as `InvalidData`.

use crate::db::DbError;
use crate::model::annotation::{AnnotationId, AnnotationRecord, NewAnnotation};
use crate::model::category::{
    AnnotationCategoryLink, Category, CategoryId, CategorySummary, NewCategory,
};
use crate::model::page::PageRequest;
use crate::model::validation::ValidationError;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Exclusive upper bound (`line_num < end`), so `(1, 10)` yields rows 1 through 10;
/// see [`Paging::Legacy`](crate::model::page::Paging::Legacy) for the start offset.
const ANNOTATION_PAGE_SQL: &str = "WITH ranked_annotations AS (
    SELECT
        a.id,
        a.title,
        a.text,
        a.file,
        a.last_modify,
        a.create_at,
        JSON_GROUP_ARRAY(
            JSON_OBJECT(
                'id', c.id,
                'name', c.name,
                'description', c.description
            )
        ) AS categories,
        ROW_NUMBER() OVER (ORDER BY a.last_modify DESC, a.id DESC) AS line_num
    FROM annotations a
    LEFT JOIN annotations_categories ac ON a.id = ac.annotation_id
    LEFT JOIN categories c ON ac.category_id = c.id
    GROUP BY a.id, a.title, a.text, a.file, a.last_modify, a.create_at
)
SELECT
    id,
    title,
    text,
    file,
    last_modify,
    create_at,
    categories,
    line_num
FROM ranked_annotations
WHERE line_num >= ?1 AND line_num < ?2
ORDER BY line_num ASC;";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "annotations",
        &["id", "title", "text", "file", "last_modify", "create_at"],
    ),
    ("categories", &["id", "name", "description"]),
    ("annotations_categories", &["annotation_id", "category_id"]),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for annotation/category persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted annotation data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for annotation/category operations.
pub trait AnnotationRepository {
    /// Inserts one annotation and returns its engine-assigned id.
    fn create_annotation(&self, annotation: &NewAnnotation) -> RepoResult<AnnotationId>;
    /// Inserts one category and returns its engine-assigned id.
    fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId>;
    /// Inserts one annotation/category join row.
    fn add_category(&self, link: &AnnotationCategoryLink) -> RepoResult<()>;
    /// Returns one ranked page of annotations with their categories.
    fn get_annotations(&self, request: &PageRequest) -> RepoResult<Vec<AnnotationRecord>>;
    /// Returns every category sorted by name.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Returns the number of stored annotations.
    fn count_annotations(&self) -> RepoResult<i64>;
}

/// SQLite-backed annotation repository.
pub struct SqliteAnnotationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAnnotationRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not match what the queries expect.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Skips schema checks for a connection already accepted by `try_new`.
    pub(crate) fn assume_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AnnotationRepository for SqliteAnnotationRepository<'_> {
    fn create_annotation(&self, annotation: &NewAnnotation) -> RepoResult<AnnotationId> {
        annotation.validate()?;

        self.conn.execute(
            "INSERT INTO annotations (title, file, text) VALUES (?1, ?2, ?3);",
            params![
                annotation.title.as_str(),
                annotation.file.as_deref(),
                annotation.text.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId> {
        category.validate()?;

        self.conn.execute(
            "INSERT INTO categories (name, description) VALUES (?1, ?2);",
            params![category.name.as_str(), category.description.as_deref()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn add_category(&self, link: &AnnotationCategoryLink) -> RepoResult<()> {
        link.validate()?;

        self.conn.execute(
            "INSERT INTO annotations_categories (annotation_id, category_id) VALUES (?1, ?2);",
            params![link.annotation_id, link.category_id],
        )?;

        Ok(())
    }

    fn get_annotations(&self, request: &PageRequest) -> RepoResult<Vec<AnnotationRecord>> {
        let window = request.window()?;

        let mut stmt = self.conn.prepare(ANNOTATION_PAGE_SQL)?;
        let mut rows = stmt.query(params![window.start, window.end])?;
        let mut annotations = Vec::new();
        while let Some(row) = rows.next()? {
            annotations.push(parse_annotation_row(row)?);
        }

        Ok(annotations)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description
             FROM categories
             ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(Category {
                id: row.get("id")?,
                name: row.get("name")?,
                description: row.get("description")?,
            });
        }
        Ok(categories)
    }

    fn count_annotations(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM annotations;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_annotation_row(row: &Row<'_>) -> RepoResult<AnnotationRecord> {
    let id: AnnotationId = row.get("id")?;
    let categories_json: String = row.get("categories")?;
    let categories =
        serde_json::from_str::<Vec<CategorySummary>>(&categories_json).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid categories aggregate for annotation {id}: {err}"
            ))
        })?;

    Ok(AnnotationRecord {
        id,
        title: row.get("title")?,
        text: row.get("text")?,
        file: row.get("file")?,
        last_modify: row.get("last_modify")?,
        create_at: row.get("create_at")?,
        line_num: row.get("line_num")?,
        categories,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
