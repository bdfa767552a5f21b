use annodesk_core::db::migrations::latest_version;
use annodesk_core::db::{open_db, open_db_in_memory, open_db_url, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "annotations");
    assert_table_exists(&conn, "categories");
    assert_table_exists(&conn, "annotations_categories");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annodesk.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO annotations (title) VALUES ('kept');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM annotations;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_db_url_resolves_plugin_style_file_urls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plugin.db");

    let conn = open_db_url(&format!("sqlite://{}", path.display())).unwrap();
    assert_table_exists(&conn, "annotations");
    drop(conn);
    assert!(path.exists());
}

#[test]
fn open_db_url_rejects_unknown_scheme() {
    let err = open_db_url("mysql://localhost/annotations").unwrap_err();
    assert!(matches!(err, DbError::InvalidConnectionString(_)));
}

#[test]
fn connections_enforce_foreign_keys_and_timestamp_order() {
    let conn = open_db_in_memory().unwrap();

    let fk_on: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk_on, 1);

    let err = conn
        .execute(
            "INSERT INTO annotations (title, create_at, last_modify) VALUES ('t', 2000, 1000);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK"));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
