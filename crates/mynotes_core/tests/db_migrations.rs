use mynotes_core::db::migrations::{latest_version, schema_version};
use mynotes_core::db::{open_db, open_db_in_memory, DbError, BUSY_TIMEOUT};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn open_db_in_memory_creates_notes_table_and_index() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_schema_object(&conn, "table", "notes");
    assert_schema_object(&conn, "index", "idx_notes_user_updated");
}

#[test]
fn reopening_a_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mynotes.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO notes (id, user_id, title, content) VALUES ('n1', 'u1', 't', 'c');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
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
fn failed_migration_names_the_step_and_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE notes (id TEXT PRIMARY KEY);")
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Migrate { version: 1, .. }));
    assert_eq!(err.error_code(), "db_migrate_failed");
    assert!(std::error::Error::source(&err).is_some());

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 0);
}

#[test]
fn missing_parent_directory_fails_at_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("mynotes.db");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Open { mode: "file", .. }));
    assert_eq!(err.error_code(), "db_open_failed");
}

#[test]
fn blank_user_id_is_rejected_by_schema() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO notes (id, user_id, title, content) VALUES ('n1', '   ', 't', 'c');",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn busy_timeout_is_five_seconds() {
    assert_eq!(BUSY_TIMEOUT, Duration::from_secs(5));
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
