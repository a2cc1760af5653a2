use piscan_core::db::{
    open_db, write_bundled_schema, DbCoordinates, DbError, BUNDLED_TABLES_SQL, SQLITE_FILE,
};
use rusqlite::Connection;
use std::path::Path;

#[test]
fn open_db_creates_file_and_bundled_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_bundled_schema(dir.path()).unwrap();

    let conn = open_db(&DbCoordinates::new(dir.path(), dir.path())).unwrap();

    assert!(dir.path().join(SQLITE_FILE).exists());
    assert_table_exists(&conn, "account");
    assert_table_exists(&conn, "product");
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_bundled_schema(dir.path()).unwrap();
    let coords = DbCoordinates::new(dir.path(), dir.path());

    let conn_first = open_db(&coords).unwrap();
    let schema_first = schema_snapshot(&conn_first);
    drop(conn_first);

    let conn_second = open_db(&coords).unwrap();
    assert_eq!(schema_snapshot(&conn_second), schema_first);
}

#[test]
fn missing_schema_file_returns_open_connection_with_error() {
    let db_dir = tempfile::tempdir().unwrap();
    let empty_tables_dir = tempfile::tempdir().unwrap();

    let err = open_db(&DbCoordinates::new(db_dir.path(), empty_tables_dir.path())).unwrap_err();
    let (error, connection) = err.into_parts();

    assert!(matches!(error, DbError::SchemaRead { .. }));
    let conn = connection.expect("connection should be handed back");
    conn.execute_batch("CREATE TABLE scratch (id INTEGER);")
        .unwrap();
}

#[test]
fn unopenable_database_returns_no_connection() {
    let dir = tempfile::tempdir().unwrap();
    write_bundled_schema(dir.path()).unwrap();
    let coords = DbCoordinates::new(dir.path().join("missing").join("nested"), dir.path());

    let err = open_db(&coords).unwrap_err();
    assert!(matches!(err.error, DbError::Open { .. }));
    assert!(err.connection.is_none());
}

#[test]
fn malformed_statement_halts_after_earlier_statements() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(
        dir.path(),
        "create table account (id integer primary key, email text, api_code text);
         create table product (id integer primary key, barcode text);
         create tabel broken (id integer)",
    );

    let err = open_db(&DbCoordinates::new(dir.path(), dir.path())).unwrap_err();
    let (error, connection) = err.into_parts();

    assert!(matches!(error, DbError::SchemaStatement { index: 2, .. }));
    let conn = connection.unwrap();
    assert_table_exists(&conn, "account");
    assert_table_exists(&conn, "product");
}

#[test]
fn custom_db_file_name_comes_from_configuration() {
    let dir = tempfile::tempdir().unwrap();
    write_bundled_schema(dir.path()).unwrap();
    let config = serde_json::json!({
        "db_dir": dir.path(),
        "db_file": "custom.sqlite",
        "tables_dir": dir.path(),
    });
    let coords: DbCoordinates = serde_json::from_value(config).unwrap();

    open_db(&coords).unwrap();
    assert!(dir.path().join("custom.sqlite").exists());
}

#[test]
fn db_file_defaults_when_omitted_from_configuration() {
    let coords: DbCoordinates =
        serde_json::from_str(r#"{"db_dir": "/data", "tables_dir": "/etc/piscan"}"#).unwrap();
    assert_eq!(coords.db_file, SQLITE_FILE);
}

#[test]
fn bundled_schema_is_idempotent_statement_list() {
    let conn = Connection::open_in_memory().unwrap();
    let first = piscan_core::apply_schema(&conn, BUNDLED_TABLES_SQL).unwrap();
    let second = piscan_core::apply_schema(&conn, BUNDLED_TABLES_SQL).unwrap();
    assert_eq!(first, 3);
    assert_eq!(second, first);
}

fn write_tables(dir: &Path, sql: &str) {
    std::fs::write(dir.join("tables.sql"), sql).unwrap();
}

fn schema_snapshot(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT sql FROM sqlite_master WHERE sql IS NOT NULL ORDER BY name;")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
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
