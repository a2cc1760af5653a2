//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Load `tables.sql`, split it on `;` and execute each statement in order.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - A statement failure stops execution; later statements never run.

use super::{
    BootstrapError, DbCoordinates, DbError, DbResult, BUNDLED_TABLES_SQL, STATEMENT_DELIMITER,
    TABLE_SQL_DEFINITIONS,
};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Opens (creating if absent) the database file and applies `tables.sql`.
///
/// # Errors
/// - Open failure: no connection is returned.
/// - Schema read or statement failure: the opened connection is returned
///   alongside the error, with every earlier statement already applied.
pub fn open_db(coords: &DbCoordinates) -> Result<Connection, BootstrapError> {
    let started_at = Instant::now();
    let db_path = coords.db_path();
    info!("event=db_open module=db status=start mode=file");

    let conn = match Connection::open(&db_path) {
        Ok(conn) => conn,
        Err(source) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                source
            );
            return Err(BootstrapError::without_connection(DbError::Open {
                path: db_path,
                source,
            }));
        }
    };

    if let Err(err) = enable_foreign_keys(&conn) {
        return Err(log_bootstrap_failure(started_at, err, conn));
    }

    let tables_path = coords.tables_path();
    let schema_sql = match std::fs::read_to_string(&tables_path) {
        Ok(content) => content,
        Err(source) => {
            let err = DbError::SchemaRead {
                path: tables_path,
                source,
            };
            return Err(log_bootstrap_failure(started_at, err, conn));
        }
    };

    match apply_schema(&conn, &schema_sql) {
        Ok(_) => {
            info!(
                "event=db_open module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => Err(log_bootstrap_failure(started_at, err, conn)),
    }
}

/// Opens an in-memory SQLite database and applies `schema_sql` to it.
pub fn open_db_in_memory(schema_sql: &str) -> DbResult<Connection> {
    info!("event=db_open module=db status=start mode=memory");
    let conn = Connection::open_in_memory()?;
    enable_foreign_keys(&conn)?;
    apply_schema(&conn, schema_sql)?;
    info!("event=db_open module=db status=ok mode=memory");
    Ok(conn)
}

/// Splits `schema_sql` on `;` and executes every non-blank statement in order.
///
/// Returns the number of statements executed. The first failure is returned
/// as [`DbError::SchemaStatement`] carrying the statement's position; nothing
/// is rolled back.
pub fn apply_schema(conn: &Connection, schema_sql: &str) -> DbResult<usize> {
    let mut executed = 0;
    for (index, statement) in schema_sql.split(STATEMENT_DELIMITER).enumerate() {
        if statement.trim().is_empty() {
            continue;
        }

        conn.execute_batch(statement)
            .map_err(|source| DbError::SchemaStatement { index, source })?;
        executed += 1;
    }

    debug!("event=schema_apply module=db status=ok statements={executed}");
    Ok(executed)
}

/// Writes the crate's bundled `tables.sql` into `dir`, returning its path.
pub fn write_bundled_schema(dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = dir.as_ref().join(TABLE_SQL_DEFINITIONS);
    std::fs::write(&path, BUNDLED_TABLES_SQL)?;
    Ok(path)
}

fn enable_foreign_keys(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

fn log_bootstrap_failure(started_at: Instant, err: DbError, conn: Connection) -> BootstrapError {
    error!(
        "event=db_open module=db status=error mode=file duration_ms={} error_code=db_bootstrap_failed error={}",
        started_at.elapsed().as_millis(),
        err
    );
    BootstrapError::with_connection(err, conn)
}

#[cfg(test)]
mod tests {
    use super::apply_schema;
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn apply_schema_skips_blank_fragments() {
        let conn = Connection::open_in_memory().unwrap();
        let executed = apply_schema(
            &conn,
            "CREATE TABLE a (id INTEGER);\n\n;  ;CREATE TABLE b (id INTEGER);\n",
        )
        .unwrap();
        assert_eq!(executed, 2);
    }

    #[test]
    fn apply_schema_reports_position_of_failing_statement() {
        let conn = Connection::open_in_memory().unwrap();
        let err = apply_schema(&conn, "CREATE TABLE a (id INTEGER); CREATE TABLEX b").unwrap_err();
        assert!(matches!(err, DbError::SchemaStatement { index: 1, .. }));
    }
}
