//! SQLite storage bootstrap entry points.
//!
//! # Responsibility
//! - Open and configure the scanner client SQLite connection.
//! - Apply the `tables.sql` definitions file statement by statement.
//!
//! # Invariants
//! - Schema statements run in file order and are expected to be idempotent.
//! - A failing statement halts the bootstrap; earlier statements stay applied.
//! - No retries: store and filesystem errors surface unchanged.

use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod open;

pub use open::{apply_schema, open_db, open_db_in_memory, write_bundled_schema};

/// Default database filename inside `DbCoordinates::db_dir`.
pub const SQLITE_FILE: &str = "PiScanDB.sqlite";

/// Fixed schema definitions filename inside `DbCoordinates::tables_dir`.
pub const TABLE_SQL_DEFINITIONS: &str = "tables.sql";

/// Statement separator used by the schema definitions file.
pub const STATEMENT_DELIMITER: char = ';';

/// Schema shipped with the crate, defining `account` and `product`.
pub const BUNDLED_TABLES_SQL: &str = include_str!("schema/tables.sql");

pub type DbResult<T> = Result<T, DbError>;

/// Where the database file and its schema definitions live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DbCoordinates {
    /// Directory holding the database file.
    pub db_dir: PathBuf,
    /// Database filename, `PiScanDB.sqlite` when omitted.
    #[serde(default = "default_db_file")]
    pub db_file: String,
    /// Directory holding `tables.sql`.
    pub tables_dir: PathBuf,
}

impl DbCoordinates {
    /// Coordinates using the default database filename.
    pub fn new(db_dir: impl Into<PathBuf>, tables_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_dir: db_dir.into(),
            db_file: default_db_file(),
            tables_dir: tables_dir.into(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join(&self.db_file)
    }

    pub fn tables_path(&self) -> PathBuf {
        self.tables_dir.join(TABLE_SQL_DEFINITIONS)
    }
}

fn default_db_file() -> String {
    SQLITE_FILE.to_string()
}

#[derive(Debug)]
pub enum DbError {
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    SchemaRead {
        path: PathBuf,
        source: io::Error,
    },
    SchemaStatement {
        /// Zero-based position of the failing statement in the file.
        index: usize,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open database `{}`: {source}", path.display())
            }
            Self::SchemaRead { path, source } => write!(
                f,
                "failed to read schema definitions `{}`: {source}",
                path.display()
            ),
            Self::SchemaStatement { index, source } => {
                write!(f, "schema statement #{index} failed: {source}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::SchemaRead { source, .. } => Some(source),
            Self::SchemaStatement { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Failed bootstrap, carrying the connection when one was opened.
///
/// A schema read or statement failure leaves an open connection whose schema
/// may be incomplete; callers decide whether it is still usable.
#[derive(Debug)]
pub struct BootstrapError {
    pub error: DbError,
    pub connection: Option<Connection>,
}

impl BootstrapError {
    pub(crate) fn without_connection(error: DbError) -> Self {
        Self {
            error,
            connection: None,
        }
    }

    pub(crate) fn with_connection(error: DbError, connection: Connection) -> Self {
        Self {
            error,
            connection: Some(connection),
        }
    }

    pub fn into_parts(self) -> (DbError, Option<Connection>) {
        (self.error, self.connection)
    }
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}
