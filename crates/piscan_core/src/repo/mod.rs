//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define account and item data access contracts.
//! - Keep SQL details and row decoding inside the persistence boundary.
//!
//! # Invariants
//! - Every repository borrows an explicit connection; there is no shared one.
//! - Incomplete rows are skipped on read; mistyped rows are `InvalidData`.
//! - Store errors are returned unchanged, never retried.

use crate::db::DbError;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod item_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for account and item persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Insert rejected because the email is already registered.
    DuplicateEmail(String),
    /// The owning account has no store-assigned identity yet.
    UnpersistedAccount,
    /// A row could not be read back after a successful insert.
    MissingAfterInsert(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateEmail(_) => write!(f, "an account with this email already exists"),
            Self::UnpersistedAccount => write!(f, "account has not been stored yet"),
            Self::MissingAfterInsert(what) => write!(f, "{what} missing after insert"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateEmail(_)
            | Self::UnpersistedAccount
            | Self::MissingAfterInsert(_)
            | Self::InvalidData(_) => None,
        }
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

/// Outcome of decoding one result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowDecode<T> {
    Row(T),
    /// Row lacks a required field and is not a valid record.
    Skip(&'static str),
}

impl<T> RowDecode<T> {
    /// Returns the decoded record, logging skipped rows.
    pub(crate) fn into_row(self, table: &str) -> Option<T> {
        match self {
            Self::Row(value) => Some(value),
            Self::Skip(reason) => {
                debug!("event=row_skipped module=repo table={table} reason={reason}");
                None
            }
        }
    }
}

/// Reads a nullable text column. Only NULL is absent; `""` is a value.
pub(crate) fn optional_text(row: &rusqlite::Row<'_>, column: &str) -> RepoResult<Option<String>> {
    row.get(column).map_err(|err| decode_error(column, err))
}

pub(crate) fn decode_error(column: &str, err: rusqlite::Error) -> RepoError {
    match err {
        rusqlite::Error::InvalidColumnType(_, _, kind) => {
            RepoError::InvalidData(format!("unexpected {kind} value in column `{column}`"))
        }
        other => RepoError::from(other),
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
