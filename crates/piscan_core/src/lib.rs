//! Local storage core for the PiScan barcode client.
//! Owns the SQLite schema bootstrap plus account and scanned item persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{
    apply_schema, open_db, open_db_in_memory, write_bundled_schema, BootstrapError,
    DbCoordinates, DbError, DbResult,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountId, ANONYMOUS_API_CODE, ANONYMOUS_EMAIL};
pub use model::item::{Item, ItemId, NewItem};
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::{RepoError, RepoResult};
pub use service::scan_service::ScanService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
