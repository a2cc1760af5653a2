//! CLI smoke entry point.
//!
//! # Responsibility
//! - Bootstrap a database and resolve the anonymous account end to end.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `piscan_cli <db_dir> [tables_dir]`. Without `tables_dir` the bundled
//! schema is written next to the database first. `PISCAN_LOG_DIR` and
//! `PISCAN_LOG_LEVEL` enable file logging.

use log::info;
use piscan_core::{
    default_log_level, init_logging, open_db, write_bundled_schema, AccountRepository,
    DbCoordinates, ItemRepository, SqliteAccountRepository, SqliteItemRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("piscan_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("PISCAN_LOG_DIR") {
        let level = std::env::var("PISCAN_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let mut args = std::env::args_os().skip(1);
    let db_dir = PathBuf::from(args.next().ok_or("usage: piscan_cli <db_dir> [tables_dir]")?);
    let tables_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => {
            write_bundled_schema(&db_dir)?;
            db_dir.clone()
        }
    };

    let coords = DbCoordinates::new(db_dir, tables_dir);
    let conn = open_db(&coords)?;
    let accounts = SqliteAccountRepository::new(&conn);
    let anonymous = accounts.fetch_or_create_anonymous()?;
    let items = SqliteItemRepository::new(&conn).list_items(&anonymous)?;
    info!(
        "event=cli_smoke module=cli status=ok account_id={} items={}",
        anonymous.id,
        items.len()
    );

    println!("piscan_core version={}", piscan_core::core_version());
    println!("database={}", coords.db_path().display());
    println!("anonymous_account_id={}", anonymous.id);
    println!("anonymous_items={}", items.len());
    Ok(())
}
