//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start a rolling file logger for the scanner client once per process.
//! - Keep library events metadata-only (`event=... module=... status=...`).
//!
//! # Invariants
//! - Initialization is idempotent for an identical level and directory.
//! - A conflicting re-initialization is rejected, never applied.
//! - Emails and API codes never appear in log lines.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "piscan";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn ensure_matches(&self, level: &str, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "logging already writes to `{}`; cannot move it to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already runs at `{}`; cannot change it to `{level}`",
                self.level
            ));
        }
        Ok(())
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - Unknown level, empty or relative directory.
/// - Directory creation or logger backend failure.
/// - A logger is already running with a different level or directory.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let log_dir = parse_log_dir(log_dir)?;

    if let Some(active) = ACTIVE_LOGGER.get() {
        return active.ensure_matches(level, &log_dir);
    }

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(level, log_dir.clone()))?;
    active.ensure_matches(level, &log_dir)
}

/// Returns `(level, log_dir)` of the running logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: PathBuf) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&log_dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", log_dir.display()))?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    info!(
        "event=logging_init module=core status=ok level={} version={}",
        level,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir,
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<&'static str, String> {
    let normalized = level.trim().to_ascii_lowercase();
    let parsed = match normalized.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => {
            return Err(format!(
                "unsupported log level `{normalized}`; expected trace|debug|info|warn|error"
            ))
        }
    };
    Ok(parsed)
}

fn parse_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let path = Path::new(log_dir.trim());
    if path.as_os_str().is_empty() {
        return Err("log directory cannot be empty".to_string());
    }
    if !path.is_absolute() {
        return Err(format!(
            "log directory must be absolute, got `{}`",
            path.display()
        ));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, parse_level, parse_log_dir};

    #[test]
    fn parse_level_is_case_and_alias_tolerant() {
        assert_eq!(parse_level(" DEBUG ").unwrap(), "debug");
        assert_eq!(parse_level("Warning").unwrap(), "warn");
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn parse_log_dir_requires_absolute_path() {
        assert!(parse_log_dir("").is_err());
        assert!(parse_log_dir("logs").unwrap_err().contains("absolute"));
    }

    #[test]
    fn repeated_init_is_idempotent_and_conflicts_are_rejected() {
        // The logger outlives the test, so its directory is kept on disk.
        let first = tempfile::tempdir().unwrap().keep();
        let other = tempfile::tempdir().unwrap();
        let first_dir = first.to_str().unwrap().to_string();
        let other_dir = other.path().to_str().unwrap().to_string();

        init_logging("info", &first_dir).unwrap();
        init_logging("INFO", &first_dir).unwrap();

        assert!(init_logging("debug", &first_dir)
            .unwrap_err()
            .contains("cannot change"));
        assert!(init_logging("info", &other_dir)
            .unwrap_err()
            .contains("cannot move"));

        let (level, dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(dir, first);
    }
}
