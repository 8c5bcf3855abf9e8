//! Runtime configuration: built-in defaults, CLI flags, and environment.
//!
//! There is no configuration file. Resolution order:
//! 1. CLI flags (`--cd [FILE]`)
//! 2. Environment: `$FM_LOG` (log filter) and `$FM_LOG_DIR` (log directory)
//! 3. Built-in defaults below

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};

// ── Default constants ────────────────────────────────────────────────────────

/// How long a status message stays on screen.
pub const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);
/// Event loop tick rate (status expiry only).
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(100);
/// Per-item errors shown in one status message before truncation.
pub const MAX_REPORTED_ERRORS: usize = 3;
/// Maximum length of a typed file name or search query.
pub const MAX_NAME_LEN: usize = 50;
/// Maximum length of a typed extension filter.
pub const MAX_EXTENSION_LEN: usize = 20;
/// Files larger than this are refused by the previewer (1 MiB).
pub const PREVIEW_MAX_FILE_BYTES: u64 = 1_048_576;
/// Number of leading bytes the previewer shows.
pub const PREVIEW_READ_BYTES: usize = 4096;
/// Default tracing filter when `$FM_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "FM_LOG";
/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "FM_LOG_DIR";

/// Where the final directory is reported on exit (shell `cd` integration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitDirTarget {
    /// `--cd FILE`: write into a caller-chosen file.
    File(PathBuf),
    /// Bare `--cd`: create a temp file and announce its path on stdout.
    TempFile,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory shown on startup.
    pub start_dir: PathBuf,
    pub exit_dir: Option<ExitDirTarget>,
    pub log_dir: Option<PathBuf>,
    pub log_filter: String,
    pub status_timeout: Duration,
    pub tick_rate: Duration,
    pub max_reported_errors: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_dir: PathBuf::from("."),
            exit_dir: None,
            log_dir: default_log_dir(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            status_timeout: STATUS_MESSAGE_TIMEOUT,
            tick_rate: DEFAULT_TICK_RATE,
            max_reported_errors: MAX_REPORTED_ERRORS,
        }
    }
}

impl AppConfig {
    /// Build the configuration from the parsed `--cd` flag and the environment.
    ///
    /// `cd` is `None` when the flag is absent, `Some(None)` for a bare `--cd`.
    pub fn resolve(cd: Option<Option<PathBuf>>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let start_dir = cwd
            .canonicalize()
            .map_err(|_| AppError::InvalidPath(format!("{} does not exist", cwd.display())))?;

        let log_dir = std::env::var_os(LOG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(default_log_dir);
        let log_filter =
            std::env::var(LOG_FILTER_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            start_dir,
            exit_dir: exit_dir_target(cd),
            log_dir,
            log_filter,
            ..Self::default()
        })
    }
}

/// Map the raw `--cd` flag onto an exit target.
fn exit_dir_target(cd: Option<Option<PathBuf>>) -> Option<ExitDirTarget> {
    match cd {
        None => None,
        Some(Some(path)) => Some(ExitDirTarget::File(path)),
        Some(None) => Some(ExitDirTarget::TempFile),
    }
}

/// `~/.cache/fm` (or the platform equivalent).
fn default_log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("fm"))
}
