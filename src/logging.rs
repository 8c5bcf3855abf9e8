use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, DEFAULT_LOG_FILTER};

/// Install the file logger.
///
/// Stdout belongs to the TUI, so events go to `fm.log` in the log
/// directory. Returns `false` (logging off) when there is no usable
/// directory; startup never fails because of logging.
pub fn init(config: &AppConfig) -> bool {
    let Some(dir) = config.log_dir.as_deref() else {
        return false;
    };
    let Some(appender) = file_appender(dir) else {
        return false;
    };

    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(dir = %dir.display(), "logging started");
    }
    installed
}

fn file_appender(dir: &Path) -> Option<RollingFileAppender> {
    fs::create_dir_all(dir).ok()?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("fm")
        .filename_suffix("log")
        .build(dir)
        .ok()
}
