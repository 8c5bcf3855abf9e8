use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::error::{FsError, FsResult};

/// Opens files with the desktop's default handler.
pub trait Launcher {
    /// Fire-and-forget; only a failure to spawn is reported.
    fn open(&self, path: &Path) -> FsResult<()>;
}

/// Spawns the platform opener with detached stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &str = "xdg-open";

impl Launcher for SystemLauncher {
    fn open(&self, path: &Path) -> FsResult<()> {
        match spawn_detached(OPENER, path) {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to launch {}", OPENER);
                Err(FsError::Other(format!("{}: {}", OPENER, e)))
            }
        }
    }
}

/// Run `program path` with null stdio. A waiter thread reaps the child so
/// it never lingers as a zombie; its handle yields the exit status.
fn spawn_detached(program: &str, path: &Path) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();
    info!(path = %path.display(), pid, "launched default handler");

    let program = program.to_string();
    thread::Builder::new()
        .name("opener-reaper".into())
        .spawn(move || {
            let status = child.wait();
            match &status {
                Ok(status) => debug!(pid, %status, "{} exited", program),
                Err(e) => warn!(pid, error = %e, "cannot wait for {}", program),
            }
            status
        })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn detached_child_is_reaped() {
        let waiter = spawn_detached("true", Path::new("/")).unwrap();
        let status = waiter.join().unwrap().unwrap();
        assert!(status.success());
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        assert!(spawn_detached("fm-no-such-opener", Path::new("/")).is_err());
    }
}
