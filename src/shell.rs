//! Shell `cd` integration: report the final directory on exit.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ExitDirTarget;
use crate::error::Result;

/// Turn the configured target into a concrete file.
///
/// A bare `--cd` creates a persistent temp file; its path is returned so
/// the caller can print it for the wrapper script before the UI starts.
pub fn prepare_exit_file(target: &ExitDirTarget) -> Result<PathBuf> {
    match target {
        ExitDirTarget::File(path) => Ok(path.clone()),
        ExitDirTarget::TempFile => {
            let file = tempfile::Builder::new()
                .prefix("fm")
                .suffix(".filemanager")
                .tempfile()?;
            let (_, path) = file.keep().map_err(|e| e.error)?;
            Ok(path)
        }
    }
}

/// Write `dir` into `file` as the bare path, no trailing newline.
///
/// A failure is logged and otherwise ignored; quitting always succeeds.
pub fn write_exit_dir(file: &Path, dir: &Path) {
    match fs::write(file, dir.as_os_str().as_encoded_bytes()) {
        Ok(()) => info!(file = %file.display(), dir = %dir.display(), "wrote exit directory"),
        Err(e) => warn!(file = %file.display(), error = %e, "cannot write exit directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_file_is_used_as_is() {
        let target = ExitDirTarget::File(PathBuf::from("/tmp/lastdir"));
        assert_eq!(prepare_exit_file(&target).unwrap(), PathBuf::from("/tmp/lastdir"));
    }

    #[test]
    fn temp_file_target_creates_named_file() {
        let path = prepare_exit_file(&ExitDirTarget::TempFile).unwrap();
        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with(".filemanager"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn writes_literal_path_without_newline() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("cd.out");
        write_exit_dir(&out, Path::new("/home/user/projects"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "/home/user/projects");
    }

    #[test]
    fn write_failure_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("missing").join("cd.out");
        write_exit_dir(&out, Path::new("/"));
        assert!(!out.exists());
    }
}
