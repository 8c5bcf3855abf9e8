use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{FsError, FsResult};
use crate::fs::clipboard::ClipboardOp;

/// Filesystem mutations invoked by the browser.
///
/// Every call either succeeds or reports a typed [`FsError`]; none of them
/// panic or abort the caller's batch.
pub trait FileOps {
    /// Delete a file, symlink, or directory (recursively).
    fn delete(&self, path: &Path) -> FsResult<()>;
    /// Copy a file or directory (recursively) to the exact path `dst`.
    fn copy(&self, src: &Path, dst: &Path) -> FsResult<()>;
    /// Move `src` to the exact path `dst`.
    fn move_to(&self, src: &Path, dst: &Path) -> FsResult<()>;
    fn mkdir(&self, path: &Path) -> FsResult<()>;
    /// Create an empty file; fails if it already exists.
    fn touch(&self, path: &Path) -> FsResult<()>;
    /// Rename without overwriting an existing target.
    fn rename(&self, from: &Path, to: &Path) -> FsResult<()>;
}

/// [`FileOps`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileOps;

impl FileOps for LocalFileOps {
    fn delete(&self, path: &Path) -> FsResult<()> {
        // Symlinks are removed as links, never followed.
        let meta = fs::symlink_metadata(path)?;
        if meta.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn copy(&self, src: &Path, dst: &Path) -> FsResult<()> {
        if src.is_dir() {
            copy_tree(src, dst)?;
        } else {
            copy_file(src, dst)?;
        }
        Ok(())
    }

    fn move_to(&self, src: &Path, dst: &Path) -> FsResult<()> {
        // Try rename first (same filesystem, instant)
        match fs::rename(src, dst) {
            Ok(()) => Ok(()),
            Err(e) if !src.exists() => Err(e.into()),
            Err(e) => {
                debug!(src = %src.display(), error = %e, "rename failed, falling back to copy+delete");
                if src.is_dir() {
                    copy_tree(src, dst)?;
                    fs::remove_dir_all(src)?;
                } else {
                    copy_file(src, dst)?;
                    fs::remove_file(src)?;
                }
                Ok(())
            }
        }
    }

    fn mkdir(&self, path: &Path) -> FsResult<()> {
        fs::create_dir(path)?;
        Ok(())
    }

    fn touch(&self, path: &Path) -> FsResult<()> {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> FsResult<()> {
        if fs::symlink_metadata(to).is_ok() {
            return Err(FsError::AlreadyExists);
        }
        fs::rename(from, to)?;
        Ok(())
    }
}

/// Copy the directory `src` to the new path `dest`.
///
/// `dest` must not exist yet; if the copy fails part way, everything created
/// under it is removed again.
fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir(dest)?;
    if let Err(e) = copy_dir_contents(src, dest) {
        warn!(src = %src.display(), error = %e, "directory copy failed, removing partial copy");
        if let Err(cleanup) = fs::remove_dir_all(dest) {
            warn!(dest = %dest.display(), error = %cleanup, "cannot remove partial copy");
        }
        return Err(e);
    }
    Ok(())
}

fn copy_dir_contents(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            copy_symlink(&src_path, &dest_path)?;
        } else if file_type.is_dir() {
            fs::create_dir(&dest_path)?;
            copy_dir_contents(&src_path, &dest_path)?;
        } else {
            copy_file(&src_path, &dest_path)?;
        }
    }
    Ok(())
}

/// Links inside a copied tree are recreated as links.
#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dest)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        fs::create_dir(dest)?;
        copy_dir_contents(src, dest)
    } else {
        copy_file(src, dest)
    }
}

/// Copy contents and permissions, then carry over the modification time.
fn copy_file(src: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(src, dest)?;
    let modified = fs::metadata(src)?.modified()?;
    let preserved = fs::File::options()
        .write(true)
        .open(dest)
        .or_else(|_| fs::File::open(dest))
        .and_then(|file| file.set_modified(modified));
    if let Err(e) = preserved {
        debug!(dest = %dest.display(), error = %e, "cannot preserve modification time");
    }
    Ok(())
}

/// Reject names that are empty, contain a path separator, or are `.`/`..`.
pub fn validate_name(name: &str) -> FsResult<&str> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
        return Err(FsError::InvalidName);
    }
    Ok(name)
}

/// Whether `path` is a directory with at least one child.
pub fn is_non_empty_dir(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::read_dir(path)
            .map(|mut rd| rd.next().is_some())
            .unwrap_or(false),
        _ => false,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Outcome of a multi-item operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of successfully processed items.
    pub succeeded: usize,
    /// One message per failed or skipped item, in processing order.
    pub errors: Vec<String>,
}

impl BatchReport {
    /// `Errors: a; b; c...`, showing at most `cap` items.
    pub fn error_summary(&self, cap: usize) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let shown: Vec<&str> = self.errors.iter().take(cap).map(String::as_str).collect();
        let ellipsis = if self.errors.len() > cap { "..." } else { "" };
        Some(format!("Errors: {}{}", shown.join("; "), ellipsis))
    }
}

/// Paste every staged path into `dest_dir`.
///
/// An existing destination skips only that item and records a named
/// conflict; the rest of the batch still runs.
pub fn paste_batch(
    ops: &dyn FileOps,
    sources: &[PathBuf],
    op: ClipboardOp,
    dest_dir: &Path,
) -> BatchReport {
    let mut report = BatchReport::default();

    for source in sources {
        let name = display_name(source);
        let Some(file_name) = source.file_name() else {
            report.errors.push(format!("{}: {}", name, FsError::InvalidName));
            continue;
        };
        let dest = dest_dir.join(file_name);

        if fs::symlink_metadata(&dest).is_ok() {
            report.errors.push(format!("{} already exists", name));
            continue;
        }
        if source.is_dir() && dest_dir.starts_with(source) {
            report
                .errors
                .push(format!("cannot paste {} into itself", name));
            continue;
        }

        let result = match op {
            ClipboardOp::Copy => ops.copy(source, &dest),
            ClipboardOp::Cut => ops.move_to(source, &dest),
        };
        match result {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                warn!(src = %source.display(), error = %e, "paste item failed");
                report.errors.push(format!("{}: {}", name, e));
            }
        }
    }

    info!(
        op = op.label(),
        succeeded = report.succeeded,
        failed = report.errors.len(),
        "paste finished"
    );
    report
}

/// Delete every target independently; one failure does not stop the batch.
pub fn delete_batch(ops: &dyn FileOps, targets: &[PathBuf]) -> BatchReport {
    let mut report = BatchReport::default();
    for target in targets {
        match ops.delete(target) {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                warn!(path = %target.display(), error = %e, "delete failed");
                report.errors.push(format!("{}: {}", display_name(target), e));
            }
        }
    }
    info!(
        succeeded = report.succeeded,
        failed = report.errors.len(),
        "delete finished"
    );
    report
}
