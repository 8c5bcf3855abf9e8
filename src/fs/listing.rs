use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use tracing::{debug, warn};

use crate::error::{FsError, FsResult};

/// One directory child, as seen at the last listing.
///
/// Stat data that could not be read is left at zero rather than dropping
/// the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    /// Platform permission/type bits, 0 when unknown.
    pub mode: u32,
    /// Unix timestamp in seconds, 0 when unknown.
    pub modified: i64,
}

impl Entry {
    /// An entry whose metadata could not be read.
    pub fn unknown(name: String, is_dir: bool) -> Self {
        Self {
            name,
            is_dir,
            size: 0,
            mode: 0,
            modified: 0,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Regular file with any execute bit set.
    pub fn is_executable(&self) -> bool {
        !self.is_dir && self.mode & 0o111 != 0 && self.mode & 0o170000 == 0o100000
    }

    /// FIFO, socket, device or symlink.
    pub fn is_special(&self) -> bool {
        let kind = self.mode & 0o170000;
        self.mode != 0 && kind != 0o100000 && kind != 0o040000
    }
}

/// Result of listing one directory.
///
/// A failure to read the directory itself yields an empty listing plus the
/// error, never an `Err`.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub entries: Vec<Entry>,
    pub error: Option<FsError>,
}

/// List the direct children of `path`, sorted directories first and then by
/// case-insensitive name.
pub fn list_directory(path: &Path, show_hidden: bool) -> Listing {
    let read_dir = match fs::read_dir(path) {
        Ok(rd) => rd,
        Err(e) => {
            let error = FsError::from(e);
            warn!(path = %path.display(), %error, "cannot list directory");
            return Listing {
                entries: Vec::new(),
                error: Some(error),
            };
        }
    };

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let name = dir_entry.file_name().to_string_lossy().to_string();

        // Follows symlinks, so a link to a directory lists as a directory.
        let entry = match fs::metadata(dir_entry.path()) {
            Ok(meta) => Entry {
                name,
                is_dir: meta.is_dir(),
                size: meta.len(),
                mode: mode_bits(&meta),
                modified: meta
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_secs() as i64)
                    .unwrap_or(0),
            },
            Err(_) => {
                let is_dir = dir_entry
                    .file_type()
                    .map(|t| t.is_dir())
                    .unwrap_or(false);
                Entry::unknown(name, is_dir)
            }
        };
        if !show_hidden && entry.is_hidden() {
            continue;
        }
        entries.push(entry);
    }

    sort_entries(&mut entries);
    debug!(path = %path.display(), count = entries.len(), "listed directory");
    Listing {
        entries,
        error: None,
    }
}

/// Sort by `(not is_dir, lowercase name)`; the raw name breaks ties so the
/// order is total.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Check that `path` is a directory we can list.
pub fn probe_directory(path: &Path) -> FsResult<()> {
    let meta = fs::metadata(path)?;
    if !meta.is_dir() {
        return Err(FsError::NotADirectory);
    }
    fs::read_dir(path)?;
    Ok(())
}

#[cfg(unix)]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn mode_bits(_meta: &fs::Metadata) -> u32 {
    0
}
