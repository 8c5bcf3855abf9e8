use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::config::{PREVIEW_MAX_FILE_BYTES, PREVIEW_READ_BYTES};
use crate::error::{FsError, FsResult};

const TAB_WIDTH: usize = 4;

/// Text shown by the preview modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewContent {
    /// File name shown in the title.
    pub name: String,
    pub lines: Vec<String>,
    /// The file is longer than the part that was read.
    pub truncated: bool,
}

/// Load the head of a text file for preview.
///
/// Directories, files over the size limit and files with a NUL byte in the
/// read window are refused with a message suitable for the status line.
pub fn load_preview(path: &Path) -> FsResult<PreviewContent> {
    let meta = fs::metadata(path)?;
    if meta.is_dir() {
        return Err(FsError::Other("Cannot preview directories".into()));
    }
    if meta.len() > PREVIEW_MAX_FILE_BYTES {
        return Err(FsError::Other("File too large for preview (>1MB)".into()));
    }

    let mut buf = Vec::with_capacity(PREVIEW_READ_BYTES);
    fs::File::open(path)?
        .take(PREVIEW_READ_BYTES as u64)
        .read_to_end(&mut buf)?;

    if buf.contains(&0) {
        return Err(FsError::Other("File is not a text file".into()));
    }

    let text = String::from_utf8_lossy(&buf);
    let lines = text.split('\n').map(expand_tabs).collect();
    debug!(path = %path.display(), bytes = buf.len(), "loaded preview");

    Ok(PreviewContent {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        lines,
        truncated: meta.len() > buf.len() as u64,
    })
}

/// Replace tabs with spaces up to the next multiple of the tab width.
fn expand_tabs(line: &str) -> String {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}
