use std::path::PathBuf;

/// The type of clipboard operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    Copy,
    Cut,
}

impl ClipboardOp {
    pub fn label(&self) -> &'static str {
        match self {
            ClipboardOp::Copy => "copy",
            ClipboardOp::Cut => "cut",
        }
    }
}

/// Internal clipboard holding at most one pending batch of absolute paths.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    paths: Vec<PathBuf>,
    operation: Option<ClipboardOp>,
}

impl Clipboard {
    /// Create a new empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a batch, replacing whatever was staged before.
    pub fn stage(&mut self, paths: Vec<PathBuf>, op: ClipboardOp) {
        self.paths = paths;
        self.operation = Some(op);
    }

    /// The staged batch, or `None` when there is nothing to paste.
    pub fn resolve(&self) -> Option<(&[PathBuf], ClipboardOp)> {
        match self.operation {
            Some(op) if !self.paths.is_empty() => Some((&self.paths, op)),
            _ => None,
        }
    }

    /// Record the outcome of a paste: a cut with at least one successful move
    /// empties the clipboard, a copy stays staged.
    pub fn complete_paste(&mut self, op: ClipboardOp, succeeded: usize) {
        if op == ClipboardOp::Cut && succeeded > 0 {
            self.clear();
        }
    }

    /// Clear the clipboard.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.operation = None;
    }

    /// Whether the clipboard has content.
    pub fn is_empty(&self) -> bool {
        self.resolve().is_none()
    }

    /// Number of items in the clipboard.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Short status bar label, e.g. `Clip: 2 (cut)`.
    pub fn summary(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let op = self.operation?;
        Some(format!("Clip: {} ({})", self.len(), op.label()))
    }
}
