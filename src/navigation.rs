use std::path::PathBuf;

use tracing::info;

use crate::error::{FsError, FsResult};
use crate::panel::{Overlay, PanelState};

/// One or two panels. Single mode structurally holds exactly one panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Panels {
    Single(PanelState),
    Dual {
        panels: [PanelState; 2],
        /// 0 = left, 1 = right.
        active: usize,
    },
}

impl Default for Panels {
    fn default() -> Self {
        Panels::Single(PanelState::default())
    }
}

/// The navigation state machine: panel layout plus the global hidden flag.
///
/// Every cursor, selection and traversal command goes to the active panel
/// only; the other panel is never touched.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    pub panels: Panels,
    pub show_hidden: bool,
}

impl Navigation {
    /// Single-panel navigation at `start`. Call [`refresh_all`](Self::refresh_all)
    /// to load the listing.
    pub fn new(start: PathBuf) -> Self {
        Self {
            panels: Panels::Single(PanelState::new(start)),
            show_hidden: false,
        }
    }

    pub fn is_dual(&self) -> bool {
        matches!(self.panels, Panels::Dual { .. })
    }

    /// Index of the active panel in dual mode.
    pub fn active_index(&self) -> Option<usize> {
        match self.panels {
            Panels::Single(_) => None,
            Panels::Dual { active, .. } => Some(active),
        }
    }

    pub fn active(&self) -> &PanelState {
        match &self.panels {
            Panels::Single(panel) => panel,
            Panels::Dual { panels, active } => &panels[*active],
        }
    }

    pub fn active_mut(&mut self) -> &mut PanelState {
        match &mut self.panels {
            Panels::Single(panel) => panel,
            Panels::Dual { panels, active } => &mut panels[*active],
        }
    }

    /// All live panels, left to right.
    pub fn panels(&self) -> &[PanelState] {
        match &self.panels {
            Panels::Single(panel) => std::slice::from_ref(panel),
            Panels::Dual { panels, .. } => &panels[..],
        }
    }

    fn panels_mut(&mut self) -> &mut [PanelState] {
        match &mut self.panels {
            Panels::Single(panel) => std::slice::from_mut(panel),
            Panels::Dual { panels, .. } => &mut panels[..],
        }
    }

    /// Switch between single and dual mode. Returns `true` when now dual,
    /// plus the first listing error hit while refreshing the panels.
    ///
    /// Entering dual mode keeps the current panel on the left (active) and
    /// opens an independent right panel on the same directory. Leaving it
    /// keeps the active panel and drops the other.
    pub fn toggle_dual(&mut self) -> (bool, Option<FsError>) {
        let show_hidden = self.show_hidden;
        let mut error = None;
        self.panels = match std::mem::take(&mut self.panels) {
            Panels::Single(mut left) => {
                let mut right = PanelState::new(left.path.clone());
                error = left.refresh(show_hidden).or(right.refresh(show_hidden));
                Panels::Dual {
                    panels: [left, right],
                    active: 0,
                }
            }
            Panels::Dual { panels, active } => {
                let [left, right] = panels;
                Panels::Single(if active == 0 { left } else { right })
            }
        };
        info!(dual = self.is_dual(), "panel mode changed");
        (self.is_dual(), error)
    }

    /// Flip the active panel. Returns `false` (and does nothing) in single mode.
    pub fn switch_panel(&mut self) -> bool {
        match &mut self.panels {
            Panels::Single(_) => false,
            Panels::Dual { active, .. } => {
                *active = 1 - *active;
                true
            }
        }
    }

    /// Flip the global hidden flag and re-list every panel.
    pub fn toggle_hidden(&mut self) -> Option<FsError> {
        self.show_hidden = !self.show_hidden;
        self.refresh_all()
    }

    /// Re-list every panel, discarding overlays. Returns the first error.
    pub fn refresh_all(&mut self) -> Option<FsError> {
        let show_hidden = self.show_hidden;
        self.panels_mut()
            .iter_mut()
            .filter_map(|p| p.refresh(show_hidden))
            .fold(None, |first, e| first.or(Some(e)))
    }

    /// Re-list every panel, keeping overlays. Returns the first error.
    pub fn rescan_all(&mut self) -> Option<FsError> {
        let show_hidden = self.show_hidden;
        self.panels_mut()
            .iter_mut()
            .filter_map(|p| p.rescan(show_hidden))
            .fold(None, |first, e| first.or(Some(e)))
    }

    pub fn move_cursor(&mut self, delta: isize, viewport: usize) {
        self.active_mut().move_cursor(delta, viewport);
    }

    pub fn enter_child(&mut self, name: &str) -> FsResult<Option<FsError>> {
        let show_hidden = self.show_hidden;
        self.active_mut().enter_child(name, show_hidden)
    }

    pub fn go_to_parent(&mut self) -> (bool, Option<FsError>) {
        let show_hidden = self.show_hidden;
        self.active_mut().go_to_parent(show_hidden)
    }

    pub fn apply_overlay(&mut self, overlay: Overlay) {
        self.active_mut().apply_overlay(overlay);
    }

    pub fn clear_overlay(&mut self) -> bool {
        self.active_mut().clear_overlay()
    }

    /// Keep every panel's cursor inside a window of `viewport` rows.
    pub fn ensure_visible(&mut self, viewport: usize) {
        for panel in self.panels_mut() {
            panel.ensure_visible(viewport);
        }
    }
}
