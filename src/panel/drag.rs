//! Header dragging, overlap tracking and tab merging.

use crate::config::UiConfig;
use crate::error::UiError;
use crate::geometry::Offset;

use super::{Alignment, Collapse, PanelId, PanelSurface};

/// Alignment factor applied to the other panels on every drag motion.
const DRAG_ALIGN: f32 = 0.2;

/// A header drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelDrag {
    pub panel: PanelId,
    start_pointer: Offset,
    start_ofs: Offset,
}

impl PanelSurface {
    pub fn dragging(&self) -> Option<PanelId> {
        self.drag.map(|d| d.panel)
    }

    /// Whether `a` sits over `b` deeply enough to merge. The margin shrinks on
    /// the axis a closed panel is folded along.
    pub fn overlaps(&self, a: PanelId, b: PanelId, config: &UiConfig) -> bool {
        let (Some(pa), Some(pb)) = (self.panels.get(a), self.panels.get(b)) else {
            return false;
        };
        let folded = |axis: Collapse| pa.collapse == axis || pb.collapse == axis;
        let fx = if folded(Collapse::ClosedX) { config.overlap_safe_closed } else { config.overlap_safe };
        let fy = if folded(Collapse::ClosedY) { config.overlap_safe_closed } else { config.overlap_safe };
        pb.rect(config.panel_header).grow_fraction(fx, fy).contains_region(pa.rect(config.panel_header))
    }

    pub fn begin_drag(&mut self, id: PanelId, pointer: Offset) -> Result<(), UiError> {
        let panel = self.require_mut(id)?;
        panel.selected = true;
        let start_ofs = panel.ofs;
        tracing::debug!(panel = %panel.name, "panel drag started");
        self.drag = Some(PanelDrag { panel: id, start_pointer: pointer, start_ofs });
        Ok(())
    }

    /// Track the pointer. Returns whether anything moved.
    pub fn drag_to(&mut self, pointer: Offset, config: &UiConfig) -> Result<bool, UiError> {
        let Some(drag) = self.drag else {
            return Ok(false);
        };
        let ofs = (drag.start_ofs + (pointer - drag.start_pointer)).snap(config.panel_grid);
        let panel = self.require_mut(drag.panel)?;
        let mut changed = panel.ofs != ofs;
        panel.ofs = ofs;

        for other in self.visible() {
            if other != drag.panel {
                let overlap = self.overlaps(drag.panel, other, config);
                self.panels[other].overlap = overlap;
            }
        }
        if self.alignment != Alignment::None {
            changed |= self.align_step(DRAG_ALIGN, config)?;
        }
        Ok(changed)
    }

    /// Drop the dragged panel. If it overlaps exactly one other visible panel,
    /// that panel and its tabs become tabs of the dropped one, which takes its
    /// place. Returns the absorbed panel.
    pub fn end_drag(&mut self) -> Result<Option<PanelId>, UiError> {
        let Some(drag) = self.drag.take() else {
            return Ok(None);
        };
        let candidates: Vec<PanelId> =
            self.visible().into_iter().filter(|id| *id != drag.panel && self.panels[*id].overlap).collect();
        for panel in self.panels.values_mut() {
            panel.overlap = false;
        }
        let panel = self.require_mut(drag.panel)?;
        panel.selected = false;
        if panel.ofs != drag.start_ofs {
            panel.saved_ofs = None;
        }

        let [target] = candidates.as_slice() else {
            return Ok(None);
        };
        let target = *target;
        self.merge(drag.panel, target)?;
        Ok(Some(target))
    }

    /// Make `b` (and everything tabbed to it) a tab of `a`.
    pub fn merge(&mut self, a: PanelId, b: PanelId) -> Result<(), UiError> {
        if a == b {
            return Ok(());
        }
        let target = self.require(b)?.clone();
        self.require(a)?;
        for panel in self.panels.values_mut() {
            if panel.tab == Some(b) {
                panel.tab = Some(a);
            }
        }
        self.panels[b].tab = Some(a);
        let owner = &mut self.panels[a];
        owner.tab = None;
        owner.ofs = target.ofs;
        owner.sort_order = target.sort_order;
        owner.collapse = target.collapse;
        tracing::info!(panel = %owner.name, absorbed = %target.name, "panels merged into tabs");
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
