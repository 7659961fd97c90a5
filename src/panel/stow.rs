//! Parking collapsed panels of free-floating surfaces.
//!
//! Folded panels are packed along a strip at the surface origin, first fit
//! over `stow_cell` sized cells, and return to where they were on unfold.

use crate::config::UiConfig;
use crate::error::UiError;
use crate::geometry::Offset;

use super::{PanelId, PanelSurface};

impl PanelSurface {
    /// Move a folded panel into the first free run of strip cells.
    pub fn stow(&mut self, id: PanelId, config: &UiConfig) -> Result<Offset, UiError> {
        let cell = config.stow_cell.max(1);
        let width = self.require(id)?.rect(config.panel_header).width;
        let need = ((width + cell - 1) / cell).max(1);

        let taken: Vec<(i32, i32)> = self
            .panels
            .iter()
            .filter(|(other, p)| *other != id && p.saved_ofs.is_some() && p.tab.is_none())
            .map(|(_, p)| {
                let start = (p.ofs.x - self.origin.x) / cell;
                let len = ((p.rect(config.panel_header).width + cell - 1) / cell).max(1);
                (start, len)
            })
            .collect();
        let free = |k: i32| (k..k + need).all(|c| !taken.iter().any(|&(s, n)| c >= s && c < s + n));
        let slot = (0..).find(|k| free(*k)).unwrap_or(0);

        let target = self.origin + Offset::new(slot * cell, 0);
        let panel = self.require_mut(id)?;
        if panel.saved_ofs.is_none() {
            panel.saved_ofs = Some(panel.ofs);
        }
        panel.ofs = target;
        tracing::debug!(panel = %panel.name, slot, "panel stowed");
        Ok(target)
    }

    /// Return a stowed panel to its saved position.
    pub fn unstow(&mut self, id: PanelId) -> Result<(), UiError> {
        let panel = self.require_mut(id)?;
        if let Some(saved) = panel.saved_ofs.take() {
            panel.ofs = saved;
            tracing::debug!(panel = %panel.name, "panel unstowed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::UiConfig;
    use crate::geometry::{Offset, Size};
    use crate::panel::{Alignment, PanelSurface};
    use pretty_assertions::assert_eq;

    #[test]
    fn collapse_stows_and_expand_restores() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::None).with_origin(Offset::new(0, 400));
        let a = s.panel("A", "g", Size::new(100, 80), &config);
        let b = s.panel("B", "g", Size::new(60, 80), &config);
        let c = s.panel("C", "g", Size::new(40, 80), &config);
        s.get_mut(a).unwrap().ofs = Offset::new(200, 40);
        s.get_mut(b).unwrap().ofs = Offset::new(200, 160);
        s.get_mut(c).unwrap().ofs = Offset::new(320, 40);

        // 100px needs four 32px cells, 60px two, 40px two.
        s.toggle_collapse(a, &config).unwrap();
        s.toggle_collapse(b, &config).unwrap();
        assert_eq!(s.get(a).unwrap().ofs, Offset::new(0, 400));
        assert_eq!(s.get(b).unwrap().ofs, Offset::new(128, 400));

        // A leaves; C fits into the hole it left behind.
        s.toggle_collapse(a, &config).unwrap();
        assert_eq!(s.get(a).unwrap().ofs, Offset::new(200, 40));
        s.toggle_collapse(c, &config).unwrap();
        assert_eq!(s.get(c).unwrap().ofs, Offset::new(0, 400));

        s.toggle_collapse(c, &config).unwrap();
        assert_eq!(s.get(c).unwrap().ofs, Offset::new(320, 40));
    }

    #[test]
    fn unstow_without_saved_position_is_noop() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::None);
        let a = s.panel("A", "g", Size::new(100, 80), &config);
        s.unstow(a).unwrap();
        assert_eq!(s.get(a).unwrap().ofs, Offset::ZERO);
    }
}
