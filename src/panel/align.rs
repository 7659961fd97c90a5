//! Stacked alignment of panels, computed with taffy.
//!
//! The target layout is a flex column (vertical surfaces) or row
//! (horizontal surfaces) of the visible panels' current rects, separated by
//! `panel_gap`. Each step moves every panel that is not being dragged a
//! fraction of the way to its slot.

use std::time::{Duration, Instant};

use taffy::prelude::*;

use crate::config::UiConfig;
use crate::error::UiError;
use crate::geometry::Offset;

use super::{Alignment, PanelId, PanelSurface};

/// Interval between animation frames.
pub const FRAME: Duration = Duration::from_millis(20);

/// A running collapse/expand animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    started: Instant,
    next_frame: Instant,
}

impl Animation {
    pub fn start(now: Instant) -> Self {
        Self { started: now, next_frame: now }
    }

    /// Easing factor: `sqrt(elapsed / duration)`, clamped to 1.
    pub fn factor(&self, now: Instant, duration: Duration) -> f32 {
        if duration.is_zero() {
            return 1.0;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f32() / duration.as_secs_f32();
        t.sqrt().min(1.0)
    }
}

impl PanelSurface {
    /// Move panels toward their stacked slots by `fac`. Returns whether any moved.
    pub fn align_step(&mut self, fac: f32, config: &UiConfig) -> Result<bool, UiError> {
        let vertical = match self.alignment {
            Alignment::None => return Ok(false),
            Alignment::Vertical => true,
            Alignment::Horizontal => false,
        };
        let header = config.panel_header;

        let mut order = self.visible();
        order.sort_by_key(|id| {
            let p = &self.panels[*id];
            (if vertical { p.ofs.y } else { p.ofs.x }, p.sort_order)
        });

        let mut tree: TaffyTree<()> = TaffyTree::new();
        let leaves = order
            .iter()
            .map(|id| {
                let rect = self.panels[*id].rect(header);
                tree.new_leaf(Style {
                    size: taffy::geometry::Size {
                        width: Dimension::from_length(rect.width as f32),
                        height: Dimension::from_length(rect.height as f32),
                    },
                    flex_shrink: 0.0,
                    ..Default::default()
                })
            })
            .collect::<Result<Vec<NodeId>, _>>()?;
        let gap = LengthPercentage::from_length(config.panel_gap as f32);
        let root = tree.new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: if vertical { FlexDirection::Column } else { FlexDirection::Row },
                align_items: Some(AlignItems::FlexStart),
                gap: taffy::geometry::Size { width: gap, height: gap },
                ..Default::default()
            },
            &leaves,
        )?;
        tree.compute_layout(
            root,
            taffy::geometry::Size { width: AvailableSpace::MaxContent, height: AvailableSpace::MaxContent },
        )?;

        let mut changed = false;
        for (slot, (id, leaf)) in order.iter().zip(&leaves).enumerate() {
            let location = tree.layout(*leaf)?.location;
            let target = (self.origin + Offset::new(location.x.round() as i32, location.y.round() as i32))
                .snap(config.panel_grid);
            let panel = &mut self.panels[*id];
            panel.sort_order = slot;
            if panel.selected {
                continue;
            }
            let next = ease(panel.ofs, target, fac, config.panel_grid);
            if next != panel.ofs {
                panel.ofs = next;
                changed = true;
            }
        }

        // Hidden tabs follow their owner.
        let owners: Vec<(PanelId, Offset)> = order.iter().map(|id| (*id, self.panels[*id].ofs)).collect();
        for panel in self.panels.values_mut() {
            if let Some(owner) = panel.tab {
                if let Some((_, ofs)) = owners.iter().find(|(o, _)| *o == owner) {
                    panel.ofs = *ofs;
                }
            }
        }
        Ok(changed)
    }

    // ── Animation ────────────────────────────────────────────────────

    /// Start (or restart) the collapse/expand animation.
    pub fn animate(&mut self, now: Instant) {
        if self.alignment != Alignment::None {
            self.animation = Some(Animation::start(now));
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn next_frame(&self) -> Option<Instant> {
        self.animation.map(|a| a.next_frame)
    }

    /// Run one animation frame if it is due. Returns whether panels moved.
    pub fn animation_step(&mut self, now: Instant, config: &UiConfig) -> Result<bool, UiError> {
        let Some(mut animation) = self.animation else {
            return Ok(false);
        };
        if now < animation.next_frame {
            return Ok(false);
        }
        let fac = animation.factor(now, config.panel_animation());
        let changed = self.align_step(fac, config)?;
        if fac >= 1.0 {
            self.animation = None;
            tracing::trace!("panel animation finished");
        } else {
            animation.next_frame = now + FRAME;
            self.animation = Some(animation);
        }
        Ok(changed)
    }
}

/// Interpolate on the grid. A step that rounds back onto the current cell
/// advances one cell so small factors still converge.
fn ease(current: Offset, target: Offset, fac: f32, grid: i32) -> Offset {
    if fac >= 1.0 {
        return target;
    }
    let next = current.approach(target, fac).snap(grid);
    let grid = grid.max(1);
    let axis = |c: i32, n: i32, t: i32| {
        if n != c || c == t {
            n
        } else if (t - c).abs() <= grid {
            t
        } else {
            c + grid * (t - c).signum()
        }
    };
    Offset::new(axis(current.x, next.x, target.x), axis(current.y, next.y, target.y))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::panel::Collapse;
    use pretty_assertions::assert_eq;

    fn offsets(s: &PanelSurface, ids: &[PanelId]) -> Vec<Offset> {
        ids.iter().map(|id| s.get(*id).unwrap().ofs).collect()
    }

    #[test]
    fn full_step_stacks_vertically() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::Vertical).with_origin(Offset::new(8, 8));
        let a = s.panel("A", "g", Size::new(200, 100), &config);
        let b = s.panel("B", "g", Size::new(200, 60), &config);
        s.get_mut(a).unwrap().ofs = Offset::new(40, 300);

        assert!(s.align_step(1.0, &config).unwrap());
        // B now sorts first.
        assert_eq!(offsets(&s, &[b, a]), vec![Offset::new(8, 8), Offset::new(8, 76)]);
        assert!(!s.align_step(1.0, &config).unwrap());
    }

    #[test]
    fn horizontal_uses_rows() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::Horizontal);
        let a = s.panel("A", "g", Size::new(100, 200), &config);
        let b = s.panel("B", "g", Size::new(60, 200), &config);
        s.get_mut(b).unwrap().ofs = Offset::new(500, 0);
        s.align_step(1.0, &config).unwrap();
        assert_eq!(offsets(&s, &[a, b]), vec![Offset::new(0, 0), Offset::new(108, 0)]);
    }

    #[test]
    fn collapsed_panels_take_header_height() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::Vertical);
        let a = s.panel("A", "g", Size::new(200, 100), &config);
        let b = s.panel("B", "g", Size::new(200, 60), &config);
        s.toggle_collapse(a, &config).unwrap();
        s.align_step(1.0, &config).unwrap();
        assert_eq!(s.get(a).unwrap().collapse, Collapse::ClosedY);
        assert_eq!(s.get(b).unwrap().ofs, Offset::new(0, 28));
    }

    #[test]
    fn partial_steps_converge_on_grid() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::Vertical);
        let a = s.panel("A", "g", Size::new(200, 100), &config);
        s.get_mut(a).unwrap().ofs = Offset::new(0, 40);
        let mut steps = 0;
        while s.align_step(0.2, &config).unwrap() {
            let ofs = s.get(a).unwrap().ofs;
            assert_eq!(ofs.y % 4, 0);
            steps += 1;
            assert!(steps < 50);
        }
        assert_eq!(s.get(a).unwrap().ofs, Offset::new(0, 0));
    }

    #[test]
    fn selected_panels_stay_put() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::Vertical);
        let a = s.panel("A", "g", Size::new(200, 100), &config);
        s.get_mut(a).unwrap().ofs = Offset::new(0, 40);
        s.get_mut(a).unwrap().selected = true;
        assert!(!s.align_step(1.0, &config).unwrap());
        assert_eq!(s.get(a).unwrap().ofs, Offset::new(0, 40));
    }

    #[test]
    fn free_surfaces_do_not_align() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::None);
        let a = s.panel("A", "g", Size::new(200, 100), &config);
        s.get_mut(a).unwrap().ofs = Offset::new(40, 40);
        assert!(!s.align_step(1.0, &config).unwrap());
    }

    #[test]
    fn animation_eases_with_sqrt() {
        let t0 = Instant::now();
        let anim = Animation::start(t0);
        let d = Duration::from_millis(400);
        assert_eq!(anim.factor(t0, d), 0.0);
        assert!((anim.factor(t0 + Duration::from_millis(100), d) - 0.5).abs() < 1e-3);
        assert_eq!(anim.factor(t0 + Duration::from_millis(900), d), 1.0);
    }

    #[test]
    fn animation_runs_to_completion() {
        let config = UiConfig::default().with_panel_animation(100);
        let mut s = PanelSurface::new(Alignment::Vertical);
        let a = s.panel("A", "g", Size::new(200, 100), &config);
        s.get_mut(a).unwrap().ofs = Offset::new(0, 80);

        let t0 = Instant::now();
        s.animate(t0);
        assert_eq!(s.next_frame(), Some(t0));
        s.animation_step(t0 + Duration::from_millis(25), &config).unwrap();
        assert!(s.is_animating());
        assert_eq!(s.next_frame(), Some(t0 + Duration::from_millis(45)));
        s.animation_step(t0 + Duration::from_millis(100), &config).unwrap();
        assert!(!s.is_animating());
        assert_eq!(s.get(a).unwrap().ofs, Offset::ZERO);
    }
}
