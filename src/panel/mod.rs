//! Panels: named, collapsible, tabbable containers laid out on a surface.
//!
//! A [`PanelSurface`] owns its panels in a slotmap arena. Positions are
//! screen-space and always grid-snapped. A panel that is a tab of another
//! (`tab = Some(owner)`) is hidden; its owner is laid out in its place.
//!
//! Layout (`align`), dragging and tab merging (`drag`) and collapse parking
//! (`stow`) live in submodules as further `impl PanelSurface` blocks.

pub mod align;
pub mod drag;
pub mod stow;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::config::UiConfig;
use crate::error::UiError;
use crate::geometry::{Offset, Region, Size};
use crate::render::PanelHeaderView;

pub use align::Animation;
pub use drag::PanelDrag;

new_key_type! {
    /// Identifier of a panel within its surface.
    pub struct PanelId;
}

// ---------------------------------------------------------------------------
// Collapse / Alignment
// ---------------------------------------------------------------------------

/// Open, or folded down to its header along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collapse {
    #[default]
    Open,
    /// Folded to a vertical header strip (horizontal surfaces).
    ClosedX,
    /// Folded to a horizontal header strip.
    ClosedY,
}

/// How a surface stacks its panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Free-floating. Collapsed panels are stowed.
    #[default]
    None,
    Vertical,
    Horizontal,
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// One panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub name: String,
    pub tab_group: String,
    /// Top-left corner, screen space.
    pub ofs: Offset,
    /// Size when open, header included.
    pub size: Size,
    pub collapse: Collapse,
    /// Being dragged.
    pub selected: bool,
    /// Overlapped by the panel being dragged.
    pub overlap: bool,
    /// Tab owner, when this panel is a tab of another.
    pub tab: Option<PanelId>,
    pub sort_order: usize,
    /// Position before stowing.
    pub saved_ofs: Option<Offset>,
}

impl Panel {
    fn new(name: String, tab_group: String, ofs: Offset, size: Size, sort_order: usize) -> Self {
        Self {
            name,
            tab_group,
            ofs,
            size,
            collapse: Collapse::Open,
            selected: false,
            overlap: false,
            tab: None,
            sort_order,
            saved_ofs: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.collapse == Collapse::Open
    }

    /// Rect currently occupied, folded to the header when collapsed.
    pub fn rect(&self, header: i32) -> Region {
        match self.collapse {
            Collapse::Open => self.size.at(self.ofs),
            Collapse::ClosedY => Region::new(self.ofs.x, self.ofs.y, self.size.width, header),
            Collapse::ClosedX => Region::new(self.ofs.x, self.ofs.y, header, self.size.height),
        }
    }

    pub fn header_rect(&self, header: i32) -> Region {
        match self.collapse {
            Collapse::ClosedX => Region::new(self.ofs.x, self.ofs.y, header, self.size.height),
            Collapse::Open | Collapse::ClosedY => Region::new(self.ofs.x, self.ofs.y, self.size.width, header),
        }
    }

    /// Where the panel's block starts.
    pub fn content_origin(&self, header: i32) -> Offset {
        self.ofs + Offset::new(0, header)
    }
}

// ---------------------------------------------------------------------------
// Saved layout
// ---------------------------------------------------------------------------

/// Persisted state of one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    pub name: String,
    pub tab_group: String,
    pub x: i32,
    pub y: i32,
    pub collapse: Collapse,
    /// Name of the tab owner.
    pub tab: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedLayout {
    #[serde(default)]
    panel: Vec<PanelState>,
}

// ---------------------------------------------------------------------------
// PanelSurface
// ---------------------------------------------------------------------------

/// The panels of one workspace surface.
#[derive(Debug, Default)]
pub struct PanelSurface {
    pub(crate) panels: SlotMap<PanelId, Panel>,
    /// Creation order.
    pub(crate) order: Vec<PanelId>,
    pub alignment: Alignment,
    /// Top-left of the area panels are stacked from.
    pub origin: Offset,
    pub(crate) drag: Option<PanelDrag>,
    pub(crate) animation: Option<Animation>,
}

impl PanelSurface {
    pub fn new(alignment: Alignment) -> Self {
        Self { alignment, ..Self::default() }
    }

    pub fn with_origin(mut self, origin: Offset) -> Self {
        self.origin = origin;
        self
    }

    /// The panel for `(name, tab_group)`, created below the others on first use.
    pub fn panel(&mut self, name: &str, tab_group: &str, size: Size, config: &UiConfig) -> PanelId {
        if let Some(id) = self.find(name, tab_group) {
            return id;
        }
        let top = self
            .order
            .iter()
            .filter_map(|id| self.panels.get(*id))
            .filter(|p| p.tab.is_none())
            .map(|p| p.rect(config.panel_header).bottom() + config.panel_gap)
            .max()
            .unwrap_or(self.origin.y);
        let ofs = Offset::new(self.origin.x, top).snap(config.panel_grid);
        let id = self.panels.insert(Panel::new(name.to_owned(), tab_group.to_owned(), ofs, size, self.order.len()));
        self.order.push(id);
        tracing::debug!(panel = name, tab_group, "panel created");
        id
    }

    pub fn find(&self, name: &str, tab_group: &str) -> Option<PanelId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.panels.get(*id).is_some_and(|p| p.name == name && p.tab_group == tab_group))
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(id)
    }

    pub(crate) fn require(&self, id: PanelId) -> Result<&Panel, UiError> {
        self.panels.get(id).ok_or(UiError::UnknownPanel)
    }

    pub(crate) fn require_mut(&mut self, id: PanelId) -> Result<&mut Panel, UiError> {
        self.panels.get_mut(id).ok_or(UiError::UnknownPanel)
    }

    pub fn remove(&mut self, id: PanelId) -> Option<Panel> {
        let panel = self.panels.remove(id)?;
        self.order.retain(|p| *p != id);
        for p in self.panels.values_mut() {
            if p.tab == Some(id) {
                p.tab = None;
            }
        }
        Some(panel)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panels that are not tabs of another, in layout order.
    pub fn visible(&self) -> Vec<PanelId> {
        let mut ids: Vec<PanelId> =
            self.order.iter().copied().filter(|id| self.panels.get(*id).is_some_and(|p| p.tab.is_none())).collect();
        ids.sort_by_key(|id| self.panels[*id].sort_order);
        ids
    }

    /// Whether the panel's block should be dispatched and drawn.
    pub fn shows_content(&self, id: PanelId) -> bool {
        self.panels.get(id).is_some_and(|p| p.tab.is_none() && p.is_open())
    }

    /// The tab group led by `owner`: the owner first, then its tabs.
    pub fn tabs_of(&self, owner: PanelId) -> Vec<PanelId> {
        let mut group = vec![owner];
        group.extend(self.order.iter().copied().filter(|id| self.panels.get(*id).is_some_and(|p| p.tab == Some(owner))));
        group
    }

    /// Visible panel whose header contains `pos`.
    pub fn header_at(&self, pos: Offset, config: &UiConfig) -> Option<PanelId> {
        self.visible().into_iter().rev().find(|id| self.panels[*id].header_rect(config.panel_header).contains(pos))
    }

    /// Tab of `owner`'s group under a header point. Tabs share the header
    /// after the collapse toggle evenly.
    pub fn tab_at(&self, owner: PanelId, pos: Offset, config: &UiConfig) -> Option<PanelId> {
        let group = self.tabs_of(owner);
        let header = self.panels.get(owner)?.header_rect(config.panel_header);
        let start = header.x + config.panel_header;
        let width = (header.right() - start) / group.len() as i32;
        if group.len() < 2 || width <= 0 || pos.x < start || !header.contains(pos) {
            return None;
        }
        let idx = ((pos.x - start) / width) as usize;
        group.get(idx.min(group.len() - 1)).copied()
    }

    // ── Collapse ─────────────────────────────────────────────────────

    /// Fold or unfold a panel. Free-floating surfaces stow folded panels.
    pub fn toggle_collapse(&mut self, id: PanelId, config: &UiConfig) -> Result<Collapse, UiError> {
        let alignment = self.alignment;
        let panel = self.require_mut(id)?;
        let next = match (panel.collapse, alignment) {
            (Collapse::Open, Alignment::Horizontal) => Collapse::ClosedX,
            (Collapse::Open, _) => Collapse::ClosedY,
            _ => Collapse::Open,
        };
        panel.collapse = next;
        tracing::debug!(panel = %panel.name, collapse = ?next, "panel collapse toggled");
        if alignment == Alignment::None {
            if next == Collapse::Open {
                self.unstow(id)?;
            } else {
                self.stow(id, config)?;
            }
        }
        Ok(next)
    }

    /// Open `id` and fold every other visible panel.
    pub fn collapse_others(&mut self, id: PanelId, config: &UiConfig) -> Result<(), UiError> {
        self.require(id)?;
        for other in self.visible() {
            let open = self.panels[other].is_open();
            let wanted = other == id;
            if open != wanted {
                self.toggle_collapse(other, config)?;
            }
        }
        Ok(())
    }

    // ── Tabs ─────────────────────────────────────────────────────────

    /// Bring a tab to the front: it becomes the owner of its group.
    pub fn activate_tab(&mut self, id: PanelId) -> Result<(), UiError> {
        let Some(owner) = self.require(id)?.tab else {
            return Ok(());
        };
        let previous = self.require(owner)?.clone();
        for p in self.panels.values_mut() {
            if p.tab == Some(owner) {
                p.tab = Some(id);
            }
        }
        self.panels[owner].tab = Some(id);
        let front = &mut self.panels[id];
        front.tab = None;
        front.ofs = previous.ofs;
        front.sort_order = previous.sort_order;
        front.collapse = previous.collapse;
        tracing::debug!(panel = %front.name, "tab activated");
        Ok(())
    }

    /// Take a panel out of its tab group and place it next to the group.
    pub fn untab(&mut self, id: PanelId, config: &UiConfig) -> Result<(), UiError> {
        let shift = Offset::new(config.panel_header, config.panel_header);
        let next_order = self.panels.values().map(|p| p.sort_order).max().unwrap_or(0) + 1;
        match self.require(id)?.tab {
            Some(owner) => {
                let anchor = self.require(owner)?.ofs;
                let panel = &mut self.panels[id];
                panel.tab = None;
                panel.ofs = (anchor + shift).snap(config.panel_grid);
                panel.sort_order = next_order;
            }
            None => {
                let members: Vec<PanelId> = self.tabs_of(id).into_iter().skip(1).collect();
                let Some((&heir, rest)) = members.split_first() else {
                    return Ok(());
                };
                let leader = self.panels[id].clone();
                for member in rest {
                    self.panels[*member].tab = Some(heir);
                }
                let new_owner = &mut self.panels[heir];
                new_owner.tab = None;
                new_owner.ofs = leader.ofs;
                new_owner.sort_order = leader.sort_order;
                let panel = &mut self.panels[id];
                panel.ofs = (leader.ofs + shift).snap(config.panel_grid);
                panel.sort_order = next_order;
            }
        }
        tracing::debug!(panel = %self.panels[id].name, "panel untabbed");
        Ok(())
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Header views of every visible panel.
    pub fn headers(&self, config: &UiConfig) -> Vec<PanelHeaderView> {
        self.visible()
            .into_iter()
            .map(|id| {
                let panel = &self.panels[id];
                PanelHeaderView {
                    name: panel.name.clone(),
                    rect: panel.header_rect(config.panel_header),
                    collapse: panel.collapse,
                    tabs: self.tabs_of(id).into_iter().map(|t| self.panels[t].name.clone()).collect(),
                    selected: panel.selected,
                }
            })
            .collect()
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Serialize positions, collapse state and tab owners as TOML.
    pub fn save_layout(&self) -> Result<String, UiError> {
        let panel = self
            .order
            .iter()
            .filter_map(|id| self.panels.get(*id))
            .map(|p| PanelState {
                name: p.name.clone(),
                tab_group: p.tab_group.clone(),
                x: p.saved_ofs.unwrap_or(p.ofs).x,
                y: p.saved_ofs.unwrap_or(p.ofs).y,
                collapse: p.collapse,
                tab: p.tab.and_then(|t| self.panels.get(t)).map(|o| o.name.clone()),
            })
            .collect();
        toml::to_string(&SavedLayout { panel }).map_err(|e| UiError::Config(e.to_string()))
    }

    /// Apply a saved layout to the panels that exist. Unknown names are skipped.
    pub fn restore_layout(&mut self, source: &str, config: &UiConfig) -> Result<usize, UiError> {
        let saved: SavedLayout = toml::from_str(source)?;
        let mut applied = 0;
        for state in &saved.panel {
            let Some(id) = self.find(&state.name, &state.tab_group) else {
                continue;
            };
            let owner = state.tab.as_deref().and_then(|name| self.find(name, &state.tab_group));
            let panel = &mut self.panels[id];
            panel.ofs = Offset::new(state.x, state.y).snap(config.panel_grid);
            panel.collapse = state.collapse;
            panel.tab = owner.filter(|o| *o != id);
            applied += 1;
        }
        tracing::debug!(applied, "panel layout restored");
        Ok(applied)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
