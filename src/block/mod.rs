//! Blocks: ordered groups of widgets with one dispatcher each.
//!
//! A block is either persistent (drawn every frame, usually inside a panel) or
//! a popup pushed on the modal stack. Widget rects are block-local; `offset`
//! places the block on screen. Popup placement (`parent_rect`, `safety`) is in
//! screen coordinates.

pub mod dispatch;
pub mod motion;
pub mod nav;

use std::fmt;
use std::ops::BitOr;
use std::time::Instant;

use crate::config::UiConfig;
use crate::error::UiError;
use crate::geometry::{Offset, Region, Spacing};
use crate::panel::PanelId;
use crate::render::DrawAdapter;
use crate::widget::link::{link_anchor_in, link_anchor_out, segment_distance_sq};
use crate::widget::{KindTag, Widget, WidgetFlags, WidgetKind};

pub use dispatch::{DispatchCx, Dispatched};
pub use motion::MotionTowards;
pub use nav::NavChain;

// ---------------------------------------------------------------------------
// BlockFlags
// ---------------------------------------------------------------------------

/// Behaviour switches for a block.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockFlags(u16);

impl BlockFlags {
    pub const NONE: BlockFlags = BlockFlags(0);
    /// Popup semantics: leaving, Escape and Enter end the block.
    pub const LOOP: BlockFlags = BlockFlags(1);
    /// Digit keys pick the nth item.
    pub const NUMSELECT: BlockFlags = BlockFlags(1 << 1);
    /// Enter returns OK even while a widget is active.
    pub const ENTER_OK: BlockFlags = BlockFlags(1 << 2);
    /// Arrow keys move the active widget.
    pub const KEY_NAV: BlockFlags = BlockFlags(1 << 3);
    /// Moving out of the popup's safety zone closes it.
    pub const MOVEMOUSE_QUIT: BlockFlags = BlockFlags(1 << 4);
    /// The block wants a redraw.
    pub const REDRAW: BlockFlags = BlockFlags(1 << 5);
    /// Committing a widget does not close the popup.
    pub const KEEP_OPEN: BlockFlags = BlockFlags(1 << 6);

    pub fn contains(self, other: BlockFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: BlockFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: BlockFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: BlockFlags) {
        self.0 &= !other.0;
    }
}

impl BitOr for BlockFlags {
    type Output = BlockFlags;
    fn bitor(self, rhs: BlockFlags) -> BlockFlags {
        BlockFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for BlockFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(BlockFlags, &str); 7] = [
            (BlockFlags::LOOP, "LOOP"),
            (BlockFlags::NUMSELECT, "NUMSELECT"),
            (BlockFlags::ENTER_OK, "ENTER_OK"),
            (BlockFlags::KEY_NAV, "KEY_NAV"),
            (BlockFlags::MOVEMOUSE_QUIT, "MOVEMOUSE_QUIT"),
            (BlockFlags::REDRAW, "REDRAW"),
            (BlockFlags::KEEP_OPEN, "KEEP_OPEN"),
        ];
        let set: Vec<&str> = NAMES.iter().filter(|(flag, _)| self.contains(*flag)).map(|(_, n)| *n).collect();
        write!(f, "BlockFlags({})", set.join(" | "))
    }
}

// ---------------------------------------------------------------------------
// Direction / BlockResult
// ---------------------------------------------------------------------------

/// Side of the opening widget a popup appears on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Down,
    Up,
    Left,
    Right,
}

/// Outcome of dispatching one event to one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockResult {
    /// The event did not concern this block.
    #[default]
    Nothing,
    /// Handled; the block stays.
    Continue,
    /// Committed; unwind every popup and run the deferred callback.
    ReturnOk,
    /// Cancelled; close this popup.
    ReturnCancel,
    /// The pointer left; close this popup.
    ReturnOut,
    /// Leave the event loop.
    ExitLoop,
}

impl BlockResult {
    /// Whether the result closes a popup.
    pub fn is_return(self) -> bool {
        matches!(self, BlockResult::ReturnOk | BlockResult::ReturnCancel | BlockResult::ReturnOut)
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// An ordered group of widgets.
pub struct Block {
    pub name: String,
    pub flags: BlockFlags,
    /// Screen position of the block origin.
    pub offset: Offset,
    /// Drawing surface (window) the block belongs to.
    pub surface: u32,
    pub direction: Direction,
    /// Panel the block is laid out in, if any.
    pub panel: Option<PanelId>,
    /// Screen rect of the widget that opened this popup.
    pub parent_rect: Option<Region>,
    /// Screen zone in which leaving the block does not close it.
    pub safety: Option<Region>,
    widgets: Vec<Widget>,
    /// Block-local union of widget rects.
    bounds: Region,
    busy: bool,
    pub(crate) captured: Option<usize>,
    pub(crate) towards: Option<MotionTowards>,
    pub(crate) auto_open: Option<(usize, Instant)>,
    /// Last pointer position seen, screen space.
    pub(crate) pointer: Option<Offset>,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: BlockFlags::NONE,
            offset: Offset::ZERO,
            surface: 0,
            direction: Direction::Down,
            panel: None,
            parent_rect: None,
            safety: None,
            widgets: Vec::new(),
            bounds: Region::EMPTY,
            busy: false,
            captured: None,
            towards: None,
            auto_open: None,
            pointer: None,
        }
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_flags(mut self, flags: BlockFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_surface(mut self, surface: u32) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    // ── Widgets ──────────────────────────────────────────────────────

    /// Append a widget. Kinds that read or write a value need a binding.
    pub fn add(&mut self, widget: Widget) -> Result<usize, UiError> {
        if widget.kind.as_behavior().needs_binding() && widget.core.binding.is_none() {
            tracing::error!(block = %self.name, label = %widget.core.label, "widget added without binding");
            return Err(UiError::MissingBinding { label: widget.core.label.clone() });
        }
        self.bounds = if self.widgets.is_empty() { widget.core.rect } else { self.bounds.union(widget.core.rect) };
        self.widgets.push(widget);
        Ok(self.widgets.len() - 1)
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, idx: usize) -> Option<&Widget> {
        self.widgets.get(idx)
    }

    pub fn widget_mut(&mut self, idx: usize) -> Option<&mut Widget> {
        self.widgets.get_mut(idx)
    }

    pub(crate) fn widgets_mut(&mut self) -> &mut [Widget] {
        &mut self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Index of the first widget with this label.
    pub fn find(&self, label: &str) -> Option<usize> {
        self.widgets.iter().position(|w| w.core.label == label)
    }

    /// Block-local bounds.
    pub fn bounds(&self) -> Region {
        self.bounds
    }

    pub fn screen_bounds(&self) -> Region {
        self.bounds.translate(self.offset)
    }

    pub fn is_popup(&self) -> bool {
        self.flags.contains(BlockFlags::LOOP)
    }

    /// Whether the dispatcher is running. A busy block cannot be freed.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    // ── Active widget ────────────────────────────────────────────────

    pub fn active(&self) -> Option<usize> {
        self.widgets.iter().position(|w| w.is(WidgetFlags::ACTIVE))
    }

    /// Make `idx` the only active widget, or clear the active flag.
    pub fn set_active(&mut self, idx: Option<usize>) {
        for (i, w) in self.widgets.iter_mut().enumerate() {
            w.core.flags.set(WidgetFlags::ACTIVE, Some(i) == idx);
        }
    }

    /// Index of the interactive widget under a block-local point.
    pub fn widget_at(&self, pos: Offset) -> Option<usize> {
        self.widgets.iter().position(|w| w.is_interactive() && w.core.rect.contains(pos))
    }

    /// Re-derive the selected flag of every widget sharing `idx`'s storage.
    /// A radio row only updates the rows of its own group (`range.min`).
    pub(crate) fn refresh_siblings(&mut self, idx: usize) {
        let Some((binding, radio_group)) = self
            .widgets
            .get(idx)
            .map(|w| (w.core.binding.clone(), (w.tag() == KindTag::RadioRow).then_some(w.core.range.min)))
        else {
            return;
        };
        for w in &mut self.widgets {
            if !w.core.binding.same_storage(&binding) {
                continue;
            }
            let other_group = w.tag() == KindTag::RadioRow && radio_group.is_some_and(|g| g != w.core.range.min);
            if !other_group {
                w.refresh();
            }
        }
    }

    /// Re-derive every widget's selected flag from its storage.
    pub fn refresh_all(&mut self) {
        for w in &mut self.widgets {
            w.refresh();
        }
    }

    // ── Popups ───────────────────────────────────────────────────────

    /// Place this block as a popup next to `anchor` (screen space).
    pub fn attach(&mut self, anchor: Region, direction: Direction, config: &UiConfig) {
        let size = self.bounds;
        let origin = match direction {
            Direction::Down => Offset::new(anchor.x, anchor.bottom()),
            Direction::Up => Offset::new(anchor.x, anchor.y - size.height),
            Direction::Right => Offset::new(anchor.right(), anchor.y),
            Direction::Left => Offset::new(anchor.x - size.width, anchor.y),
        };
        self.offset = origin - size.offset();
        self.direction = direction;
        self.flags.insert(BlockFlags::LOOP | BlockFlags::KEY_NAV | BlockFlags::MOVEMOUSE_QUIT);
        self.parent_rect = Some(anchor);
        self.safety = Some(self.screen_bounds().grow(Spacing::all(config.safety_margin_px)));
        tracing::trace!(block = %self.name, ?direction, offset = ?self.offset, "popup attached");
    }

    /// Screen rect and text of the tip of the widget under `pos` (screen).
    pub fn tip_at(&self, pos: Offset) -> Option<(Region, String)> {
        let local = pos - self.offset;
        self.widgets
            .iter()
            .find(|w| w.core.rect.contains(local))
            .and_then(|w| w.core.tip.clone().map(|tip| (w.core.rect.translate(self.offset), tip)))
    }

    /// Earliest timer the block is waiting on.
    pub fn next_deadline(&self, config: &UiConfig) -> Option<Instant> {
        let auto = self.auto_open.map(|(_, at)| at);
        let towards = self.towards.map(|t| t.deadline(config));
        match (auto, towards) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Links ────────────────────────────────────────────────────────

    /// Block-local connector lines as `(link index, target, from, to)`.
    pub(crate) fn link_lines(&self) -> Vec<(usize, u32, Offset, Offset)> {
        let mut lines = Vec::new();
        for (i, w) in self.widgets.iter().enumerate() {
            let WidgetKind::Link(link) = &w.kind else { continue };
            for target in link.targets() {
                if let Some(inbound) = self.inbound_rect(target) {
                    lines.push((i, target, link_anchor_out(w.core.rect), link_anchor_in(inbound)));
                }
            }
        }
        lines
    }

    fn inbound_rect(&self, target: u32) -> Option<Region> {
        self.widgets.iter().find_map(|w| match &w.kind {
            WidgetKind::InboundLink(inbound) if inbound.target == target => Some(w.core.rect),
            _ => None,
        })
    }

    /// The connector line within `radius` pixels of a block-local point.
    pub(crate) fn link_line_near(&self, pos: Offset, radius: i32) -> Option<(usize, u32)> {
        let limit = f64::from(radius) * f64::from(radius);
        self.link_lines()
            .into_iter()
            .find(|(_, _, from, to)| segment_distance_sq(pos, *from, *to) <= limit)
            .map(|(i, target, _, _)| (i, target))
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Describe the block to a draw adapter, in screen coordinates.
    pub fn draw(&self, drawer: &mut dyn DrawAdapter, config: &UiConfig) {
        drawer.begin_block(&self.name, self.screen_bounds());
        for w in &self.widgets {
            w.kind.as_behavior().on_draw(&w.core, self.offset, drawer);
        }
        let hot = self.pointer.and_then(|p| self.link_line_near(p - self.offset, config.link_hover_px));
        for (i, target, from, to) in self.link_lines() {
            drawer.draw_link_line(from + self.offset, to + self.offset, hot == Some((i, target)));
        }
    }

    /// Whether any widget of this kind is present.
    pub fn has_kind(&self, tag: KindTag) -> bool {
        self.widgets.iter().any(|w| w.tag() == tag)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("offset", &self.offset)
            .field("widgets", &self.widgets.len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
