//! The runner: one [`Ui`] owns every block, panel and piece of runtime state
//! and pumps events through them.
//!
//! Popups form a modal stack serviced by a single loop, so opening a submenu
//! is a push and closing N levels is a truncation. Timers are deadlines the
//! runner hands to the input source as a poll timeout.

use std::time::Instant;

use crate::block::{Block, BlockResult, DispatchCx, Dispatched};
use crate::config::UiConfig;
use crate::context::UiRuntimeContext;
use crate::error::UiError;
use crate::event::{Event, InputSource, KeyMap, Polled, UiEvent};
use crate::geometry::Offset;
use crate::panel::{PanelId, PanelSurface};
use crate::render::DrawAdapter;
use crate::stack::{BlockId, BlockStack, Popped};

/// Log and abort on a broken usage invariant.
fn fatal(err: UiError) -> ! {
    tracing::error!(%err, "fatal usage error");
    panic!("blockui: {err}");
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// Owns everything a running interface needs.
pub struct Ui {
    pub config: UiConfig,
    pub keymap: KeyMap,
    pub ctx: UiRuntimeContext,
    pub stack: BlockStack,
    pub panels: PanelSurface,
    /// Last pointer position. Key events are stamped with it.
    pointer: Offset,
}

impl Ui {
    pub fn new(config: UiConfig) -> Self {
        Self {
            config,
            keymap: KeyMap::with_defaults(),
            ctx: UiRuntimeContext::new(),
            stack: BlockStack::new(),
            panels: PanelSurface::default(),
            pointer: Offset::ZERO,
        }
    }

    pub fn with_keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn with_panels(mut self, panels: PanelSurface) -> Self {
        self.panels = panels;
        self
    }

    /// Add a persistent block.
    pub fn add_block(&mut self, block: Block) -> BlockId {
        self.stack.add_base(block)
    }

    /// Add a persistent block laid out inside a panel.
    pub fn add_panel_block(&mut self, panel: PanelId, mut block: Block) -> Result<BlockId, UiError> {
        let origin = self.panels.require(panel)?.content_origin(self.config.panel_header);
        block.panel = Some(panel);
        block.offset = origin;
        Ok(self.stack.add_base(block))
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.stack.get(id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.stack.get_mut(id)
    }

    /// Number of open popups.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn pointer(&self) -> Offset {
        self.pointer
    }

    /// Take every pending host notification.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        self.ctx.outbox.drain()
    }

    // ── Event loop ───────────────────────────────────────────────────

    /// Pump `source` until it closes.
    pub fn run(&mut self, source: &mut dyn InputSource) -> Result<(), UiError> {
        while self.step(source)?.is_some() {}
        tracing::debug!("input closed");
        Ok(())
    }

    /// Wait for one event or the next timer. `None` once the source is closed.
    pub fn step(&mut self, source: &mut dyn InputSource) -> Result<Option<BlockResult>, UiError> {
        let timeout = self.next_deadline().map(|at| at.saturating_duration_since(source.now()));
        match source.poll_event(timeout)? {
            Polled::Event(event) => {
                let pending = source.has_pending();
                Ok(Some(self.handle_event(event, source.now(), pending)))
            }
            Polled::Timeout => {
                let pending = source.has_pending();
                Ok(Some(self.handle_timeout(source.now(), pending)))
            }
            Polled::Closed => Ok(None),
        }
    }

    /// Route one screen-space event. `pending` says more input is queued.
    pub fn handle_event(&mut self, event: Event, now: Instant, pending: bool) -> BlockResult {
        let event = self.stamp(event);
        let keep_tip = self
            .ctx
            .tooltip()
            .is_some_and(|t| !t.shown && event.is_motion() && t.anchor.contains(event.pos));
        if !keep_tip && self.ctx.hide_tooltip() {
            self.ctx.outbox.push(UiEvent::Redraw);
        }

        let result = if self.panels.dragging().is_some() {
            self.drag_panel(&event, now)
        } else {
            self.dispatch_modal(&event, now, pending)
        };

        if event.is_motion() {
            self.arm_tooltip(now);
        }
        if result != BlockResult::Nothing {
            self.ctx.outbox.push(UiEvent::Redraw);
        }
        result
    }

    /// Fire due timers: panel animation, auto-open, the towards budget, tooltips.
    pub fn handle_timeout(&mut self, now: Instant, pending: bool) -> BlockResult {
        let mut result = BlockResult::Nothing;
        match self.panels.animation_step(now, &self.config) {
            Ok(true) => result = BlockResult::Continue,
            Ok(false) => {}
            Err(err) => tracing::warn!(%err, "panel animation step failed"),
        }

        for id in self.serviced() {
            let out = self.with_block(id, now, pending, |block, cx| block.on_timer(cx));
            if let Some((idx, popup)) = out.open {
                self.stack.push_popup(popup, Some((id, idx)));
                result = BlockResult::Continue;
                break;
            }
            match out.result {
                BlockResult::Nothing => {}
                BlockResult::ReturnOut => {
                    self.close_top(false);
                    self.settle();
                    result = BlockResult::ReturnOut;
                    break;
                }
                other => {
                    result = other;
                    break;
                }
            }
        }

        if !pending && self.config.tooltips && self.ctx.reveal_tooltip(now) && result == BlockResult::Nothing {
            result = BlockResult::Continue;
        }
        if result != BlockResult::Nothing {
            self.ctx.outbox.push(UiEvent::Redraw);
        }
        result
    }

    /// Earliest pending timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.serviced()
            .into_iter()
            .filter_map(|id| self.stack.get(id).and_then(|b| b.next_deadline(&self.config)))
            .chain(self.ctx.tooltip_deadline())
            .chain(self.panels.next_frame())
            .min()
    }

    /// Close every popup without committing.
    pub fn cancel_all(&mut self) {
        let depth = self.stack.depth();
        while self.close_top(false).is_some() {}
        self.ctx.clear_after();
        if depth > 0 {
            tracing::debug!(depth, "modal stack cancelled");
            self.ctx.outbox.push(UiEvent::Redraw);
        }
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Describe the whole interface: panel headers, base blocks, popups
    /// bottom to top, then the tooltip.
    pub fn draw(&mut self, drawer: &mut dyn DrawAdapter) {
        self.sync_panels();
        for header in self.panels.headers(&self.config) {
            drawer.draw_panel_header(&header);
        }
        for id in self.stack.ids().collect::<Vec<_>>() {
            if !self.shown(id) {
                continue;
            }
            if let Some(block) = self.stack.get(id) {
                block.draw(drawer, &self.config);
            }
        }
        if let Some(tip) = self.ctx.tooltip().filter(|t| t.shown) {
            drawer.draw_tooltip(tip.anchor, &tip.text);
        }
    }

    // ── Routing ──────────────────────────────────────────────────────

    fn stamp(&mut self, event: Event) -> Event {
        if event.key_code().is_some() {
            return event.with_pos(self.pointer);
        }
        if event.is_pointer() {
            self.pointer = event.pos;
        }
        event
    }

    /// Blocks whose timers run: the top popup, or the visible base blocks.
    fn serviced(&self) -> Vec<BlockId> {
        match self.stack.top() {
            Some(top) => vec![top.block],
            None => self.stack.base().iter().copied().filter(|id| self.shown(*id)).collect(),
        }
    }

    fn shown(&self, id: BlockId) -> bool {
        self.stack
            .get(id)
            .is_some_and(|b| b.panel.is_none_or(|p| self.panels.shows_content(p)))
    }

    fn with_block(
        &mut self,
        id: BlockId,
        now: Instant,
        pending: bool,
        f: impl FnOnce(&mut Block, &mut DispatchCx<'_>) -> Dispatched,
    ) -> Dispatched {
        let Self { config, keymap, ctx, stack, .. } = self;
        let Some(block) = stack.get_mut(id) else {
            return Dispatched::nothing();
        };
        let mut cx = DispatchCx { config, keymap, ctx, now, pending };
        f(block, &mut cx)
    }

    /// Service the top popup; with none open, the base blocks.
    fn dispatch_modal(&mut self, event: &Event, now: Instant, pending: bool) -> BlockResult {
        let Some(top) = self.stack.top() else {
            return self.dispatch_base(event, now, pending);
        };
        let out = self.with_block(top.block, now, pending, |block, cx| block.dispatch(cx, event));
        if let Some((idx, popup)) = out.open {
            self.stack.push_popup(popup, Some((top.block, idx)));
            return BlockResult::Continue;
        }
        match out.result {
            BlockResult::ReturnOut => {
                let Some(popped) = self.close_top(false) else {
                    return BlockResult::ReturnOut;
                };
                self.settle();
                let on_opener = popped.block.parent_rect.is_some_and(|r| r.contains(event.pos));
                if !event.is_pointer() || (event.is_pointer_press() && on_opener) {
                    return BlockResult::ReturnOut;
                }
                match self.dispatch_modal(event, now, pending) {
                    BlockResult::Nothing => BlockResult::ReturnOut,
                    beneath => beneath,
                }
            }
            BlockResult::ReturnCancel => {
                self.close_top(false);
                self.settle();
                BlockResult::ReturnCancel
            }
            BlockResult::ReturnOk => {
                while self.close_top(true).is_some() {}
                self.run_after();
                BlockResult::ReturnOk
            }
            other => other,
        }
    }

    fn dispatch_base(&mut self, event: &Event, now: Instant, pending: bool) -> BlockResult {
        self.sync_panels();
        if event.is_left_press() {
            if let Some(result) = self.press_panel_header(event, now) {
                return result;
            }
        }
        for id in self.stack.base().to_vec() {
            if !self.shown(id) {
                continue;
            }
            let out = self.with_block(id, now, pending, |block, cx| block.dispatch(cx, event));
            if let Some((idx, popup)) = out.open {
                self.stack.push_popup(popup, Some((id, idx)));
                return BlockResult::Continue;
            }
            match out.result {
                BlockResult::Nothing => {}
                BlockResult::ReturnOk => {
                    self.run_after();
                    return BlockResult::ReturnOk;
                }
                other => return other,
            }
        }
        BlockResult::Nothing
    }

    /// Pop the top popup and tell its opener.
    fn close_top(&mut self, ok: bool) -> Option<Popped> {
        let popped = match self.stack.pop() {
            Ok(popped) => popped?,
            Err(err) => fatal(err),
        };
        if let Some((id, idx)) = popped.opener {
            if let Some(block) = self.stack.get_mut(id) {
                block.popup_closed(&mut self.ctx, idx, ok);
            }
        }
        Some(popped)
    }

    /// After a popup closed without OK: once nothing is open, drop the pending callback.
    fn settle(&mut self) {
        if self.stack.depth() == 0 && self.ctx.has_after() {
            tracing::debug!("after-callback dropped");
            self.ctx.clear_after();
        }
    }

    fn run_after(&mut self) {
        if let Some((callback, commit)) = self.ctx.take_after() {
            tracing::debug!(retval = commit.retval, "running after-callback");
            callback(&commit);
        }
    }

    // ── Tooltips ─────────────────────────────────────────────────────

    fn arm_tooltip(&mut self, now: Instant) {
        if !self.config.tooltips || self.ctx.tooltip().is_some() {
            return;
        }
        let pointer = self.pointer;
        let tip = self
            .serviced()
            .into_iter()
            .rev()
            .find_map(|id| self.stack.get(id).and_then(|b| b.tip_at(pointer)));
        if let Some((anchor, text)) = tip {
            self.ctx.arm_tooltip(anchor, text, now + self.config.tooltip_delay());
        }
    }

    // ── Panels ───────────────────────────────────────────────────────

    /// Move panel blocks to their panel's content origin.
    fn sync_panels(&mut self) {
        let header = self.config.panel_header;
        for id in self.stack.base().to_vec() {
            let origin = self
                .stack
                .get(id)
                .and_then(|b| b.panel)
                .and_then(|p| self.panels.get(p))
                .map(|p| p.content_origin(header));
            if let (Some(origin), Some(block)) = (origin, self.stack.get_mut(id)) {
                block.offset = origin;
            }
        }
    }

    fn press_panel_header(&mut self, event: &Event, now: Instant) -> Option<BlockResult> {
        let id = self.panels.header_at(event.pos, &self.config)?;
        let header = self.panels.get(id)?.header_rect(self.config.panel_header);
        let on_toggle = event.pos.x < header.x + self.config.panel_header;
        let tab = self.panels.tab_at(id, event.pos, &self.config).filter(|t| *t != id);

        let outcome = if event.modifiers.ctrl() {
            self.panels.collapse_others(id, &self.config)
        } else if on_toggle {
            self.panels.toggle_collapse(id, &self.config).map(|_| ())
        } else if let Some(tab) = tab {
            self.panels.activate_tab(tab)
        } else {
            return Some(match self.panels.begin_drag(id, event.pos) {
                Ok(()) => BlockResult::Continue,
                Err(err) => {
                    tracing::warn!(%err, "panel drag failed");
                    BlockResult::Nothing
                }
            });
        };
        if let Err(err) = outcome {
            tracing::warn!(%err, "panel header press failed");
            return Some(BlockResult::Nothing);
        }
        self.panels.animate(now);
        self.sync_panels();
        Some(BlockResult::Continue)
    }

    fn drag_panel(&mut self, event: &Event, now: Instant) -> BlockResult {
        let outcome = if event.is_motion() {
            self.panels.drag_to(event.pos, &self.config).map(|moved| moved.then_some(BlockResult::Continue))
        } else if event.is_left_release() {
            self.panels.end_drag().map(|_| {
                self.panels.animate(now);
                Some(BlockResult::Continue)
            })
        } else {
            Ok(None)
        };
        match outcome {
            Ok(result) => {
                self.sync_panels();
                result.unwrap_or(BlockResult::Nothing)
            }
            Err(err) => {
                tracing::warn!(%err, "panel drag failed");
                BlockResult::Nothing
            }
        }
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::block::BlockFlags;
    use crate::context::Clip;
    use crate::event::{Key, Modifiers};
    use crate::geometry::{Region, Size};
    use crate::panel::{Alignment, Collapse};
    use crate::widget::{slot, Widget};
    use pretty_assertions::assert_eq;

    fn at(x: i32, y: i32) -> Offset {
        Offset::new(x, y)
    }

    /// A header block with a shading menu (retval 5) and a button (retval 6).
    fn header_ui() -> (Ui, crate::widget::Slot<i32>) {
        let shading = slot(1i32);
        let mut ui = Ui::new(UiConfig::default().with_auto_open(false));
        let mut block = Block::new("header");
        block.add(Widget::menu("Flat|Smooth", Region::new(0, 0, 80, 20), shading.clone()).with_retval(5)).unwrap();
        block.add(Widget::button("Render", Region::new(100, 0, 60, 20)).with_retval(6)).unwrap();
        ui.add_block(block);
        (ui, shading)
    }

    // ── Popups ───────────────────────────────────────────────────────

    #[test]
    fn picking_a_menu_item_unwinds_and_fires_the_opener() {
        let (mut ui, shading) = header_ui();
        let t0 = Instant::now();
        assert_eq!(ui.handle_event(Event::press(at(5, 5)), t0, false), BlockResult::Continue);
        assert_eq!(ui.depth(), 1);
        ui.handle_event(Event::release(at(5, 5)), t0, false);
        ui.handle_event(Event::motion(at(10, 45)), t0, false);
        ui.handle_event(Event::press(at(10, 45)), t0, false);
        assert_eq!(ui.handle_event(Event::release(at(10, 45)), t0, false), BlockResult::ReturnOk);

        assert_eq!(ui.depth(), 0);
        assert_eq!(shading.get(), 2);
        assert_eq!(ui.ctx.outbox.fired(), vec![5]);
    }

    #[test]
    fn pressing_the_opener_again_only_closes() {
        let (mut ui, _) = header_ui();
        let t0 = Instant::now();
        ui.handle_event(Event::press(at(5, 5)), t0, false);
        ui.handle_event(Event::release(at(5, 5)), t0, false);
        assert_eq!(ui.handle_event(Event::press(at(5, 5)), t0, false), BlockResult::ReturnOut);
        assert_eq!(ui.depth(), 0);
    }

    #[test]
    fn outside_press_reaches_the_block_beneath() {
        let (mut ui, _) = header_ui();
        let t0 = Instant::now();
        ui.handle_event(Event::press(at(5, 5)), t0, false);
        ui.handle_event(Event::release(at(5, 5)), t0, false);
        assert_eq!(ui.handle_event(Event::press(at(120, 5)), t0, false), BlockResult::Continue);
        assert_eq!(ui.depth(), 0);
        assert_eq!(ui.handle_event(Event::release(at(120, 5)), t0, false), BlockResult::ReturnOk);
        assert_eq!(ui.ctx.outbox.fired(), vec![6]);
    }

    #[test]
    fn escape_closes_one_level_and_cancel_all_the_rest() {
        let (mut ui, _) = header_ui();
        let t0 = Instant::now();
        ui.handle_event(Event::press(at(5, 5)), t0, false);
        let nested = Block::new("more").with_flags(BlockFlags::LOOP | BlockFlags::KEY_NAV);
        let base = ui.stack.base()[0];
        let top = ui.stack.top().unwrap().block;
        ui.stack.push_popup(nested, Some((top, 0)));
        assert_eq!(ui.depth(), 2);

        assert_eq!(ui.handle_event(Event::key(Key::Escape), t0, false), BlockResult::ReturnCancel);
        assert_eq!(ui.depth(), 1);
        assert_eq!(ui.stack.top().unwrap().opener, Some((base, 0)));

        ui.cancel_all();
        assert_eq!(ui.depth(), 0);
        assert!(ui.ctx.outbox.fired().is_empty());
    }

    #[test]
    fn after_callback_runs_once_after_unwinding() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut ui = Ui::default();
        let mut block = Block::new("tools");
        block
            .add(Widget::button("Apply", Region::new(0, 0, 60, 20)).on_commit(move |_| seen.set(seen.get() + 1)))
            .unwrap();
        ui.add_block(block);
        let t0 = Instant::now();
        ui.handle_event(Event::press(at(5, 5)), t0, false);
        ui.handle_event(Event::release(at(5, 5)), t0, false);
        assert_eq!(calls.get(), 1);
        assert!(!ui.ctx.has_after());
    }

    #[test]
    fn keys_carry_the_pointer_position() {
        let mut ui = Ui::default();
        let mut block = Block::new("props");
        block.add(Widget::number("A", Region::new(0, 0, 80, 20), slot(0.25f32), 0.0, 1.0)).unwrap();
        block.add(Widget::number("B", Region::new(100, 0, 60, 20), slot(0.5f32), 0.0, 1.0)).unwrap();
        let id = ui.add_block(block);
        let t0 = Instant::now();
        ui.handle_event(Event::motion(at(120, 5)), t0, false);
        assert_eq!(ui.pointer(), at(120, 5));
        ui.block_mut(id).unwrap().set_active(None);

        // Copy falls back to the widget under the stamped position.
        ui.handle_event(Event::key_with(Key::Char('c'), Modifiers::CTRL), t0, false);
        assert_eq!(ui.ctx.clipboard(), Some(&Clip::Number(0.5)));
    }

    // ── Timers ───────────────────────────────────────────────────────

    #[test]
    fn tooltip_appears_after_rest() {
        let mut ui = Ui::default();
        let mut block = Block::new("tools");
        block.add(Widget::button("Apply", Region::new(0, 0, 60, 20)).with_tip("Apply modifier")).unwrap();
        ui.add_block(block);
        let t0 = Instant::now();
        ui.handle_event(Event::motion(at(5, 5)), t0, false);
        assert_eq!(ui.next_deadline(), Some(t0 + Duration::from_millis(500)));

        ui.handle_timeout(t0 + Duration::from_millis(500), true);
        assert!(!ui.ctx.tooltip().unwrap().shown);
        ui.handle_timeout(t0 + Duration::from_millis(500), false);
        assert!(ui.ctx.tooltip().unwrap().shown);

        ui.handle_event(Event::motion(at(200, 5)), t0, false);
        assert!(ui.ctx.tooltip().is_none());
    }

    #[test]
    fn auto_open_fires_from_the_timer() {
        let mut ui = Ui::default();
        let mut block = Block::new("header");
        block.add(Widget::menu("Flat|Smooth", Region::new(0, 0, 80, 20), slot(1i32))).unwrap();
        ui.add_block(block);
        let t0 = Instant::now();
        ui.handle_event(Event::motion(at(5, 5)), t0, false);
        let due = ui.next_deadline().unwrap();
        assert_eq!(due, t0 + Duration::from_millis(500));
        assert_eq!(ui.handle_timeout(due, false), BlockResult::Continue);
        assert_eq!(ui.depth(), 1);
    }

    // ── Panels ───────────────────────────────────────────────────────

    #[test]
    fn header_toggle_hides_the_panel_block() {
        let config = UiConfig::default();
        let mut panels = PanelSurface::new(Alignment::Vertical);
        let object = panels.panel("Object", "props", Size::new(200, 60), &config);
        let mut ui = Ui::new(config).with_panels(panels);
        let mut block = Block::new("object");
        block.add(Widget::button("Apply", Region::new(0, 0, 60, 20)).with_retval(3)).unwrap();
        let id = ui.add_panel_block(object, block).unwrap();
        assert_eq!(ui.block(id).unwrap().offset, at(0, 20));

        let t0 = Instant::now();
        assert_eq!(ui.handle_event(Event::press(at(5, 5)), t0, false), BlockResult::Continue);
        assert_eq!(ui.panels.get(object).unwrap().collapse, Collapse::ClosedY);

        ui.handle_event(Event::press(at(5, 25)), t0, false);
        ui.handle_event(Event::release(at(5, 25)), t0, false);
        assert!(ui.ctx.outbox.fired().is_empty());
    }
}
