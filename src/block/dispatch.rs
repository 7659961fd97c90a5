//! Per-block event dispatch.
//!
//! Order for one event:
//!
//! 1. a widget holding capture gets it first; if it lets go without consuming
//!    the event, dispatch continues below
//! 2. clipboard shortcuts, then keyboard navigation
//! 3. the hover pass marks the widget under the pointer
//! 4. the widget under the pointer gets presses and releases
//! 5. connector deletion
//! 6. popup exit rules: pressing outside, moving away, Escape and Enter
//!
//! Widgets never see other widgets. Radio exclusion, popups, links and
//! commit reporting are all resolved here from the widget's [`Response`].

use std::time::Instant;

use crate::config::UiConfig;
use crate::context::{Clip, UiRuntimeContext};
use crate::event::{Code, Event, Key, KeyMap, NavAction};
use crate::geometry::{Offset, Spacing};
use crate::widget::{Binding, Effect, EventCx, KindTag, Response, WidgetFlags, WidgetKind};

use super::{Block, BlockFlags, BlockResult, Direction, MotionTowards, NavChain};

// ---------------------------------------------------------------------------
// DispatchCx / Dispatched
// ---------------------------------------------------------------------------

/// Everything a block needs from its runner while dispatching.
pub struct DispatchCx<'a> {
    pub config: &'a UiConfig,
    pub keymap: &'a KeyMap,
    pub ctx: &'a mut UiRuntimeContext,
    pub now: Instant,
    /// More input is already queued.
    pub pending: bool,
}

/// What the runner must do after a dispatch.
#[derive(Debug, Default)]
pub struct Dispatched {
    pub result: BlockResult,
    /// A popup opened by widget `.0` of this block, already placed.
    pub open: Option<(usize, Block)>,
}

impl Dispatched {
    pub fn of(result: BlockResult) -> Self {
        Self { result, open: None }
    }

    pub fn nothing() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

impl Block {
    /// Feed one screen-space event to the block.
    pub fn dispatch(&mut self, cx: &mut DispatchCx<'_>, event: &Event) -> Dispatched {
        self.set_busy(true);
        let out = self.route(cx, event);
        if event.is_pointer() {
            self.pointer = Some(event.pos);
        }
        self.set_busy(false);
        if out.result != BlockResult::Nothing {
            tracing::trace!(block = %self.name, result = ?out.result, "dispatched");
        }
        out
    }

    /// Fire expired timers: auto-open and the motion-towards budget.
    pub fn on_timer(&mut self, cx: &mut DispatchCx<'_>) -> Dispatched {
        self.set_busy(true);
        let out = self.tick(cx);
        self.set_busy(false);
        out
    }

    fn event_cx<'c>(&self, config: &'c UiConfig, now: Instant) -> EventCx<'c> {
        EventCx::new(config, self.offset, self.is_popup(), now)
    }

    fn route(&mut self, cx: &mut DispatchCx<'_>, event: &Event) -> Dispatched {
        let local = event.localized(self.offset);
        if !event.is_motion() {
            self.auto_open = None;
        }

        if let Some(idx) = self.captured {
            let wcx = self.event_cx(cx.config, cx.now);
            let r = self.widgets_mut()[idx].handle(&wcx, &local);
            let passes = !r.consumed && !r.capture;
            let out = self.apply(cx, idx, r);
            if !passes || out.open.is_some() || (self.is_popup() && out.result.is_return()) {
                return out;
            }
            let mut rest = self.route_free(cx, event, &local);
            rest.result = match (out.result, rest.result) {
                (BlockResult::ReturnOk, later) if !later.is_return() => BlockResult::ReturnOk,
                (earlier, BlockResult::Nothing) => earlier,
                (_, later) => later,
            };
            return rest;
        }
        self.route_free(cx, event, &local)
    }

    fn route_free(&mut self, cx: &mut DispatchCx<'_>, event: &Event, local: &Event) -> Dispatched {
        if let Some(out) = self.clipboard(cx, event) {
            return out;
        }
        if let Some(out) = self.navigate(cx, event) {
            return out;
        }
        if event.is_pointer() {
            self.hover(cx, local);
        }

        if local.is_pointer_press() || local.is_pointer_release() {
            if let Some(idx) = self.widget_at(local.pos) {
                if let Some(message) = self.widgets()[idx].core.lock.clone() {
                    if local.is_pointer_press() {
                        cx.ctx.post_lock(&message);
                        return Dispatched::of(BlockResult::Continue);
                    }
                } else {
                    let wcx = self.event_cx(cx.config, cx.now);
                    let r = self.widgets_mut()[idx].handle(&wcx, local);
                    if r.consumed || r.fired || r.capture || r.effect.is_some() {
                        return self.apply(cx, idx, r);
                    }
                }
            }
        }

        if let Some(out) = self.unlink(cx, event, local) {
            return out;
        }
        self.loop_exit(cx, event)
    }

    // ── Responses ────────────────────────────────────────────────────

    fn apply(&mut self, cx: &mut DispatchCx<'_>, idx: usize, r: Response) -> Dispatched {
        self.captured = r.capture.then_some(idx);
        if r.changed && !r.fired {
            self.refresh_siblings(idx);
        }
        let mut out = if r.fired {
            self.commit(cx, idx)
        } else if r.consumed {
            Dispatched::of(BlockResult::Continue)
        } else {
            Dispatched::nothing()
        };
        match r.effect {
            Some(Effect::Open(block)) => {
                let placed = self.place_popup(cx, idx, *block);
                out.open = placed.open;
                if out.result == BlockResult::Nothing {
                    out.result = placed.result;
                }
            }
            Some(Effect::Connect { at }) => {
                let linked = self.connect(cx, idx, at);
                if linked.result != BlockResult::Nothing {
                    out = linked;
                }
            }
            Some(Effect::EditNext) => self.edit_next(idx),
            None => {}
        }
        out
    }

    /// Report a committed widget and decide whether the block ends.
    fn commit(&mut self, cx: &mut DispatchCx<'_>, idx: usize) -> Dispatched {
        self.refresh_siblings(idx);
        let widget = &self.widgets()[idx];
        let commit = widget.commit();
        tracing::debug!(block = %self.name, retval = commit.retval, value = commit.value, "widget fired");
        let callback = widget.core.on_commit.clone();
        let keeps_open = widget.is_opener() || self.flags.contains(BlockFlags::KEEP_OPEN);
        cx.ctx.fire(commit, callback.as_ref());
        if self.is_popup() && keeps_open {
            Dispatched::of(BlockResult::Continue)
        } else {
            Dispatched::of(BlockResult::ReturnOk)
        }
    }

    fn activate(&mut self, cx: &mut DispatchCx<'_>, idx: usize) -> Dispatched {
        if let Some(message) = self.widgets()[idx].core.lock.clone() {
            cx.ctx.post_lock(&message);
            return Dispatched::of(BlockResult::Continue);
        }
        let wcx = self.event_cx(cx.config, cx.now);
        let r = self.widgets_mut()[idx].activate(&wcx);
        let out = self.apply(cx, idx, r);
        if out.result == BlockResult::Nothing {
            return Dispatched::of(BlockResult::Continue);
        }
        out
    }

    // ── Popups ───────────────────────────────────────────────────────

    fn open_widget(&mut self, cx: &mut DispatchCx<'_>, idx: usize) -> Dispatched {
        if let Some(message) = self.widgets()[idx].core.lock.clone() {
            cx.ctx.post_lock(&message);
            return Dispatched::of(BlockResult::Continue);
        }
        let wcx = self.event_cx(cx.config, cx.now);
        match self.widgets_mut()[idx].open(&wcx) {
            Some(block) => self.place_popup(cx, idx, block),
            None => Dispatched::of(BlockResult::Continue),
        }
    }

    /// Tell opener `idx` that its popup closed. Reports a commit when the
    /// opener fires; returns whether it did.
    pub fn popup_closed(&mut self, ctx: &mut UiRuntimeContext, idx: usize, ok: bool) -> bool {
        let Some(widget) = self.widget_mut(idx) else {
            return false;
        };
        let r = widget.popup_closed(ok);
        if r.changed || r.fired {
            self.refresh_siblings(idx);
        }
        if self.captured == Some(idx) {
            self.captured = None;
        }
        if r.fired {
            let widget = &self.widgets()[idx];
            let callback = widget.core.on_commit.clone();
            ctx.fire(widget.commit(), callback.as_ref());
        }
        r.fired
    }

    fn place_popup(&mut self, cx: &DispatchCx<'_>, idx: usize, mut popup: Block) -> Dispatched {
        let widget = &self.widgets()[idx];
        let anchor = widget.core.rect.translate(self.offset);
        let direction = match (widget.tag(), self.direction) {
            (KindTag::NestedBlock, Direction::Left) => Direction::Left,
            (KindTag::NestedBlock, _) => Direction::Right,
            _ => Direction::Down,
        };
        popup.attach(anchor, direction, cx.config);
        self.auto_open = None;
        self.set_active(Some(idx));
        tracing::debug!(block = %self.name, popup = %popup.name, ?direction, "opening popup");
        Dispatched { result: BlockResult::Continue, open: Some((idx, popup)) }
    }

    fn tick(&mut self, cx: &mut DispatchCx<'_>) -> Dispatched {
        if let Some((idx, due)) = self.auto_open {
            if due <= cx.now {
                self.auto_open = None;
                if !cx.pending && self.captured.is_none() && self.active() == Some(idx) {
                    return self.open_widget(cx, idx);
                }
            }
        }
        if let Some(towards) = self.towards {
            if towards.expired(cx.now, cx.config) {
                self.towards = None;
                if let Some(pos) = self.pointer {
                    if self.is_popup() && !self.holds(pos, cx.config) {
                        return Dispatched::of(BlockResult::ReturnOut);
                    }
                }
            }
        }
        Dispatched::nothing()
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    /// Ctrl+C copies and Ctrl+V pastes the value of the active or hovered widget.
    fn clipboard(&mut self, cx: &mut DispatchCx<'_>, event: &Event) -> Option<Dispatched> {
        if !event.modifiers.ctrl() {
            return None;
        }
        let copy = event.is_key(Key::Char('c'));
        if !copy && !event.is_key(Key::Char('v')) {
            return None;
        }
        let local = event.pos - self.offset;
        let idx = self.active().or_else(|| self.widget_at(local))?;
        let binding = self.widgets()[idx].core.binding.clone();
        if copy {
            let clip = match &binding {
                Binding::None => return None,
                Binding::Text(text) => Clip::Text(text.borrow().clone()),
                Binding::Rgb(rgb) => Clip::Color(rgb.get()),
                numeric => Clip::Number(numeric.get()),
            };
            tracing::debug!(block = %self.name, ?clip, "copied");
            cx.ctx.copy(clip);
            return Some(Dispatched::of(BlockResult::Continue));
        }

        let clip = cx.ctx.clipboard()?.clone();
        if let Some(message) = self.widgets()[idx].core.lock.clone() {
            cx.ctx.post_lock(&message);
            return Some(Dispatched::of(BlockResult::Continue));
        }
        match (&binding, clip) {
            (Binding::Text(_), Clip::Text(value)) => binding.set_text(&value),
            (Binding::Rgb(rgb), Clip::Color(value)) => rgb.set(value),
            (Binding::None | Binding::Text(_) | Binding::Rgb(_), _) => return None,
            (_, Clip::Number(value)) => self.widgets_mut()[idx].set_value(value),
            _ => return None,
        }
        Some(self.commit(cx, idx))
    }

    fn navigate(&mut self, cx: &mut DispatchCx<'_>, event: &Event) -> Option<Dispatched> {
        let popup = self.is_popup();
        if !popup && !self.flags.contains(BlockFlags::KEY_NAV) {
            return None;
        }
        let action = match event.code {
            Code::WheelUp if popup => NavAction::Prev,
            Code::WheelDown if popup => NavAction::Next,
            _ => cx.keymap.resolve(event)?,
        };
        match action {
            NavAction::Prev | NavAction::Next => {
                let mut chain = NavChain::build(self.widgets(), self.active());
                let target = if action == NavAction::Next { chain.next() } else { chain.previous() };
                self.set_active(target);
                self.auto_open = None;
                Some(Dispatched::of(BlockResult::Continue))
            }
            NavAction::Open => {
                let idx = self.active().filter(|&i| self.widgets()[i].is_opener())?;
                Some(self.open_widget(cx, idx))
            }
            NavAction::Close => {
                let sideways = matches!(self.direction, Direction::Left | Direction::Right);
                (popup && sideways).then(|| Dispatched::of(BlockResult::ReturnOut))
            }
            NavAction::Accept => {
                if self.flags.contains(BlockFlags::ENTER_OK) && !event.modifiers.shift() {
                    return Some(Dispatched::of(BlockResult::ReturnOk));
                }
                match self.active() {
                    Some(idx) => Some(self.activate(cx, idx)),
                    None if popup => Some(Dispatched::of(BlockResult::ReturnOk)),
                    None => None,
                }
            }
            NavAction::Cancel => popup.then(|| Dispatched::of(BlockResult::ReturnCancel)),
            NavAction::Select(n) => {
                if !self.flags.contains(BlockFlags::NUMSELECT) {
                    return None;
                }
                let idx = NavChain::build(self.widgets(), None).nth(n)?;
                self.set_active(Some(idx));
                Some(self.activate(cx, idx))
            }
        }
    }

    /// Start editing the next widget that can edit text, wrapping.
    fn edit_next(&mut self, from: usize) {
        let n = self.len();
        for j in (1..n).map(|k| (from + k) % n) {
            let widget = &mut self.widgets_mut()[j];
            if widget.is_interactive() && widget.core.lock.is_none() && widget.begin_edit() {
                self.captured = Some(j);
                self.set_active(Some(j));
                return;
            }
        }
    }

    // ── Pointer ──────────────────────────────────────────────────────

    fn hover(&mut self, cx: &DispatchCx<'_>, local: &Event) {
        let over = self.widget_at(local.pos);
        for (i, w) in self.widgets_mut().iter_mut().enumerate() {
            w.core.flags.set(WidgetFlags::HOVERED, Some(i) == over);
        }
        if local.is_pointer_release() {
            return;
        }
        if over != self.active() {
            self.set_active(over);
        }
        if local.is_motion() {
            self.arm_auto_open(cx, over);
        }
    }

    /// Every event over an auto-opening widget pushes its deadline back.
    fn arm_auto_open(&mut self, cx: &DispatchCx<'_>, over: Option<usize>) {
        if !cx.config.auto_open {
            self.auto_open = None;
            return;
        }
        let popup = self.is_popup();
        let eligible = over.filter(|&i| {
            let widget = &self.widgets()[i];
            widget.core.lock.is_none()
                && match widget.tag() {
                    KindTag::Menu | KindTag::IconRow => true,
                    KindTag::NestedBlock => popup,
                    _ => false,
                }
        });
        self.auto_open = eligible.map(|i| (i, cx.now + cx.config.auto_open_delay(popup)));
    }

    /// Whether a screen point keeps the popup open without motion tracking:
    /// the block, or the safety margin around it or around its opener.
    fn holds(&self, pos: Offset, config: &UiConfig) -> bool {
        let margin = Spacing::all(config.safety_margin_px);
        self.screen_bounds().contains(pos)
            || self.safety.is_some_and(|r| r.contains(pos))
            || self.parent_rect.is_some_and(|r| r.grow(margin).contains(pos))
    }

    fn heading(&mut self, cx: &DispatchCx<'_>, pos: Offset) -> bool {
        let origin = self.pointer.unwrap_or(pos);
        let towards = *self.towards.get_or_insert_with(|| MotionTowards::start(origin, cx.now));
        towards.is_heading(pos, cx.now, self.screen_bounds(), self.direction, cx.config)
    }

    fn loop_exit(&mut self, cx: &DispatchCx<'_>, event: &Event) -> Dispatched {
        if !self.is_popup() {
            return Dispatched::nothing();
        }
        let pos = event.pos;
        let inside = self.screen_bounds().contains(pos);
        if event.is_pointer_press() && !inside {
            return Dispatched::of(BlockResult::ReturnOut);
        }
        if !event.is_motion() {
            return Dispatched::nothing();
        }
        if self.holds(pos, cx.config) {
            self.towards = None;
            return Dispatched::of(BlockResult::Continue);
        }
        if self.heading(cx, pos) {
            return Dispatched::of(BlockResult::Continue);
        }
        if self.flags.contains(BlockFlags::MOVEMOUSE_QUIT) {
            return Dispatched::of(BlockResult::ReturnOut);
        }
        Dispatched::nothing()
    }

    // ── Links ────────────────────────────────────────────────────────

    fn connect(&mut self, cx: &mut DispatchCx<'_>, idx: usize, at: Offset) -> Dispatched {
        let target = self.widgets().iter().find_map(|w| match &w.kind {
            WidgetKind::InboundLink(inbound) if w.core.rect.contains(at) => Some(inbound.target),
            _ => None,
        });
        let linked = match (&self.widgets()[idx].kind, target) {
            (WidgetKind::Link(link), Some(target)) => link.connect(target),
            _ => false,
        };
        if linked {
            tracing::debug!(block = %self.name, ?target, "linked");
            return self.commit(cx, idx);
        }
        Dispatched::of(BlockResult::Continue)
    }

    /// X or Delete over a connector line removes it.
    fn unlink(&mut self, cx: &mut DispatchCx<'_>, event: &Event, local: &Event) -> Option<Dispatched> {
        if !(event.is_key(Key::Char('x')) || event.is_key(Key::Delete)) || !event.modifiers.is_empty() {
            return None;
        }
        let (idx, target) = self.link_line_near(local.pos, cx.config.link_hover_px)?;
        if let Some(message) = self.widgets()[idx].core.lock.clone() {
            cx.ctx.post_lock(&message);
            return Some(Dispatched::of(BlockResult::Continue));
        }
        let WidgetKind::Link(link) = &self.widgets()[idx].kind else {
            return None;
        };
        link.disconnect(target);
        tracing::debug!(block = %self.name, target, "unlinked");
        Some(self.commit(cx, idx))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
