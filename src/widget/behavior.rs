//! The capability interface every widget kind implements.

use std::time::Instant;

use crate::block::Block;
use crate::config::UiConfig;
use crate::event::Event;
use crate::geometry::{Offset, Region};
use crate::render::{DrawAdapter, WidgetView};

use super::{KindTag, WidgetCore, WidgetFlags};

// ---------------------------------------------------------------------------
// EventCx
// ---------------------------------------------------------------------------

/// Read-only context handed to a widget with each event.
#[derive(Debug, Clone, Copy)]
pub struct EventCx<'a> {
    pub config: &'a UiConfig,
    /// Screen position of the owning block's origin.
    pub origin: Offset,
    /// Whether the owning block is a popup.
    pub in_popup: bool,
    pub now: Instant,
}

impl<'a> EventCx<'a> {
    pub fn new(config: &'a UiConfig, origin: Offset, in_popup: bool, now: Instant) -> Self {
        Self { config, origin, in_popup, now }
    }

    /// A block-local rect in screen coordinates.
    pub fn to_screen(&self, rect: Region) -> Region {
        rect.translate(self.origin)
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Something a widget asks its block to do.
pub enum Effect {
    /// Open this block as a popup anchored at the widget.
    Open(Box<Block>),
    /// A link drag ended at this block-local point.
    Connect { at: Offset },
    /// Text editing ended with Tab: start editing the next editable widget.
    EditNext,
}

/// Outcome of one event for one widget.
#[derive(Default)]
pub struct Response {
    /// The event was used. Unconsumed events continue through the dispatcher.
    pub consumed: bool,
    /// The widget committed: its retval reaches the host.
    pub fired: bool,
    /// The bound value changed; siblings sharing storage must refresh.
    pub changed: bool,
    /// Keep routing every event to this widget until it lets go.
    pub capture: bool,
    pub effect: Option<Effect>,
}

impl Response {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self { consumed: true, ..Self::default() }
    }

    /// Consumed and holding the pointer.
    pub fn captured() -> Self {
        Self { consumed: true, capture: true, ..Self::default() }
    }

    /// Consumed, value changed and committed.
    pub fn fired() -> Self {
        Self { consumed: true, fired: true, changed: true, ..Self::default() }
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_changed(mut self, changed: bool) -> Self {
        self.changed |= changed;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Fold a later response into this one. Capture follows the later one.
    pub fn merge(self, later: Response) -> Response {
        Response {
            consumed: self.consumed || later.consumed,
            fired: self.fired || later.fired,
            changed: self.changed || later.changed,
            capture: later.capture,
            effect: later.effect.or(self.effect),
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetBehavior
// ---------------------------------------------------------------------------

/// Per-kind state machine.
///
/// Events arrive in block-local coordinates. A widget that returns
/// `capture: true` receives every following event of its block until it
/// returns `capture: false`.
pub trait WidgetBehavior {
    fn tag(&self) -> KindTag;

    fn on_event(&mut self, core: &mut WidgetCore, cx: &EventCx<'_>, event: &Event) -> Response;

    /// Re-derive `SELECTED` after the bound value changed. Default: never selected.
    fn on_value_changed(&self, core: &mut WidgetCore) {
        core.flags.remove(WidgetFlags::SELECTED);
    }

    /// Text shown on the widget.
    fn display_text(&self, core: &WidgetCore) -> String {
        core.label.clone()
    }

    /// Keyboard activation. Default: a click at the widget's centre.
    fn on_activate(&mut self, core: &mut WidgetCore, cx: &EventCx<'_>) -> Response {
        let at = core.rect.center();
        let pressed = self.on_event(core, cx, &Event::press(at));
        if pressed.capture && !self.is_editing() && pressed.effect.is_none() {
            let released = self.on_event(core, cx, &Event::release(at));
            return pressed.merge(released);
        }
        pressed
    }

    fn on_draw(&self, core: &WidgetCore, origin: Offset, drawer: &mut dyn DrawAdapter) {
        drawer.draw_widget(&WidgetView::of(self.tag(), core, origin, self.display_text(core)));
    }

    /// Labels and separators are skipped by navigation and hover.
    fn is_interactive(&self) -> bool {
        true
    }

    /// Whether a null binding is a caller bug.
    fn needs_binding(&self) -> bool {
        true
    }

    fn is_editing(&self) -> bool {
        false
    }

    /// Whether `set_value` clamps into the range.
    fn clamps(&self) -> bool {
        false
    }

    /// Whether the widget opens a popup (menus, nested blocks, pickers).
    fn is_opener(&self) -> bool {
        false
    }

    /// Build the popup content, laid out from the block origin.
    fn on_open(&mut self, _core: &WidgetCore, _cx: &EventCx<'_>) -> Option<Block> {
        None
    }

    /// The popup this widget opened has closed.
    fn on_popup_closed(&mut self, _core: &mut WidgetCore, _ok: bool) -> Response {
        Response::ignored()
    }

    /// Enter text editing. Returns whether editing started.
    fn begin_edit(&mut self, _core: &WidgetCore) -> bool {
        false
    }
}

// ===========================================================================
// Tests
// ===========================================================================
