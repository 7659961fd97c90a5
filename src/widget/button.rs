//! Push buttons, menu items and the two display-only kinds.

use crate::event::{Event, Key};

use super::behavior::{EventCx, Response, WidgetBehavior};
use super::{KindTag, WidgetCore, WidgetFlags};

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// Fires on release inside. While held, `SELECTED` tracks whether the pointer
/// is still over the button. Escape lets go without firing.
#[derive(Debug, Default)]
pub struct Button {
    held: bool,
}

impl Button {
    pub fn new() -> Self {
        Self { held: false }
    }
}

impl WidgetBehavior for Button {
    fn tag(&self) -> KindTag {
        KindTag::Button
    }

    fn on_event(&mut self, core: &mut WidgetCore, _cx: &EventCx<'_>, event: &Event) -> Response {
        let inside = core.rect.contains(event.pos);
        if !self.held {
            if event.is_left_press() && inside {
                self.held = true;
                core.flags.insert(WidgetFlags::SELECTED);
                return Response::captured();
            }
            return Response::ignored();
        }
        if event.is_key(Key::Escape) {
            self.held = false;
            core.flags.remove(WidgetFlags::SELECTED);
            return Response::consumed();
        }
        if event.is_motion() {
            core.flags.set(WidgetFlags::SELECTED, inside);
            return Response::captured();
        }
        if event.is_left_release() {
            self.held = false;
            core.flags.remove(WidgetFlags::SELECTED);
            if inside {
                return Response { consumed: true, fired: true, ..Response::default() };
            }
            return Response::consumed();
        }
        Response::captured()
    }

    fn needs_binding(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// MenuItem
// ---------------------------------------------------------------------------

/// An entry in a menu popup. Its item value lives in `range.min`.
#[derive(Debug, Default)]
pub struct MenuItem;

impl WidgetBehavior for MenuItem {
    fn tag(&self) -> KindTag {
        KindTag::MenuItem
    }

    fn on_event(&mut self, core: &mut WidgetCore, _cx: &EventCx<'_>, event: &Event) -> Response {
        if !core.rect.contains(event.pos) {
            return if event.is_left_release() { Response::consumed() } else { Response::ignored() };
        }
        if event.is_left_press() {
            return Response::captured();
        }
        if event.is_left_release() {
            core.binding.set(core.range.min);
            self.on_value_changed(core);
            return Response::fired();
        }
        Response::ignored()
    }

    fn on_value_changed(&self, core: &mut WidgetCore) {
        let selected = core.binding.get() == core.range.min;
        core.flags.set(WidgetFlags::SELECTED, selected);
    }
}

// ---------------------------------------------------------------------------
// Label / Separator
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Label;

impl WidgetBehavior for Label {
    fn tag(&self) -> KindTag {
        KindTag::Label
    }

    fn on_event(&mut self, _core: &mut WidgetCore, _cx: &EventCx<'_>, _event: &Event) -> Response {
        Response::ignored()
    }

    fn is_interactive(&self) -> bool {
        false
    }

    fn needs_binding(&self) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct Separator;

impl WidgetBehavior for Separator {
    fn tag(&self) -> KindTag {
        KindTag::Separator
    }

    fn on_event(&mut self, _core: &mut WidgetCore, _cx: &EventCx<'_>, _event: &Event) -> Response {
        Response::ignored()
    }

    fn display_text(&self, _core: &WidgetCore) -> String {
        String::new()
    }

    fn is_interactive(&self) -> bool {
        false
    }

    fn needs_binding(&self) -> bool {
        false
    }
}

// ===========================================================================
// Tests
// ===========================================================================
