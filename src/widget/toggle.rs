//! Toggles, bit toggles and radio rows. All act on press.

use crate::event::Event;

use super::behavior::{EventCx, Response, WidgetBehavior};
use super::{KindTag, WidgetCore, WidgetFlags};

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

/// Flips between `range.min` (off) and `range.max` (on).
#[derive(Debug)]
pub struct Toggle {
    pub inverted: bool,
}

impl Toggle {
    pub fn new(inverted: bool) -> Self {
        Self { inverted }
    }
}

impl WidgetBehavior for Toggle {
    fn tag(&self) -> KindTag {
        KindTag::Toggle
    }

    fn on_event(&mut self, core: &mut WidgetCore, _cx: &EventCx<'_>, event: &Event) -> Response {
        if !(event.is_left_press() && core.rect.contains(event.pos)) {
            return Response::ignored();
        }
        let off = core.range.min;
        let next = if core.binding.get() == off { core.range.max } else { off };
        core.binding.set(next);
        self.on_value_changed(core);
        Response::fired()
    }

    fn on_value_changed(&self, core: &mut WidgetCore) {
        let on = core.binding.get() != core.range.min;
        core.flags.set(WidgetFlags::SELECTED, on != self.inverted);
    }
}

// ---------------------------------------------------------------------------
// ToggleBit
// ---------------------------------------------------------------------------

/// Flips one bit of integer storage.
///
/// The exclusive variant replaces the whole value with this bit, unless Shift
/// is held, which flips it like the plain variant.
#[derive(Debug)]
pub struct ToggleBit {
    pub bit: u8,
    pub inverted: bool,
    pub exclusive: bool,
}

impl ToggleBit {
    pub fn new(bit: u8) -> Self {
        Self { bit: bit.min(31), inverted: false, exclusive: false }
    }

    fn mask(&self) -> u32 {
        1u32 << self.bit
    }
}

impl WidgetBehavior for ToggleBit {
    fn tag(&self) -> KindTag {
        KindTag::ToggleBit
    }

    fn on_event(&mut self, core: &mut WidgetCore, _cx: &EventCx<'_>, event: &Event) -> Response {
        if !(event.is_left_press() && core.rect.contains(event.pos)) {
            return Response::ignored();
        }
        let bits = core.binding.bits();
        let next = if self.exclusive && !event.modifiers.shift() { self.mask() } else { bits ^ self.mask() };
        core.binding.set_bits(next);
        self.on_value_changed(core);
        Response::fired()
    }

    fn on_value_changed(&self, core: &mut WidgetCore) {
        let set = core.binding.bits() & self.mask() != 0;
        core.flags.set(WidgetFlags::SELECTED, set != self.inverted);
    }
}

// ---------------------------------------------------------------------------
// RadioRow
// ---------------------------------------------------------------------------

/// One option of a radio group: group id in `range.min`, own value in `range.max`.
///
/// Exclusion is not done here. After the value changes the block refreshes
/// the widgets sharing this storage, skipping radio rows of other groups, and
/// each one re-derives its own selected flag.
#[derive(Debug, Default)]
pub struct RadioRow;

impl WidgetBehavior for RadioRow {
    fn tag(&self) -> KindTag {
        KindTag::RadioRow
    }

    fn on_event(&mut self, core: &mut WidgetCore, _cx: &EventCx<'_>, event: &Event) -> Response {
        if !(event.is_left_press() && core.rect.contains(event.pos)) {
            return Response::ignored();
        }
        core.binding.set(core.range.max);
        self.on_value_changed(core);
        Response::fired()
    }

    fn on_value_changed(&self, core: &mut WidgetCore) {
        let selected = core.binding.get() == core.range.max;
        core.flags.set(WidgetFlags::SELECTED, selected);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
