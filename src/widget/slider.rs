//! Sliders and number fields: drag-to-change with modifier snapping.
//!
//! Both map horizontal pointer travel to a fraction of the range and add it to
//! the fraction at press time. Ctrl rounds to the coarse step, Ctrl+Shift to a
//! tenth of it. A release without travel nudges the value by one unit instead.
//! Escape during a drag puts back the value from press time.

use crate::event::{Event, Key, Modifiers};
use crate::geometry::Offset;
use crate::render::{DrawAdapter, WidgetView};

use super::behavior::{EventCx, Response, WidgetBehavior};
use super::text::{commit_number, draw_edit, finish_edit, number_text, TextEdit};
use super::value::format_number;
use super::{KindTag, WidgetCore};

/// Pointer state between press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    start_x: i32,
    start_fraction: f64,
    start_value: f64,
    /// Whether the pointer has travelled far enough to count as a drag.
    moved: bool,
}

impl Drag {
    fn new(core: &WidgetCore, x: i32) -> Self {
        let value = core.value();
        Self { start_x: x, start_fraction: core.range.fraction(value), start_value: value, moved: false }
    }

    /// Abandon the drag: restore the press-time value and let go of the pointer.
    fn cancel(self, core: &mut WidgetCore) -> Response {
        let changed = core.value() != self.start_value;
        if changed {
            core.binding.set(self.start_value);
        }
        Response::consumed().with_changed(changed)
    }
}

/// Apply a drag fraction to the bound value. Returns whether it changed.
fn drag_to(core: &mut WidgetCore, fraction: f64, modifiers: Modifiers) -> bool {
    let range = core.range;
    let integer = core.is_integer();
    let mut v = range.min + fraction.clamp(0.0, 1.0) * range.span();
    if modifiers.ctrl() {
        v = range.snap(v, integer, modifiers.shift());
    } else if integer {
        v = v.round();
    }
    let v = range.clamp(v);
    if v == core.value() {
        return false;
    }
    core.binding.set(v);
    true
}

/// Step the value by `delta`, clamped. Returns whether it changed.
fn nudge(core: &mut WidgetCore, delta: f64) -> bool {
    let before = core.value();
    let v = core.range.clamp(before + delta);
    core.binding.set(v);
    core.value() != before
}

// ---------------------------------------------------------------------------
// Slider
// ---------------------------------------------------------------------------

/// A bar slider. The whole width (less a 5 px knob) spans the range.
#[derive(Debug, Default)]
pub struct Slider {
    drag: Option<Drag>,
}

impl Slider {
    pub fn new() -> Self {
        Self { drag: None }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn divisor(core: &WidgetCore, modifiers: Modifiers) -> f64 {
        let d = f64::from((core.rect.width - 5).max(1));
        if modifiers.shift() {
            d * 10.0
        } else {
            d
        }
    }
}

impl WidgetBehavior for Slider {
    fn tag(&self) -> KindTag {
        KindTag::Slider
    }

    fn on_event(&mut self, core: &mut WidgetCore, _cx: &EventCx<'_>, event: &Event) -> Response {
        let Some(drag) = self.drag.as_mut() else {
            if event.is_left_press() && core.rect.contains(event.pos) {
                self.drag = Some(Drag::new(core, event.pos.x));
                return Response::captured();
            }
            return Response::ignored();
        };
        if event.is_key(Key::Escape) {
            let drag = *drag;
            self.drag = None;
            return drag.cancel(core);
        }
        if event.is_motion() {
            if event.pos.x == drag.start_x && !drag.moved {
                return Response::captured();
            }
            drag.moved = true;
            let dx = f64::from(event.pos.x - drag.start_x);
            let fraction = drag.start_fraction + dx / Self::divisor(core, event.modifiers);
            let changed = drag_to(core, fraction, event.modifiers);
            return Response::captured().with_changed(changed);
        }
        if event.is_left_release() {
            let moved = drag.moved;
            self.drag = None;
            let mut changed = false;
            if !moved {
                let span = core.range.span();
                let unit = if core.is_integer() { 1.0 } else { span / 100.0 };
                let local = f64::from(event.pos.x - core.rect.x) / Self::divisor(core, Modifiers::NONE);
                let target = core.range.min + local.clamp(0.0, 1.0) * span;
                let current = core.value();
                if target < current {
                    changed = nudge(core, -unit);
                } else if target > current {
                    changed = nudge(core, unit);
                }
            }
            return Response { consumed: true, fired: true, changed, ..Response::default() };
        }
        Response::captured()
    }

    fn display_text(&self, core: &WidgetCore) -> String {
        number_text(core)
    }

    fn clamps(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// NumberField
// ---------------------------------------------------------------------------

/// A number box: drag horizontally to change, click the side thirds to step,
/// click the middle (or Shift-click) to type.
#[derive(Debug, Default)]
pub struct NumberField {
    drag: Option<Drag>,
    edit: Option<TextEdit>,
}

impl NumberField {
    pub fn new() -> Self {
        Self { drag: None, edit: None }
    }

    fn divisor(core: &WidgetCore, base: f32, modifiers: Modifiers) -> f64 {
        let mut d = f64::from(base);
        if core.is_integer() {
            let span = core.range.span();
            if span < 25.0 {
                d = 50.0;
            } else if span < 100.0 {
                d = 200.0;
            }
        }
        if modifiers.shift() {
            d *= 10.0;
        }
        if modifiers.alt() {
            d *= 20.0;
        }
        d
    }

    /// One step of a side-third click.
    fn unit(core: &WidgetCore) -> f64 {
        if core.is_integer() {
            1.0
        } else {
            core.range.coarse_step(false) / 10.0
        }
    }
}

impl WidgetBehavior for NumberField {
    fn tag(&self) -> KindTag {
        KindTag::NumberField
    }

    fn on_event(&mut self, core: &mut WidgetCore, cx: &EventCx<'_>, event: &Event) -> Response {
        if let Some(edit) = self.edit.as_mut() {
            let inside = core.rect.contains(event.pos);
            let outcome = edit.apply(event, inside);
            let core_ref = &*core;
            let mut r = finish_edit(outcome, &mut self.edit, |text| commit_number(core_ref, text));
            if event.is_pointer_press() && !inside {
                r.consumed = false;
            }
            return r;
        }
        let Some(drag) = self.drag.as_mut() else {
            if !(event.is_left_press() && core.rect.contains(event.pos)) {
                return Response::ignored();
            }
            if event.modifiers.shift() {
                self.begin_edit(core);
            } else {
                self.drag = Some(Drag::new(core, event.pos.x));
            }
            return Response::captured();
        };
        if event.is_key(Key::Escape) {
            let drag = *drag;
            self.drag = None;
            return drag.cancel(core);
        }
        if event.is_motion() {
            let dx = event.pos.x - drag.start_x;
            if !drag.moved && dx.abs() <= cx.config.drag_lock_px {
                return Response::captured();
            }
            drag.moved = true;
            let divisor = Self::divisor(core, cx.config.number_drag_divisor, event.modifiers);
            let fraction = drag.start_fraction + f64::from(dx) / divisor;
            let changed = drag_to(core, fraction, event.modifiers);
            return Response::captured().with_changed(changed);
        }
        if event.is_left_release() {
            let moved = drag.moved;
            self.drag = None;
            if moved {
                return Response { consumed: true, fired: true, ..Response::default() };
            }
            let changed = match core.rect.third(event.pos.x) {
                -1 => nudge(core, -Self::unit(core)),
                1 => nudge(core, Self::unit(core)),
                _ => {
                    self.begin_edit(core);
                    return Response::captured();
                }
            };
            return Response { consumed: true, fired: true, changed, ..Response::default() };
        }
        Response::captured()
    }

    fn display_text(&self, core: &WidgetCore) -> String {
        match &self.edit {
            Some(edit) => edit.text().to_owned(),
            None => number_text(core),
        }
    }

    fn on_draw(&self, core: &WidgetCore, origin: Offset, drawer: &mut dyn DrawAdapter) {
        match &self.edit {
            Some(edit) => draw_edit(self.tag(), core, origin, edit, drawer),
            None => drawer.draw_widget(&WidgetView::of(self.tag(), core, origin, self.display_text(core))),
        }
    }

    fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    fn clamps(&self) -> bool {
        true
    }

    fn begin_edit(&mut self, core: &WidgetCore) -> bool {
        self.drag = None;
        if self.edit.is_none() {
            let precision = if core.is_integer() { 0 } else { core.range.precision };
            self.edit = Some(TextEdit::new(format_number(core.value(), precision), 0));
        }
        true
    }
}

// ---------------------------------------------------------------------------
// NumberSlider
// ---------------------------------------------------------------------------

/// A labelled slider: the left half types, the right half slides.
#[derive(Debug, Default)]
pub struct NumberSlider {
    slider: Slider,
    edit: Option<TextEdit>,
}

impl NumberSlider {
    pub fn new() -> Self {
        Self { slider: Slider::new(), edit: None }
    }
}

impl WidgetBehavior for NumberSlider {
    fn tag(&self) -> KindTag {
        KindTag::NumberSlider
    }

    fn on_event(&mut self, core: &mut WidgetCore, cx: &EventCx<'_>, event: &Event) -> Response {
        if let Some(edit) = self.edit.as_mut() {
            let inside = core.rect.contains(event.pos);
            let outcome = edit.apply(event, inside);
            let core_ref = &*core;
            let mut r = finish_edit(outcome, &mut self.edit, |text| commit_number(core_ref, text));
            if event.is_pointer_press() && !inside {
                r.consumed = false;
            }
            return r;
        }
        if !self.slider.is_dragging()
            && event.is_left_press()
            && core.rect.contains(event.pos)
            && event.pos.x < core.rect.center().x
        {
            self.begin_edit(core);
            return Response::captured();
        }
        // The slider half spans only the right half of the rect.
        let full = core.rect;
        let half = full.width / 2;
        core.rect.x += half;
        core.rect.width -= half;
        let r = self.slider.on_event(core, cx, event);
        core.rect = full;
        r
    }

    fn display_text(&self, core: &WidgetCore) -> String {
        match &self.edit {
            Some(edit) => edit.text().to_owned(),
            None => number_text(core),
        }
    }

    fn on_draw(&self, core: &WidgetCore, origin: Offset, drawer: &mut dyn DrawAdapter) {
        match &self.edit {
            Some(edit) => draw_edit(self.tag(), core, origin, edit, drawer),
            None => drawer.draw_widget(&WidgetView::of(self.tag(), core, origin, self.display_text(core))),
        }
    }

    fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    fn clamps(&self) -> bool {
        true
    }

    fn begin_edit(&mut self, core: &WidgetCore) -> bool {
        if self.edit.is_none() {
            let precision = if core.is_integer() { 0 } else { core.range.precision };
            self.edit = Some(TextEdit::new(format_number(core.value(), precision), 0));
        }
        true
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::config::UiConfig;
    use crate::geometry::Region;
    use crate::widget::{slot, Widget};

    fn drive(w: &mut Widget, events: &[Event]) -> Vec<Response> {
        let config = UiConfig::default();
        let cx = EventCx::new(&config, Offset::ZERO, false, Instant::now());
        events.iter().map(|e| w.handle(&cx, e)).collect()
    }

    fn at(x: i32) -> Offset {
        Offset::new(x, 5)
    }

    // ── Slider ───────────────────────────────────────────────────────

    #[test]
    fn slider_drag_maps_travel_to_range() {
        let s = slot(0.0f32);
        let mut w = Widget::slider("a", Region::new(0, 0, 105, 20), s.clone(), 0.0, 1.0);
        drive(&mut w, &[Event::press(at(10)), Event::motion(at(60))]);
        assert!((s.get() - 0.5).abs() < 1e-6);
        let r = drive(&mut w, &[Event::release(at(60))]);
        assert!(r[0].fired);
    }

    #[test]
    fn slider_drag_clamps_at_ends() {
        let s = slot(50i32);
        let mut w = Widget::slider("a", Region::new(0, 0, 105, 20), s.clone(), 0.0, 100.0);
        drive(&mut w, &[Event::press(at(50)), Event::motion(at(400))]);
        assert_eq!(s.get(), 100);
        drive(&mut w, &[Event::motion(at(-400))]);
        assert_eq!(s.get(), 0);
    }

    #[test]
    fn slider_ctrl_snaps_to_declared_step() {
        let s = slot(0.0f32);
        let mut w = Widget::slider("a", Region::new(0, 0, 105, 20), s.clone(), 0.0, 10.0).with_step(2.5);
        let ctrl = Modifiers::CTRL;
        drive(&mut w, &[Event::press(at(0)), Event::motion(at(33)).with_modifiers(ctrl)]);
        assert_eq!(s.get(), 2.5);
    }

    #[test]
    fn slider_click_nudges_toward_pointer() {
        let s = slot(5i32);
        let mut w = Widget::slider("a", Region::new(0, 0, 105, 20), s.clone(), 0.0, 10.0);
        drive(&mut w, &[Event::press(at(90)), Event::release(at(90))]);
        assert_eq!(s.get(), 6);
        drive(&mut w, &[Event::press(at(2)), Event::release(at(2))]);
        assert_eq!(s.get(), 5);
    }

    #[test]
    fn slider_escape_restores_and_lets_go() {
        let s = slot(2i32);
        let mut w = Widget::slider("a", Region::new(0, 0, 105, 20), s.clone(), 0.0, 10.0);
        drive(&mut w, &[Event::press(at(20)), Event::motion(at(70))]);
        assert_eq!(s.get(), 7);
        let r = drive(&mut w, &[Event::key(Key::Escape)]);
        assert!(r[0].consumed && r[0].changed);
        assert!(!r[0].fired && !r[0].capture);
        assert_eq!(s.get(), 2);
        let r = drive(&mut w, &[Event::motion(at(100))]);
        assert!(!r[0].consumed);
        assert_eq!(s.get(), 2);
    }

    // ── NumberField ──────────────────────────────────────────────────

    #[test]
    fn number_drag_waits_for_lock() {
        let s = slot(10i32);
        let mut w = Widget::number("n", Region::new(0, 0, 90, 20), s.clone(), 0.0, 20.0);
        drive(&mut w, &[Event::press(at(45)), Event::motion(at(47))]);
        assert_eq!(s.get(), 10);
        // Integer range < 25 uses a divisor of 50: 25 px is half the range.
        drive(&mut w, &[Event::motion(at(70))]);
        assert_eq!(s.get(), 20);
    }

    #[test]
    fn number_escape_ends_drag() {
        let s = slot(10i32);
        let mut w = Widget::number("n", Region::new(0, 0, 90, 20), s.clone(), 0.0, 20.0);
        drive(&mut w, &[Event::press(at(45)), Event::motion(at(70))]);
        assert_eq!(s.get(), 20);
        let r = drive(&mut w, &[Event::key(Key::Escape), Event::motion(at(20)), Event::release(at(20))]);
        assert!(!r[0].capture && !r[0].fired);
        assert!(!r[1].consumed && !r[2].fired);
        assert_eq!(s.get(), 10);
        assert!(!w.is_editing());
    }

    #[test]
    fn number_side_thirds_step() {
        let s = slot(3i32);
        let mut w = Widget::number("n", Region::new(0, 0, 90, 20), s.clone(), 0.0, 10.0);
        let r = drive(&mut w, &[Event::press(at(80)), Event::release(at(80))]);
        assert!(r[1].fired);
        assert_eq!(s.get(), 4);
        drive(&mut w, &[Event::press(at(5)), Event::release(at(5))]);
        drive(&mut w, &[Event::press(at(5)), Event::release(at(5))]);
        assert_eq!(s.get(), 2);
    }

    #[test]
    fn number_middle_click_types() {
        let s = slot(1.5f32);
        let mut w = Widget::number("n", Region::new(0, 0, 90, 20), s.clone(), 0.0, 10.0);
        drive(&mut w, &[Event::press(at(45)), Event::release(at(45))]);
        assert!(w.is_editing());
        let mut keys: Vec<Event> = "7.25".chars().map(|c| Event::key(Key::Char(c))).collect();
        keys.push(Event::key(Key::Enter));
        let r = drive(&mut w, &keys);
        assert!(r.last().is_some_and(|r| r.fired));
        assert_eq!(s.get(), 7.25);
    }

    #[test]
    fn number_text_clamps_and_rejects_garbage() {
        let s = slot(4i32);
        let mut w = Widget::number("n", Region::new(0, 0, 90, 20), s.clone(), 0.0, 10.0);
        drive(&mut w, &[Event::press(at(45)).with_modifiers(Modifiers::SHIFT)]);
        drive(&mut w, &[Event::key(Key::Char('9')), Event::key(Key::Char('9')), Event::key(Key::Enter)]);
        assert_eq!(s.get(), 10);
        drive(&mut w, &[Event::press(at(45)).with_modifiers(Modifiers::SHIFT)]);
        let r = drive(&mut w, &[Event::key(Key::Char('x')), Event::key(Key::Enter)]);
        assert!(!r[1].fired);
        assert_eq!(s.get(), 10);
    }

    // ── NumberSlider ─────────────────────────────────────────────────

    #[test]
    fn number_slider_halves() {
        let s = slot(0.0f32);
        let mut w = Widget::number_slider("n", Region::new(0, 0, 210, 20), s.clone(), 0.0, 1.0);
        drive(&mut w, &[Event::press(at(10))]);
        assert!(w.is_editing());
        drive(&mut w, &[Event::key(Key::Escape)]);
        assert!(!w.is_editing());
        drive(&mut w, &[Event::press(at(110)), Event::motion(at(160)), Event::release(at(160))]);
        assert!((s.get() - 0.5).abs() < 1e-6);
    }
}
