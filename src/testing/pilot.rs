//! Pilot: programmatic interaction with a headless [`Ui`].
//!
//! Input goes through a [`ScriptedInput`], so [`Ui::step`] sees the same
//! polls, timeouts and pending checks it would see from a terminal. Time only
//! moves when the pilot waits.

use std::time::{Duration, Instant};

use crate::app::Ui;
use crate::block::BlockResult;
use crate::config::UiConfig;
use crate::event::{Event, InputSource, Key, Modifiers, ScriptedInput, UiEvent};
use crate::geometry::Offset;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless driver for a [`Ui`].
///
/// # Examples
///
/// ```
/// use blockui::block::Block;
/// use blockui::geometry::Region;
/// use blockui::testing::Pilot;
/// use blockui::widget::Widget;
///
/// let mut pilot = Pilot::default();
/// let mut block = Block::new("tools");
/// block.add(Widget::button("Apply", Region::new(0, 0, 60, 20)).with_retval(4)).unwrap();
/// pilot.ui_mut().add_block(block);
/// pilot.click(10, 10);
/// assert_eq!(pilot.fired(), vec![4]);
/// ```
pub struct Pilot {
    ui: Ui,
    input: ScriptedInput,
}

impl Pilot {
    pub fn new(ui: Ui) -> Self {
        Self { ui, input: ScriptedInput::new() }
    }

    pub fn with_config(config: UiConfig) -> Self {
        Self::new(Ui::new(config))
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// Virtual time.
    pub fn now(&self) -> Instant {
        self.input.now()
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Deliver one event and return the result of routing it.
    pub fn send(&mut self, event: Event) -> BlockResult {
        self.input.push(event);
        let mut last = BlockResult::Nothing;
        while !self.input.is_empty() {
            match self.ui.step(&mut self.input) {
                Ok(Some(result)) => last = result,
                Ok(None) | Err(_) => break,
            }
        }
        last
    }

    pub fn move_to(&mut self, x: i32, y: i32) -> BlockResult {
        self.send(Event::motion(Offset::new(x, y)))
    }

    pub fn press(&mut self, x: i32, y: i32) -> BlockResult {
        self.send(Event::press(Offset::new(x, y)))
    }

    pub fn release(&mut self, x: i32, y: i32) -> BlockResult {
        self.send(Event::release(Offset::new(x, y)))
    }

    /// Move, press and release at one point. Returns the release result.
    pub fn click(&mut self, x: i32, y: i32) -> BlockResult {
        self.move_to(x, y);
        self.press(x, y);
        self.release(x, y)
    }

    /// Press with modifiers held, then release.
    pub fn click_with(&mut self, x: i32, y: i32, modifiers: Modifiers) -> BlockResult {
        let pos = Offset::new(x, y);
        self.move_to(x, y);
        self.send(Event::press(pos).with_modifiers(modifiers));
        self.send(Event::release(pos).with_modifiers(modifiers))
    }

    /// Press at the start, move to the end, release there.
    pub fn drag(&mut self, from: (i32, i32), to: (i32, i32)) -> BlockResult {
        self.move_to(from.0, from.1);
        self.press(from.0, from.1);
        self.move_to(to.0, to.1);
        self.release(to.0, to.1)
    }

    pub fn wheel(&mut self, up: bool) -> BlockResult {
        let pos = self.ui.pointer();
        self.send(Event::wheel(up, pos))
    }

    pub fn press_key(&mut self, key: Key) -> BlockResult {
        self.send(Event::key(key))
    }

    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> BlockResult {
        self.send(Event::key_with(key, modifiers))
    }

    /// Type each character as its own key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Let virtual time pass, firing every timer that falls due.
    /// Returns the last result that was not `Nothing`.
    pub fn wait(&mut self, duration: Duration) -> BlockResult {
        let until = self.now() + duration;
        let mut last = BlockResult::Nothing;
        let mut serviced = None;
        while let Some(due) = self.ui.next_deadline().filter(|due| *due <= until) {
            // A timer that does not move its own deadline would spin forever.
            if serviced == Some(due) {
                break;
            }
            serviced = Some(due);
            self.advance_to(due);
            match self.ui.handle_timeout(due, false) {
                BlockResult::Nothing => {}
                result => last = result,
            }
        }
        self.advance_to(until);
        last
    }

    pub fn wait_ms(&mut self, ms: u64) -> BlockResult {
        self.wait(Duration::from_millis(ms))
    }

    fn advance_to(&mut self, at: Instant) {
        let now = self.now();
        if at > now {
            self.input.advance(at - now);
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Retvals fired so far, without draining.
    pub fn fired(&self) -> Vec<i32> {
        self.ui.ctx.outbox.fired()
    }

    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        self.ui.drain_events()
    }

    /// Number of open popups.
    pub fn depth(&self) -> usize {
        self.ui.depth()
    }

    /// Text rendering of a full draw pass.
    pub fn render(&mut self) -> String {
        super::snapshot::render_ui(&mut self.ui)
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new(Ui::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::geometry::Region;
    use crate::widget::{slot, text_slot, Widget};
    use pretty_assertions::assert_eq;

    // ── Input ────────────────────────────────────────────────────────

    #[test]
    fn click_fires_button() {
        let mut pilot = Pilot::default();
        let mut block = Block::new("tools");
        block.add(Widget::button("Apply", Region::new(0, 0, 60, 20)).with_retval(4)).unwrap();
        pilot.ui_mut().add_block(block);
        assert_eq!(pilot.click(10, 10), BlockResult::ReturnOk);
        assert_eq!(pilot.fired(), vec![4]);
        assert!(pilot.drain_events().contains(&UiEvent::Redraw));
    }

    #[test]
    fn typing_into_a_text_field() {
        let name = text_slot("Cube");
        let mut pilot = Pilot::default();
        let mut block = Block::new("props");
        block.add(Widget::text("Name", Region::new(0, 0, 120, 20), name.clone(), 16).with_retval(2)).unwrap();
        pilot.ui_mut().add_block(block);

        pilot.click(10, 10);
        pilot.press_key_with(Key::Char('a'), Modifiers::CTRL);
        pilot.type_text("Sphere");
        assert_eq!(pilot.press_key(Key::Enter), BlockResult::ReturnOk);
        assert_eq!(*name.borrow(), "Sphere");
        assert_eq!(pilot.fired(), vec![2]);
    }

    // ── Time ─────────────────────────────────────────────────────────

    #[test]
    fn waiting_fires_timers_in_virtual_time() {
        let mut pilot = Pilot::default();
        let mut block = Block::new("header");
        block.add(Widget::menu("Flat|Smooth", Region::new(0, 0, 80, 20), slot(1i32))).unwrap();
        pilot.ui_mut().add_block(block);
        let t0 = pilot.now();

        pilot.move_to(5, 5);
        pilot.wait_ms(499);
        assert_eq!(pilot.depth(), 0);
        assert_eq!(pilot.wait_ms(1), BlockResult::Continue);
        assert_eq!(pilot.depth(), 1);
        assert_eq!(pilot.now() - t0, Duration::from_millis(500));
    }

    #[test]
    fn render_shows_open_popup() {
        let mut pilot = Pilot::with_config(UiConfig::default().with_auto_open(false));
        let mut block = Block::new("header");
        block.add(Widget::menu("Shade%t|Flat|Smooth", Region::new(0, 0, 80, 20), slot(2i32))).unwrap();
        pilot.ui_mut().add_block(block);
        pilot.click(5, 5);
        let text = pilot.render();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("block header "));
        assert!(lines.iter().any(|l| l.starts_with("block menu ")));
        assert!(lines.contains(&"  Label \"Shade\""));
        assert!(lines.iter().any(|l| l.starts_with("  MenuItem \"Smooth\" *")));
    }
}
