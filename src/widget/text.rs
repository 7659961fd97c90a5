//! Text editing: the [`TextEdit`] buffer and the text field widget.
//!
//! The cursor and the selection anchor are byte offsets into the buffer and
//! always sit on char boundaries.

use crate::event::{Event, Key};
use crate::geometry::Offset;
use crate::render::{DrawAdapter, WidgetView};

use super::behavior::{Effect, EventCx, Response, WidgetBehavior};
use super::value::format_number;
use super::{KindTag, WidgetCore};

// ---------------------------------------------------------------------------
// TextEdit
// ---------------------------------------------------------------------------

/// How an edit session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Still editing.
    Continue,
    /// Enter, or a press outside.
    Commit,
    /// Tab: commit and move on.
    CommitNext,
    /// Escape: restore the backup.
    Cancel,
}

/// An edit buffer with cursor, selection and a backup of the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    buffer: String,
    cursor: usize,
    anchor: Option<usize>,
    backup: String,
    max_len: usize,
}

impl TextEdit {
    /// Start editing `text`, everything selected.
    pub fn new(text: impl Into<String>, max_len: usize) -> Self {
        let buffer: String = text.into();
        let cursor = buffer.len();
        Self { backup: buffer.clone(), buffer, cursor, anchor: Some(0), max_len }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn backup(&self) -> &str {
        &self.backup
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selected byte range, if non-empty.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.cursor) {
            std::cmp::Ordering::Less => Some((anchor, self.cursor)),
            std::cmp::Ordering::Greater => Some((self.cursor, anchor)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.buffer.len();
    }

    fn delete_selection(&mut self) -> bool {
        match self.selection() {
            Some((start, end)) => {
                self.buffer.drain(start..end);
                self.cursor = start;
                self.anchor = None;
                true
            }
            None => {
                self.anchor = None;
                false
            }
        }
    }

    /// Insert at the cursor, replacing any selection. Refused past `max_len` chars.
    pub fn insert_char(&mut self, ch: char) -> bool {
        self.delete_selection();
        if self.max_len > 0 && self.buffer.chars().count() >= self.max_len {
            return false;
        }
        self.buffer.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        true
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.buffer.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection() || self.cursor >= self.buffer.len() {
            return;
        }
        let next = self.next_boundary();
        self.buffer.drain(self.cursor..next);
    }

    /// Move one char left. With `extend` the selection grows instead of collapsing.
    pub fn move_left(&mut self, extend: bool) {
        self.begin_move(extend);
        if !extend {
            if let Some((start, _)) = self.selection_before_collapse() {
                self.cursor = start;
                return;
            }
        }
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self, extend: bool) {
        self.begin_move(extend);
        if !extend {
            if let Some((_, end)) = self.selection_before_collapse() {
                self.cursor = end;
                return;
            }
        }
        if self.cursor < self.buffer.len() {
            self.cursor = self.next_boundary();
        }
    }

    pub fn move_home(&mut self, extend: bool) {
        self.begin_move(extend);
        self.anchor = if extend { self.anchor } else { None };
        self.cursor = 0;
    }

    pub fn move_end(&mut self, extend: bool) {
        self.begin_move(extend);
        self.anchor = if extend { self.anchor } else { None };
        self.cursor = self.buffer.len();
    }

    fn begin_move(&mut self, extend: bool) {
        if extend && self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
    }

    fn selection_before_collapse(&mut self) -> Option<(usize, usize)> {
        let sel = self.selection();
        self.anchor = None;
        sel
    }

    fn prev_boundary(&self) -> usize {
        let mut pos = self.cursor.saturating_sub(1);
        while pos > 0 && !self.buffer.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    fn next_boundary(&self) -> usize {
        let mut pos = self.cursor + 1;
        while pos < self.buffer.len() && !self.buffer.is_char_boundary(pos) {
            pos += 1;
        }
        pos.min(self.buffer.len())
    }

    /// Apply one block-local event. `inside` tells whether a press hit the widget.
    pub fn apply(&mut self, event: &Event, inside: bool) -> Option<EditOutcome> {
        if event.is_pointer_press() {
            return Some(if inside { EditOutcome::Continue } else { EditOutcome::Commit });
        }
        let key = event.key_code()?;
        if !event.is_key(key) {
            return None;
        }
        let shift = event.modifiers.shift();
        match key {
            Key::Enter => return Some(EditOutcome::Commit),
            Key::Escape => return Some(EditOutcome::Cancel),
            Key::Tab => return Some(EditOutcome::CommitNext),
            Key::Char('a') if event.modifiers.ctrl() => self.select_all(),
            Key::Char(_) if event.modifiers.ctrl() || event.modifiers.alt() => return None,
            Key::Char(c) => {
                self.insert_char(c);
            }
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_forward(),
            Key::Left => self.move_left(shift),
            Key::Right => self.move_right(shift),
            Key::Home => self.move_home(shift),
            Key::End => self.move_end(shift),
            _ => return None,
        }
        Some(EditOutcome::Continue)
    }
}

/// Turn an edit outcome into a response. `commit` writes the buffer and
/// returns whether anything was stored.
pub(crate) fn finish_edit(
    outcome: Option<EditOutcome>,
    edit: &mut Option<TextEdit>,
    commit: impl FnOnce(&str) -> bool,
) -> Response {
    match outcome {
        None => Response::captured(),
        Some(EditOutcome::Continue) => Response::captured(),
        Some(EditOutcome::Cancel) => {
            *edit = None;
            Response::consumed()
        }
        Some(done @ (EditOutcome::Commit | EditOutcome::CommitNext)) => {
            let stored = edit.take().map(|e| commit(e.text())).unwrap_or(false);
            let mut r = if stored { Response::fired() } else { Response::consumed() };
            if done == EditOutcome::CommitNext {
                r = r.with_effect(Effect::EditNext);
            }
            r
        }
    }
}

/// Commit a number typed as text. Unparsable input keeps the old value.
pub(crate) fn commit_number(core: &WidgetCore, text: &str) -> bool {
    match text.trim().parse::<f64>() {
        Ok(v) => {
            core.binding.set(core.range.clamp(v));
            true
        }
        Err(_) => {
            tracing::debug!(input = text, "number edit discarded");
            false
        }
    }
}

/// Text shown for a number widget.
pub(crate) fn number_text(core: &WidgetCore) -> String {
    let value = if core.is_integer() {
        format_number(core.value(), 0)
    } else {
        format_number(core.value(), core.range.precision)
    };
    if core.label.is_empty() {
        value
    } else {
        format!("{}: {}", core.label, value)
    }
}

/// Draw an editing widget with its buffer and cursor.
pub(crate) fn draw_edit(tag: KindTag, core: &WidgetCore, origin: Offset, edit: &TextEdit, drawer: &mut dyn DrawAdapter) {
    let view = WidgetView::of(tag, core, origin, edit.text().to_owned()).with_cursor(edit.cursor(), edit.selection());
    drawer.draw_widget(&view);
}

// ---------------------------------------------------------------------------
// TextField
// ---------------------------------------------------------------------------

/// Single-line text input bound to a text slot.
#[derive(Debug)]
pub struct TextField {
    pub max_len: usize,
    edit: Option<TextEdit>,
}

impl TextField {
    pub fn new(max_len: usize) -> Self {
        Self { max_len, edit: None }
    }

    pub fn edit(&self) -> Option<&TextEdit> {
        self.edit.as_ref()
    }
}

impl WidgetBehavior for TextField {
    fn tag(&self) -> KindTag {
        KindTag::TextField
    }

    fn on_event(&mut self, core: &mut WidgetCore, _cx: &EventCx<'_>, event: &Event) -> Response {
        let inside = core.rect.contains(event.pos);
        let Some(edit) = self.edit.as_mut() else {
            if event.is_left_press() && inside && self.begin_edit(core) {
                return Response::captured();
            }
            return Response::ignored();
        };
        let outcome = edit.apply(event, inside);
        let pressed_outside = event.is_pointer_press() && !inside;
        let binding = &core.binding;
        let mut r = finish_edit(outcome, &mut self.edit, |text| {
            binding.set_text(text);
            true
        });
        if pressed_outside {
            r.consumed = false;
        }
        r
    }

    fn display_text(&self, core: &WidgetCore) -> String {
        match &self.edit {
            Some(edit) => edit.text().to_owned(),
            None => core.binding.text().unwrap_or_default(),
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

    fn begin_edit(&mut self, core: &WidgetCore) -> bool {
        if self.edit.is_none() {
            self.edit = Some(TextEdit::new(core.binding.text().unwrap_or_default(), self.max_len));
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
    use crate::event::Modifiers;
    use crate::geometry::Region;
    use crate::widget::{text_slot, Widget};

    fn typed(edit: &mut TextEdit, s: &str) {
        for c in s.chars() {
            edit.apply(&Event::key(Key::Char(c)), true);
        }
    }

    // ── TextEdit ─────────────────────────────────────────────────────

    #[test]
    fn typing_replaces_initial_selection() {
        let mut e = TextEdit::new("old", 0);
        typed(&mut e, "new");
        assert_eq!(e.text(), "new");
        assert_eq!(e.backup(), "old");
    }

    #[test]
    fn cursor_respects_char_boundaries() {
        let mut e = TextEdit::new("héllo", 0);
        e.move_end(false);
        e.move_left(false);
        e.move_left(false);
        e.move_left(false);
        e.move_left(false);
        assert_eq!(e.cursor(), 1);
        e.delete_forward();
        assert_eq!(e.text(), "hllo");
        e.move_right(false);
        e.backspace();
        assert_eq!(e.text(), "hlo");
    }

    #[test]
    fn shift_home_selects_to_start() {
        let mut e = TextEdit::new("abcdef", 0);
        e.move_end(false);
        e.move_left(false);
        e.move_home(true);
        assert_eq!(e.selection(), Some((0, 5)));
        e.apply(&Event::key(Key::Char('x')), true);
        assert_eq!(e.text(), "xf");
    }

    #[test]
    fn ctrl_a_selects_all() {
        let mut e = TextEdit::new("abc", 0);
        e.move_home(false);
        assert_eq!(e.selection(), None);
        e.apply(&Event::key_with(Key::Char('a'), Modifiers::CTRL), true);
        assert_eq!(e.selection(), Some((0, 3)));
    }

    #[test]
    fn max_len_counts_chars() {
        let mut e = TextEdit::new("", 3);
        typed(&mut e, "ääää");
        assert_eq!(e.text(), "äää");
    }

    #[test]
    fn outcomes() {
        let mut e = TextEdit::new("", 0);
        assert_eq!(e.apply(&Event::key(Key::Enter), true), Some(EditOutcome::Commit));
        assert_eq!(e.apply(&Event::key(Key::Escape), true), Some(EditOutcome::Cancel));
        assert_eq!(e.apply(&Event::key(Key::Tab), true), Some(EditOutcome::CommitNext));
        assert_eq!(e.apply(&Event::press(Offset::ZERO), false), Some(EditOutcome::Commit));
    }

    // ── TextField ────────────────────────────────────────────────────

    fn field() -> (Widget, crate::widget::TextSlot) {
        let t = text_slot("Cube");
        (Widget::text("Name", Region::new(0, 0, 100, 20), t.clone(), 16), t)
    }

    #[test]
    fn enter_commits_buffer() {
        let (mut w, t) = field();
        let config = UiConfig::default();
        let cx = EventCx::new(&config, Offset::ZERO, false, Instant::now());
        assert!(w.handle(&cx, &Event::press(Offset::new(3, 3))).capture);
        assert!(w.is_editing());
        for c in "Sphere".chars() {
            w.handle(&cx, &Event::key(Key::Char(c)));
        }
        assert_eq!(*t.borrow(), "Cube");
        let r = w.handle(&cx, &Event::key(Key::Enter));
        assert!(r.fired && !r.capture);
        assert_eq!(*t.borrow(), "Sphere");
    }

    #[test]
    fn escape_restores() {
        let (mut w, t) = field();
        let config = UiConfig::default();
        let cx = EventCx::new(&config, Offset::ZERO, false, Instant::now());
        w.handle(&cx, &Event::press(Offset::new(3, 3)));
        w.handle(&cx, &Event::key(Key::Backspace));
        assert_eq!(w.display_text(), "");
        let r = w.handle(&cx, &Event::key(Key::Escape));
        assert!(!r.fired && !r.capture);
        assert_eq!(*t.borrow(), "Cube");
        assert_eq!(w.display_text(), "Cube");
    }

    #[test]
    fn press_outside_commits_and_passes_through() {
        let (mut w, t) = field();
        let config = UiConfig::default();
        let cx = EventCx::new(&config, Offset::ZERO, false, Instant::now());
        w.handle(&cx, &Event::press(Offset::new(3, 3)));
        w.handle(&cx, &Event::key(Key::Char('X')));
        let r = w.handle(&cx, &Event::press(Offset::new(300, 3)));
        assert!(r.fired && !r.consumed);
        assert_eq!(*t.borrow(), "X");
    }
}
