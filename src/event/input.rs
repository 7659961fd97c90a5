//! Raw input events as the kernel sees them.
//!
//! An [`Event`] is a device code, a transition value, the modifier qualifiers
//! held at the time, and the pointer position. Positions are screen pixels when
//! they come from an [`InputSource`](super::source::InputSource); the block
//! stack rewrites them into block-local coordinates before dispatch.
//!
//! Crossterm events convert through [`Event::from_crossterm`] so the rest of the
//! kernel never depends on crossterm directly.

use std::ops::{BitAnd, BitOr};

use crate::geometry::{Offset, Size};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    /// The 1-based shortcut number of a digit key: `'1'..='9'` map to 1..=9, `'0'` to 10.
    pub fn digit_shortcut(self) -> Option<usize> {
        match self {
            Key::Char('0') => Some(10),
            Key::Char(c @ '1'..='9') => Some(c as usize - '0' as usize),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier qualifier bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn shift(self) -> bool {
        self.contains(Modifiers::SHIFT)
    }

    pub fn ctrl(self) -> bool {
        self.contains(Modifiers::CTRL)
    }

    pub fn alt(self) -> bool {
        self.contains(Modifiers::ALT)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Code / Value
// ---------------------------------------------------------------------------

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Which device input produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    Key(Key),
    Button(PointerButton),
    Motion,
    WheelUp,
    WheelDown,
}

/// Transition carried by the event. Motion and wheel events are always `Press`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Press,
    Release,
    Repeat,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub code: Code,
    pub value: Value,
    pub modifiers: Modifiers,
    pub pos: Offset,
}

impl Event {
    pub fn new(code: Code, value: Value, modifiers: Modifiers, pos: Offset) -> Self {
        Self { code, value, modifiers, pos }
    }

    /// A key press with no modifiers at the origin. The runner stamps the pointer position.
    pub fn key(key: Key) -> Self {
        Self::new(Code::Key(key), Value::Press, Modifiers::NONE, Offset::ZERO)
    }

    pub fn key_with(key: Key, modifiers: Modifiers) -> Self {
        Self::new(Code::Key(key), Value::Press, modifiers, Offset::ZERO)
    }

    /// Left-button press at `pos`.
    pub fn press(pos: Offset) -> Self {
        Self::new(Code::Button(PointerButton::Left), Value::Press, Modifiers::NONE, pos)
    }

    /// Left-button release at `pos`.
    pub fn release(pos: Offset) -> Self {
        Self::new(Code::Button(PointerButton::Left), Value::Release, Modifiers::NONE, pos)
    }

    pub fn motion(pos: Offset) -> Self {
        Self::new(Code::Motion, Value::Press, Modifiers::NONE, pos)
    }

    pub fn wheel(up: bool, pos: Offset) -> Self {
        let code = if up { Code::WheelUp } else { Code::WheelDown };
        Self::new(code, Value::Press, Modifiers::NONE, pos)
    }

    /// Replace the modifiers (builder).
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_pos(mut self, pos: Offset) -> Self {
        self.pos = pos;
        self
    }

    /// The same event with its position shifted by `-origin`.
    pub fn localized(self, origin: Offset) -> Self {
        self.with_pos(self.pos - origin)
    }

    // ── Classification ───────────────────────────────────────────────

    pub fn key_code(&self) -> Option<Key> {
        match self.code {
            Code::Key(k) => Some(k),
            _ => None,
        }
    }

    /// A key press or auto-repeat of `key`.
    pub fn is_key(&self, key: Key) -> bool {
        self.code == Code::Key(key) && self.value != Value::Release
    }

    pub fn is_motion(&self) -> bool {
        self.code == Code::Motion
    }

    pub fn is_pointer_press(&self) -> bool {
        matches!(self.code, Code::Button(_)) && self.value == Value::Press
    }

    pub fn is_pointer_release(&self) -> bool {
        matches!(self.code, Code::Button(_)) && self.value == Value::Release
    }

    pub fn is_left_press(&self) -> bool {
        self.code == Code::Button(PointerButton::Left) && self.value == Value::Press
    }

    pub fn is_left_release(&self) -> bool {
        self.code == Code::Button(PointerButton::Left) && self.value == Value::Release
    }

    pub fn is_wheel(&self) -> bool {
        matches!(self.code, Code::WheelUp | Code::WheelDown)
    }

    /// Whether this event moves or presses the pointer.
    pub fn is_pointer(&self) -> bool {
        matches!(self.code, Code::Button(_) | Code::Motion | Code::WheelUp | Code::WheelDown)
    }

    // ── crossterm ────────────────────────────────────────────────────

    /// Convert a crossterm event. Terminal cells are scaled by `cell` to pixels.
    ///
    /// Returns `None` for resize, focus and paste events, which the kernel ignores.
    pub fn from_crossterm(event: crossterm::event::Event, cell: Size) -> Option<Event> {
        use crossterm::event::{Event as CtEvent, KeyEventKind, MouseEventKind};

        match event {
            CtEvent::Key(ke) => {
                let key = convert_key(ke.code)?;
                let value = match ke.kind {
                    KeyEventKind::Press => Value::Press,
                    KeyEventKind::Repeat => Value::Repeat,
                    KeyEventKind::Release => Value::Release,
                };
                Some(Event::new(Code::Key(key), value, convert_modifiers(ke.modifiers), Offset::ZERO))
            }
            CtEvent::Mouse(me) => {
                let pos = Offset::new(me.column as i32 * cell.width, me.row as i32 * cell.height);
                let (code, value) = match me.kind {
                    MouseEventKind::Down(b) => (Code::Button(convert_button(b)), Value::Press),
                    MouseEventKind::Up(b) => (Code::Button(convert_button(b)), Value::Release),
                    MouseEventKind::Drag(_) | MouseEventKind::Moved => (Code::Motion, Value::Press),
                    MouseEventKind::ScrollUp => (Code::WheelUp, Value::Press),
                    MouseEventKind::ScrollDown => (Code::WheelDown, Value::Press),
                    _ => return None,
                };
                Some(Event::new(code, value, convert_modifiers(me.modifiers), pos))
            }
            _ => None,
        }
    }
}

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;

    let mut out = Modifiers::NONE;
    if m.contains(KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(code: crossterm::event::KeyCode) -> Option<Key> {
    use crossterm::event::KeyCode;

    Some(match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    })
}

fn convert_button(b: crossterm::event::MouseButton) -> PointerButton {
    match b {
        crossterm::event::MouseButton::Left => PointerButton::Left,
        crossterm::event::MouseButton::Right => PointerButton::Right,
        crossterm::event::MouseButton::Middle => PointerButton::Middle,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
