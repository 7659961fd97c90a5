//! Keyboard navigation bindings.
//!
//! [`KeyMap`] maps key+modifier combinations to the [`NavAction`]s a block
//! dispatcher understands. Digit keys are resolved separately into
//! [`NavAction::Select`] so numeric-select menus work without 20 entries.

use std::collections::HashMap;

use super::input::{Event, Key, Modifiers};

// ---------------------------------------------------------------------------
// NavAction
// ---------------------------------------------------------------------------

/// Block-level keyboard action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    /// Move the active flag to the previous interactive widget (wraps).
    Prev,
    /// Move the active flag to the next interactive widget (wraps).
    Next,
    /// Open the active nested block or menu.
    Open,
    /// Leave a nested popup (returns OUT from a sub-popup).
    Close,
    /// Accept: fire the active widget, or return OK for `ENTER_OK` blocks.
    Accept,
    /// Cancel the top popup.
    Cancel,
    /// Jump to the Nth interactive widget (1-based) in numeric-select blocks.
    Select(usize),
}

// ---------------------------------------------------------------------------
// KeyMap
// ---------------------------------------------------------------------------

/// Registry of navigation bindings.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<(Key, Modifiers), NavAction>,
}

impl KeyMap {
    /// Create an empty key map.
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    /// Standard popup navigation:
    /// - `Up` / `Down` -> Prev / Next
    /// - `Right` -> Open, `Left` -> Close
    /// - `Enter` -> Accept, `Escape` -> Cancel
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.bind(Key::Up, Modifiers::NONE, NavAction::Prev);
        map.bind(Key::Down, Modifiers::NONE, NavAction::Next);
        map.bind(Key::Right, Modifiers::NONE, NavAction::Open);
        map.bind(Key::Left, Modifiers::NONE, NavAction::Close);
        map.bind(Key::Enter, Modifiers::NONE, NavAction::Accept);
        map.bind(Key::Escape, Modifiers::NONE, NavAction::Cancel);
        map
    }

    /// Register a binding, replacing any existing one for the same combination.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: NavAction) {
        self.bindings.insert((key, modifiers), action);
    }

    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<NavAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Resolve an event. Releases never resolve.
    ///
    /// Digit keys become `Select(1..=10)`, or `Select(11..=20)` with Alt held.
    pub fn resolve(&self, event: &Event) -> Option<NavAction> {
        let key = event.key_code()?;
        if !event.is_key(key) {
            return None;
        }
        if let Some(n) = key.digit_shortcut() {
            let n = if event.modifiers.alt() { n + 10 } else { n };
            return Some(NavAction::Select(n));
        }
        self.bindings.get(&(key, event.modifiers)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
