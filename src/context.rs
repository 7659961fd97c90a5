//! Per-`Ui` runtime state shared by every block during dispatch.
//!
//! One context lives inside each [`Ui`](crate::app::Ui); blocks receive it by
//! `&mut` while they dispatch. Nothing here is global.

use std::time::Instant;

use crate::event::{Outbox, UiEvent};
use crate::geometry::Region;
use crate::widget::{Callback, Commit};

// ---------------------------------------------------------------------------
// Clipboard
// ---------------------------------------------------------------------------

/// A copied widget value.
#[derive(Debug, Clone, PartialEq)]
pub enum Clip {
    Number(f64),
    Text(String),
    Color([f32; 3]),
}

// ---------------------------------------------------------------------------
// Tooltip
// ---------------------------------------------------------------------------

/// A tooltip waiting for its delay, or on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Screen rect of the widget the tip belongs to.
    pub anchor: Region,
    pub text: String,
    pub due: Instant,
    pub shown: bool,
}

// ---------------------------------------------------------------------------
// UiRuntimeContext
// ---------------------------------------------------------------------------

/// Mutable state that outlives a single dispatch.
#[derive(Default)]
pub struct UiRuntimeContext {
    pub outbox: Outbox,
    lock_message: Option<String>,
    after: Option<(Callback, Commit)>,
    clipboard: Option<Clip>,
    tooltip: Option<Tooltip>,
}

impl UiRuntimeContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Locks ────────────────────────────────────────────────────────

    /// Record that a locked widget was touched.
    pub fn post_lock(&mut self, message: &str) {
        tracing::info!(lock = message, "locked widget touched");
        self.lock_message = Some(message.to_owned());
        self.outbox.push(UiEvent::Locked { message: message.to_owned() });
    }

    /// The most recent lock message.
    pub fn lock_message(&self) -> Option<&str> {
        self.lock_message.as_deref()
    }

    // ── Commits ──────────────────────────────────────────────────────

    /// Report a commit: queue its retval and remember its deferred callback.
    pub fn fire(&mut self, commit: Commit, callback: Option<&Callback>) {
        if commit.retval != 0 {
            self.outbox.push(UiEvent::Fired { retval: commit.retval });
        }
        if let Some(callback) = callback {
            self.after = Some((callback.clone(), commit));
        }
    }

    pub fn has_after(&self) -> bool {
        self.after.is_some()
    }

    /// Take the pending after-callback, leaving none.
    pub fn take_after(&mut self) -> Option<(Callback, Commit)> {
        self.after.take()
    }

    pub fn clear_after(&mut self) {
        self.after = None;
    }

    // ── Clipboard ────────────────────────────────────────────────────

    pub fn copy(&mut self, clip: Clip) {
        self.clipboard = Some(clip);
    }

    pub fn clipboard(&self) -> Option<&Clip> {
        self.clipboard.as_ref()
    }

    // ── Tooltip ──────────────────────────────────────────────────────

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Arm a tip for `anchor` unless one is already armed or shown for it.
    pub fn arm_tooltip(&mut self, anchor: Region, text: String, due: Instant) {
        if self.tooltip.as_ref().is_some_and(|t| t.anchor == anchor && t.text == text) {
            return;
        }
        self.tooltip = Some(Tooltip { anchor, text, due, shown: false });
    }

    /// Show the armed tip if its delay has passed. Returns whether it appeared.
    pub fn reveal_tooltip(&mut self, now: Instant) -> bool {
        match &mut self.tooltip {
            Some(tip) if !tip.shown && tip.due <= now => {
                tip.shown = true;
                true
            }
            _ => false,
        }
    }

    /// Drop the tip. Returns whether one was on screen.
    pub fn hide_tooltip(&mut self) -> bool {
        self.tooltip.take().is_some_and(|t| t.shown)
    }

    /// Deadline of an armed, not yet shown tip.
    pub fn tooltip_deadline(&self) -> Option<Instant> {
        self.tooltip.as_ref().filter(|t| !t.shown).map(|t| t.due)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use pretty_assertions::assert_eq;

    fn commit(retval: i32) -> Commit {
        Commit { retval, value: 1.0, label: "A".into() }
    }

    #[test]
    fn zero_retval_stays_silent() {
        let mut cx = UiRuntimeContext::new();
        cx.fire(commit(0), None);
        cx.fire(commit(7), None);
        assert_eq!(cx.outbox.drain(), vec![UiEvent::Fired { retval: 7 }]);
    }

    #[test]
    fn later_callback_replaces_earlier() {
        let mut cx = UiRuntimeContext::new();
        let cb: Callback = Rc::new(|_| {});
        cx.fire(commit(1), Some(&cb));
        cx.fire(commit(2), Some(&cb));
        let (_, c) = cx.take_after().unwrap();
        assert_eq!(c.retval, 2);
        assert!(!cx.has_after());
    }

    #[test]
    fn lock_is_reported() {
        let mut cx = UiRuntimeContext::new();
        cx.post_lock("Library data");
        assert_eq!(cx.lock_message(), Some("Library data"));
        assert_eq!(cx.outbox.drain(), vec![UiEvent::Locked { message: "Library data".into() }]);
    }

    #[test]
    fn tooltip_waits_for_deadline() {
        let mut cx = UiRuntimeContext::new();
        let t0 = Instant::now();
        cx.arm_tooltip(Region::new(0, 0, 10, 10), "tip".into(), t0 + Duration::from_millis(500));
        assert!(!cx.reveal_tooltip(t0));
        assert_eq!(cx.tooltip_deadline(), Some(t0 + Duration::from_millis(500)));
        assert!(cx.reveal_tooltip(t0 + Duration::from_millis(500)));
        assert_eq!(cx.tooltip_deadline(), None);
        assert!(cx.hide_tooltip());
        assert!(cx.tooltip().is_none());
    }
}
