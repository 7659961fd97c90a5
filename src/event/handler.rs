//! Outbound notifications from the kernel to its host.
//!
//! Dispatch never calls back into the host synchronously. Widget retvals,
//! locked-widget messages and redraw requests are queued in an [`Outbox`] that
//! the host drains after each event.

use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// UiEvent
// ---------------------------------------------------------------------------

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A widget committed. `retval` is the caller-defined event id (never 0).
    Fired { retval: i32 },
    /// A locked widget was touched. Nothing changed.
    Locked { message: String },
    /// Visible state changed and the host should call `Ui::draw`.
    Redraw,
}

// ---------------------------------------------------------------------------
// Outbox
// ---------------------------------------------------------------------------

/// FIFO queue of [`UiEvent`]s.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<UiEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    /// Enqueue an event. Consecutive redraw requests collapse into one.
    pub fn push(&mut self, event: UiEvent) {
        if event == UiEvent::Redraw && self.queue.back() == Some(&UiEvent::Redraw) {
            return;
        }
        self.queue.push_back(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<UiEvent> {
        self.queue.drain(..).collect()
    }

    /// Retvals of pending `Fired` events, without draining.
    pub fn fired(&self) -> Vec<i32> {
        self.queue
            .iter()
            .filter_map(|e| match e {
                UiEvent::Fired { retval } => Some(*retval),
                _ => None,
            })
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
