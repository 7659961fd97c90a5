//! Input sources: the only way events reach the kernel.
//!
//! [`InputSource::poll_event`] takes an optional timeout and reports
//! [`Polled::Timeout`] when it expires without input. Timers (auto-open,
//! tooltips, the motion-towards budget) are expressed as deadlines the runner
//! turns into that timeout, so no source ever needs to sleep-and-poll.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal,
};

use super::input::Event;
use crate::error::UiError;
use crate::geometry::Size;

// ---------------------------------------------------------------------------
// InputSource
// ---------------------------------------------------------------------------

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled {
    Event(Event),
    /// The timeout elapsed with no input.
    Timeout,
    /// The source is exhausted and will never produce another event.
    Closed,
}

/// A source of input events and of the current time.
pub trait InputSource {
    /// Wait for the next event, at most `timeout` (forever when `None`).
    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Polled, UiError>;

    /// Whether an event is already queued, without consuming it.
    fn has_pending(&mut self) -> bool;

    /// The source's clock. Deadlines are computed against this.
    fn now(&self) -> Instant;
}

// ---------------------------------------------------------------------------
// ScriptedInput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Step {
    Event(Event),
    Wait(Duration),
}

/// A deterministic input source driven by a script of events and pauses.
///
/// Time is virtual: it advances only when the script waits or a poll times out.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    steps: VecDeque<Step>,
    origin: Instant,
    elapsed: Duration,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            origin: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Queue an event (builder).
    pub fn then(mut self, event: Event) -> Self {
        self.push(event);
        self
    }

    /// Queue a pause (builder).
    pub fn then_wait(mut self, duration: Duration) -> Self {
        self.wait(duration);
        self
    }

    pub fn push(&mut self, event: Event) {
        self.steps.push_back(Step::Event(event));
    }

    pub fn wait(&mut self, duration: Duration) {
        self.steps.push_back(Step::Wait(duration));
    }

    /// Advance the virtual clock immediately, outside the script.
    pub fn advance(&mut self, duration: Duration) {
        self.elapsed += duration;
    }

    /// Virtual time since the source was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for ScriptedInput {
    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Polled, UiError> {
        let mut budget = timeout;
        loop {
            match self.steps.pop_front() {
                Some(Step::Event(event)) => return Ok(Polled::Event(event)),
                Some(Step::Wait(pause)) => match budget {
                    Some(left) if left < pause => {
                        self.elapsed += left;
                        self.steps.push_front(Step::Wait(pause - left));
                        return Ok(Polled::Timeout);
                    }
                    Some(left) => {
                        self.elapsed += pause;
                        budget = Some(left - pause);
                    }
                    None => self.elapsed += pause,
                },
                None => {
                    return Ok(match budget {
                        Some(left) => {
                            self.elapsed += left;
                            Polled::Timeout
                        }
                        None => Polled::Closed,
                    });
                }
            }
        }
    }

    fn has_pending(&mut self) -> bool {
        matches!(self.steps.front(), Some(Step::Event(_)))
    }

    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }
}

// ---------------------------------------------------------------------------
// TerminalInput
// ---------------------------------------------------------------------------

/// Live input from the terminal through crossterm.
///
/// Each terminal cell counts as `cell` pixels so pixel-based policy (drag lock,
/// safety margins) keeps its meaning in a character grid.
pub struct TerminalInput {
    cell: Size,
    out: Stdout,
    captured: bool,
}

impl TerminalInput {
    pub fn new(cell: Size) -> Self {
        Self { cell, out: io::stdout(), captured: false }
    }

    /// Enable raw mode and mouse capture. Undone on drop.
    pub fn capture(&mut self) -> Result<(), UiError> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnableMouseCapture)?;
        self.captured = true;
        Ok(())
    }

    /// Disable mouse capture and raw mode.
    pub fn release(&mut self) -> Result<(), UiError> {
        if self.captured {
            execute!(self.out, DisableMouseCapture)?;
            terminal::disable_raw_mode()?;
            self.out.flush()?;
            self.captured = false;
        }
        Ok(())
    }
}

impl InputSource for TerminalInput {
    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Polled, UiError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if let Some(deadline) = deadline {
                let left = deadline.saturating_duration_since(Instant::now());
                if !crossterm::event::poll(left)? {
                    return Ok(Polled::Timeout);
                }
            }
            // Unmapped terminal events (resize, focus) are skipped.
            if let Some(event) = Event::from_crossterm(crossterm::event::read()?, self.cell) {
                return Ok(Polled::Event(event));
            }
        }
    }

    fn has_pending(&mut self) -> bool {
        crossterm::event::poll(Duration::ZERO).unwrap_or(false)
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl Drop for TerminalInput {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::Key;
    use crate::geometry::Offset;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn events_come_out_in_order() {
        let mut src = ScriptedInput::new()
            .then(Event::key(Key::Up))
            .then(Event::key(Key::Down));
        assert_eq!(src.poll_event(None).unwrap(), Polled::Event(Event::key(Key::Up)));
        assert_eq!(src.poll_event(None).unwrap(), Polled::Event(Event::key(Key::Down)));
        assert_eq!(src.poll_event(None).unwrap(), Polled::Closed);
    }

    #[test]
    fn waits_shorter_than_timeout_are_consumed() {
        let mut src = ScriptedInput::new().then_wait(ms(100)).then(Event::motion(Offset::ZERO));
        let start = src.now();
        assert!(matches!(src.poll_event(Some(ms(300))).unwrap(), Polled::Event(_)));
        assert_eq!(src.now() - start, ms(100));
    }

    #[test]
    fn timeout_splits_long_wait() {
        let mut src = ScriptedInput::new().then_wait(ms(500)).then(Event::key(Key::Enter));
        assert_eq!(src.poll_event(Some(ms(200))).unwrap(), Polled::Timeout);
        assert_eq!(src.elapsed(), ms(200));
        assert!(!src.has_pending());
        assert_eq!(src.poll_event(Some(ms(200))).unwrap(), Polled::Timeout);
        assert_eq!(src.poll_event(Some(ms(200))).unwrap(), Polled::Event(Event::key(Key::Enter)));
        assert_eq!(src.elapsed(), ms(500));
    }

    #[test]
    fn empty_script_times_out_with_budget() {
        let mut src = ScriptedInput::new();
        assert_eq!(src.poll_event(Some(ms(50))).unwrap(), Polled::Timeout);
        assert_eq!(src.elapsed(), ms(50));
    }

    #[test]
    fn has_pending_sees_only_events() {
        let mut src = ScriptedInput::new();
        assert!(!src.has_pending());
        src.push(Event::key(Key::Tab));
        assert!(src.has_pending());
    }
}
