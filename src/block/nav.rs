//! Keyboard order over a block's widgets.
//!
//! [`NavChain`] lists the interactive widgets of a block in insertion order.
//! Moving through it wraps at both ends. Labels and separators never take part.

use crate::widget::Widget;

// ---------------------------------------------------------------------------
// NavChain
// ---------------------------------------------------------------------------

/// Ordered indices of interactive widgets plus the current position.
#[derive(Debug, Default)]
pub struct NavChain {
    /// Widget indices in navigation order.
    nodes: Vec<usize>,
    /// Position in `nodes` of the active widget.
    current: Option<usize>,
}

impl NavChain {
    /// Build the chain for `widgets`, positioned on `active` if it takes part.
    pub fn build(widgets: &[Widget], active: Option<usize>) -> Self {
        let nodes: Vec<usize> = widgets
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_interactive())
            .map(|(i, _)| i)
            .collect();
        let current = active.and_then(|a| nodes.iter().position(|&n| n == a));
        Self { nodes, current }
    }

    pub fn current(&self) -> Option<usize> {
        self.current.and_then(|pos| self.nodes.get(pos).copied())
    }

    /// Step forward, wrapping. With nothing active the first widget is next.
    pub fn next(&mut self) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(pos) => (pos + 1) % self.nodes.len(),
            None => 0,
        };
        self.current = Some(next);
        self.nodes.get(next).copied()
    }

    /// Step backward, wrapping. With nothing active the last widget is next.
    pub fn previous(&mut self) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.nodes.len() - 1,
            Some(pos) => pos - 1,
        };
        self.current = Some(prev);
        self.nodes.get(prev).copied()
    }

    /// The `n`th interactive widget, counting from 1.
    pub fn nth(&self, n: usize) -> Option<usize> {
        n.checked_sub(1).and_then(|i| self.nodes.get(i).copied())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
