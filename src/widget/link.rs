//! Connector widgets: drag from a [`Link`] onto an [`InboundLink`].
//!
//! The adjacency list is caller storage, like every other binding. A link
//! widget only records the drag; the block resolves the drop target and
//! writes the connection.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{Event, Key};
use crate::geometry::{Offset, Region};
use crate::render::{DrawAdapter, WidgetView};

use super::behavior::{Effect, EventCx, Response, WidgetBehavior};
use super::{KindTag, WidgetCore};

/// Targets an outgoing connector is linked to.
pub type LinkList = Rc<RefCell<Vec<u32>>>;

pub fn link_list(targets: impl IntoIterator<Item = u32>) -> LinkList {
    Rc::new(RefCell::new(targets.into_iter().collect()))
}

/// Where a connector line leaves a link widget.
pub fn link_anchor_out(rect: Region) -> Offset {
    Offset::new(rect.right(), rect.y + rect.height / 2)
}

/// Where a connector line enters an inbound widget.
pub fn link_anchor_in(rect: Region) -> Offset {
    Offset::new(rect.x, rect.y + rect.height / 2)
}

/// Squared distance from `p` to the segment `a`–`b`.
pub fn segment_distance_sq(p: Offset, a: Offset, b: Offset) -> f64 {
    let (px, py) = (f64::from(p.x), f64::from(p.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 { 0.0 } else { (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0) };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    (px - cx) * (px - cx) + (py - cy) * (py - cy)
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// Outgoing connector.
#[derive(Debug)]
pub struct Link {
    pub links: LinkList,
    /// Block-local end of the rubber band while dragging.
    drag: Option<Offset>,
}

impl Link {
    pub fn new(links: LinkList) -> Self {
        Self { links, drag: None }
    }

    pub fn rubber_band(&self) -> Option<Offset> {
        self.drag
    }

    /// Add `target` unless it is already linked. Returns whether it was added.
    pub fn connect(&self, target: u32) -> bool {
        let mut links = self.links.borrow_mut();
        if links.contains(&target) {
            return false;
        }
        links.push(target);
        true
    }

    /// Remove `target`. Returns whether it was linked.
    pub fn disconnect(&self, target: u32) -> bool {
        let mut links = self.links.borrow_mut();
        let before = links.len();
        links.retain(|t| *t != target);
        links.len() != before
    }

    pub fn targets(&self) -> Vec<u32> {
        self.links.borrow().clone()
    }
}

impl WidgetBehavior for Link {
    fn tag(&self) -> KindTag {
        KindTag::Link
    }

    fn on_event(&mut self, core: &mut WidgetCore, _cx: &EventCx<'_>, event: &Event) -> Response {
        if self.drag.is_none() {
            if event.is_left_press() && core.rect.contains(event.pos) {
                self.drag = Some(event.pos);
                return Response::captured();
            }
            return Response::ignored();
        }
        if event.is_key(Key::Escape) {
            self.drag = None;
            return Response::consumed();
        }
        if event.is_motion() {
            self.drag = Some(event.pos);
            return Response::captured();
        }
        if event.is_left_release() {
            self.drag = None;
            return Response::consumed().with_effect(Effect::Connect { at: event.pos });
        }
        Response::captured()
    }

    fn on_draw(&self, core: &WidgetCore, origin: Offset, drawer: &mut dyn DrawAdapter) {
        drawer.draw_widget(&WidgetView::of(self.tag(), core, origin, String::new()));
        if let Some(end) = self.drag {
            drawer.draw_link_line(link_anchor_out(core.rect) + origin, end + origin, true);
        }
    }

    fn needs_binding(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// InboundLink
// ---------------------------------------------------------------------------

/// Incoming connector identified by a caller-chosen target id.
#[derive(Debug)]
pub struct InboundLink {
    pub target: u32,
}

impl InboundLink {
    pub fn new(target: u32) -> Self {
        Self { target }
    }
}

impl WidgetBehavior for InboundLink {
    fn tag(&self) -> KindTag {
        KindTag::InboundLink
    }

    fn on_event(&mut self, _core: &mut WidgetCore, _cx: &EventCx<'_>, _event: &Event) -> Response {
        Response::ignored()
    }

    fn needs_binding(&self) -> bool {
        false
    }
}

// ===========================================================================
// Tests
// ===========================================================================
