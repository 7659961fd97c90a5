//! The drawing boundary.
//!
//! The kernel never produces pixels. Each redraw pass it walks the visible
//! blocks and panels and describes them to a [`DrawAdapter`] in screen
//! coordinates. [`RecordingDrawer`] is an adapter that just writes the calls
//! down, for tests and for hosts that diff frames.

use std::fmt::Write as _;

use crate::geometry::{Offset, Region};
use crate::panel::Collapse;
use crate::widget::{KindTag, WidgetCore, WidgetFlags};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Everything an adapter needs to draw one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub kind: KindTag,
    /// Screen rectangle.
    pub rect: Region,
    pub text: String,
    pub flags: WidgetFlags,
    pub value: f64,
    pub icon: Option<u32>,
    /// Byte offset of the text cursor while editing.
    pub cursor: Option<usize>,
    pub selection: Option<(usize, usize)>,
}

impl WidgetView {
    pub fn of(kind: KindTag, core: &WidgetCore, origin: Offset, text: String) -> Self {
        Self {
            kind,
            rect: core.rect.translate(origin),
            text,
            flags: core.flags,
            value: core.value(),
            icon: core.icon,
            cursor: None,
            selection: None,
        }
    }

    pub fn with_cursor(mut self, cursor: usize, selection: Option<(usize, usize)>) -> Self {
        self.cursor = Some(cursor);
        self.selection = selection;
        self
    }
}

/// A panel header.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelHeaderView {
    pub name: String,
    /// Screen rectangle of the header strip.
    pub rect: Region,
    pub collapse: Collapse,
    /// Names of the panels tabbed into this one, owner first.
    pub tabs: Vec<String>,
    /// Being dragged.
    pub selected: bool,
}

// ---------------------------------------------------------------------------
// DrawAdapter
// ---------------------------------------------------------------------------

/// Pure rendering callbacks. Implementations must not reach back into the kernel.
pub trait DrawAdapter {
    /// A block is about to be drawn.
    fn begin_block(&mut self, _name: &str, _bounds: Region) {}

    fn draw_widget(&mut self, widget: &WidgetView);

    /// `anchor` is the screen rect of the widget the tip belongs to.
    fn draw_tooltip(&mut self, anchor: Region, text: &str);

    fn draw_panel_header(&mut self, header: &PanelHeaderView);

    /// A connector line between two link widgets, or a rubber band.
    fn draw_link_line(&mut self, _from: Offset, _to: Offset, _active: bool) {}
}

// ---------------------------------------------------------------------------
// RecordingDrawer
// ---------------------------------------------------------------------------

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Block { name: String, bounds: Region },
    Widget(WidgetView),
    Tooltip { anchor: Region, text: String },
    PanelHeader(PanelHeaderView),
    LinkLine { from: Offset, to: Offset, active: bool },
}

/// A [`DrawAdapter`] that records every call.
#[derive(Debug, Default)]
pub struct RecordingDrawer {
    pub calls: Vec<DrawCall>,
}

impl RecordingDrawer {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn widgets(&self) -> impl Iterator<Item = &WidgetView> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Widget(w) => Some(w),
            _ => None,
        })
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.calls.iter().find_map(|c| match c {
            DrawCall::Tooltip { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// One line per call, compact enough for inline snapshots.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for call in &self.calls {
            let _ = match call {
                DrawCall::Block { name, bounds } => writeln!(out, "block {name} {}", rect_text(*bounds)),
                DrawCall::Widget(w) => writeln!(out, "  {}", widget_line(w)),
                DrawCall::Tooltip { text, .. } => writeln!(out, "tooltip {text:?}"),
                DrawCall::PanelHeader(h) => writeln!(
                    out,
                    "panel {} {} {:?}{}",
                    h.name,
                    rect_text(h.rect),
                    h.collapse,
                    if h.tabs.len() > 1 { format!(" tabs={}", h.tabs.join(",")) } else { String::new() }
                ),
                DrawCall::LinkLine { from, to, active } => writeln!(
                    out,
                    "link ({},{})->({},{}){}",
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    if *active { " *" } else { "" }
                ),
            };
        }
        out
    }
}

impl DrawAdapter for RecordingDrawer {
    fn begin_block(&mut self, name: &str, bounds: Region) {
        self.calls.push(DrawCall::Block { name: name.to_owned(), bounds });
    }

    fn draw_widget(&mut self, widget: &WidgetView) {
        self.calls.push(DrawCall::Widget(widget.clone()));
    }

    fn draw_tooltip(&mut self, anchor: Region, text: &str) {
        self.calls.push(DrawCall::Tooltip { anchor, text: text.to_owned() });
    }

    fn draw_panel_header(&mut self, header: &PanelHeaderView) {
        self.calls.push(DrawCall::PanelHeader(header.clone()));
    }

    fn draw_link_line(&mut self, from: Offset, to: Offset, active: bool) {
        self.calls.push(DrawCall::LinkLine { from, to, active });
    }
}

pub(crate) fn rect_text(r: Region) -> String {
    format!("{}x{}+{}+{}", r.width, r.height, r.x, r.y)
}

/// `Kind "text" [flags]`, with `*` for selected, `>` for active, `~` for hovered.
pub(crate) fn widget_line(w: &WidgetView) -> String {
    let mut marks = String::new();
    if w.flags.contains(WidgetFlags::SELECTED) {
        marks.push('*');
    }
    if w.flags.contains(WidgetFlags::ACTIVE) {
        marks.push('>');
    }
    if w.flags.contains(WidgetFlags::HOVERED) {
        marks.push('~');
    }
    let mut line = format!("{:?} {:?}", w.kind, w.text);
    if !marks.is_empty() {
        line.push(' ');
        line.push_str(&marks);
    }
    if let Some(cursor) = w.cursor {
        let _ = write!(line, " |{cursor}");
    }
    line
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{slot, Widget};

    #[test]
    fn view_is_in_screen_space() {
        let w = Widget::toggle("Wire", Region::new(5, 5, 40, 20), slot(1i32));
        let view = WidgetView::of(w.tag(), &w.core, Offset::new(100, 10), w.display_text());
        assert_eq!(view.rect, Region::new(105, 15, 40, 20));
        assert!(view.flags.contains(WidgetFlags::SELECTED));
    }

    #[test]
    fn recording_text() {
        let mut d = RecordingDrawer::new();
        let w = Widget::toggle("Wire", Region::new(0, 0, 40, 20), slot(1i32));
        d.begin_block("tools", Region::new(0, 0, 40, 20));
        w.kind.as_behavior().on_draw(&w.core, Offset::ZERO, &mut d);
        d.draw_tooltip(Region::EMPTY, "Draw edges");
        insta::assert_snapshot!(d.to_text().trim_end(), @r###"
        block tools 40x20+0+0
          Toggle "Wire" *
        tooltip "Draw edges"
        "###);
        assert_eq!(d.tooltip(), Some("Draw edges"));
    }
}
