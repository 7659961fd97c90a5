//! Widgets: one record type, one behavior per kind.
//!
//! A [`Widget`] is a [`WidgetCore`] (geometry, binding, range, flags, retval)
//! plus a [`WidgetKind`], a closed sum over the concrete state machines. The
//! dispatcher talks to every kind through [`WidgetBehavior`]; it never matches
//! on kinds except where blocks need cross-widget information (links, radio
//! siblings, text-edit chaining).

pub mod behavior;
pub mod button;
pub mod link;
pub mod opener;
pub mod slider;
pub mod text;
pub mod toggle;
pub mod value;

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::rc::Rc;

pub use behavior::{Effect, EventCx, Response, WidgetBehavior};
pub use button::{Button, Label, MenuItem, Separator};
pub use link::{link_list, InboundLink, Link, LinkList};
pub use opener::{BlockFactory, ColorSwatch, IconRow, Menu, NestedBlock};
pub use slider::{NumberField, NumberSlider, Slider};
pub use text::{TextEdit, TextField};
pub use toggle::{RadioRow, Toggle, ToggleBit};
pub use value::{slot, text_slot, Binding, Channel, Slot, TextSlot};

use crate::block::Block;
use crate::geometry::Region;
use crate::menu::MenuSpec;

// ---------------------------------------------------------------------------
// WidgetFlags
// ---------------------------------------------------------------------------

/// Per-widget interaction and display state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WidgetFlags(u16);

impl WidgetFlags {
    pub const NONE: WidgetFlags = WidgetFlags(0);
    /// Value matches the kind's "pressed" rule.
    pub const SELECTED: WidgetFlags = WidgetFlags(1);
    /// Holds keyboard/pointer focus in its block. At most one per block.
    pub const ACTIVE: WidgetFlags = WidgetFlags(1 << 1);
    /// Under the pointer.
    pub const HOVERED: WidgetFlags = WidgetFlags(1 << 2);
    pub const DISABLED: WidgetFlags = WidgetFlags(1 << 3);
    pub const ICON_LEFT: WidgetFlags = WidgetFlags(1 << 4);
    pub const HAS_ICON: WidgetFlags = WidgetFlags(1 << 5);
    pub const TEXT_LEFT: WidgetFlags = WidgetFlags(1 << 6);

    pub fn contains(self, other: WidgetFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: WidgetFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: WidgetFlags) {
        self.0 &= !other.0;
    }

    /// Insert or remove `other` depending on `on`.
    pub fn set(&mut self, other: WidgetFlags, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for WidgetFlags {
    type Output = WidgetFlags;
    fn bitor(self, rhs: Self) -> Self {
        WidgetFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for WidgetFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for WidgetFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(WidgetFlags, &str); 7] = [
            (WidgetFlags::SELECTED, "SELECTED"),
            (WidgetFlags::ACTIVE, "ACTIVE"),
            (WidgetFlags::HOVERED, "HOVERED"),
            (WidgetFlags::DISABLED, "DISABLED"),
            (WidgetFlags::ICON_LEFT, "ICON_LEFT"),
            (WidgetFlags::HAS_ICON, "HAS_ICON"),
            (WidgetFlags::TEXT_LEFT, "TEXT_LEFT"),
        ];
        let set: Vec<&str> = NAMES.iter().filter(|(fl, _)| self.contains(*fl)).map(|(_, n)| *n).collect();
        write!(f, "WidgetFlags({})", set.join(" | "))
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// Numeric range of a widget.
///
/// Some kinds reuse the fields: a radio row keeps its group id in `min` and
/// its own value in `max`, a menu item keeps its item value in `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    /// Declared coarse step used by Ctrl snapping. `0` derives one from the span.
    pub step: f64,
    /// Decimals shown for floats.
    pub precision: u8,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max, step: 0.0, precision: 3 }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp into `[min, max]`. An inverted range leaves the value alone.
    pub fn clamp(&self, v: f64) -> f64 {
        if self.min <= self.max {
            v.max(self.min).min(self.max)
        } else {
            v
        }
    }

    /// Position of `v` in the range as a 0..1 fraction.
    pub fn fraction(&self, v: f64) -> f64 {
        if self.span() == 0.0 {
            0.0
        } else {
            (v - self.min) / self.span()
        }
    }

    /// The step Ctrl snaps to.
    pub fn coarse_step(&self, integer: bool) -> f64 {
        if self.step > 0.0 {
            self.step
        } else if integer {
            10.0
        } else if self.span() < 2.1 {
            0.1
        } else if self.span() < 21.0 {
            1.0
        } else {
            10.0
        }
    }

    /// Round `v` to the nearest multiple of the coarse step (a tenth of it
    /// when `fine`), staying inside the range whenever a multiple fits.
    pub fn snap(&self, v: f64, integer: bool, fine: bool) -> f64 {
        let mut step = self.coarse_step(integer);
        if fine {
            step /= 10.0;
        }
        if integer {
            step = step.max(1.0);
        }
        let mut n = (v / step).round();
        if n * step > self.max {
            n = (self.max / step).floor();
        }
        if n * step < self.min {
            n = (self.min / step).ceil();
        }
        self.clamp(n * step)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// What a widget reports when it fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub retval: i32,
    pub value: f64,
    pub label: String,
}

/// Deferred commit callback. Runs after the block stack has unwound.
pub type Callback = Rc<dyn Fn(&Commit)>;

// ---------------------------------------------------------------------------
// KindTag
// ---------------------------------------------------------------------------

/// Fieldless name of a widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Button,
    Toggle,
    ToggleBit,
    RadioRow,
    Slider,
    NumberField,
    NumberSlider,
    TextField,
    Menu,
    IconRow,
    ColorSwatch,
    Label,
    Separator,
    Link,
    InboundLink,
    NestedBlock,
    MenuItem,
}

// ---------------------------------------------------------------------------
// WidgetCore
// ---------------------------------------------------------------------------

/// Kind-independent widget state.
#[derive(Clone, Default)]
pub struct WidgetCore {
    /// Block-local rectangle.
    pub rect: Region,
    pub binding: Binding,
    pub range: Range,
    pub label: String,
    pub flags: WidgetFlags,
    /// Caller-defined event id. 0 never reaches the host.
    pub retval: i32,
    pub icon: Option<u32>,
    pub tip: Option<String>,
    /// Lock message. A locked widget refuses every interaction.
    pub lock: Option<String>,
    pub on_commit: Option<Callback>,
}

impl WidgetCore {
    fn new(label: impl Into<String>, rect: Region) -> Self {
        Self { rect, label: label.into(), ..Self::default() }
    }

    /// The current value as the host sees it.
    pub fn value(&self) -> f64 {
        self.binding.get()
    }

    pub fn is_integer(&self) -> bool {
        self.binding.is_integer()
    }
}

impl fmt::Debug for WidgetCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetCore")
            .field("rect", &self.rect)
            .field("label", &self.label)
            .field("flags", &self.flags)
            .field("retval", &self.retval)
            .field("value", &self.binding.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// WidgetKind
// ---------------------------------------------------------------------------

/// The concrete state machine behind a widget.
pub enum WidgetKind {
    Button(Button),
    Toggle(Toggle),
    ToggleBit(ToggleBit),
    RadioRow(RadioRow),
    Slider(Slider),
    NumberField(NumberField),
    NumberSlider(NumberSlider),
    TextField(TextField),
    Menu(Menu),
    IconRow(IconRow),
    ColorSwatch(ColorSwatch),
    Label(Label),
    Separator(Separator),
    Link(Link),
    InboundLink(InboundLink),
    NestedBlock(NestedBlock),
    MenuItem(MenuItem),
}

impl WidgetKind {
    pub fn as_behavior(&self) -> &dyn WidgetBehavior {
        match self {
            WidgetKind::Button(w) => w,
            WidgetKind::Toggle(w) => w,
            WidgetKind::ToggleBit(w) => w,
            WidgetKind::RadioRow(w) => w,
            WidgetKind::Slider(w) => w,
            WidgetKind::NumberField(w) => w,
            WidgetKind::NumberSlider(w) => w,
            WidgetKind::TextField(w) => w,
            WidgetKind::Menu(w) => w,
            WidgetKind::IconRow(w) => w,
            WidgetKind::ColorSwatch(w) => w,
            WidgetKind::Label(w) => w,
            WidgetKind::Separator(w) => w,
            WidgetKind::Link(w) => w,
            WidgetKind::InboundLink(w) => w,
            WidgetKind::NestedBlock(w) => w,
            WidgetKind::MenuItem(w) => w,
        }
    }

    pub fn as_behavior_mut(&mut self) -> &mut dyn WidgetBehavior {
        match self {
            WidgetKind::Button(w) => w,
            WidgetKind::Toggle(w) => w,
            WidgetKind::ToggleBit(w) => w,
            WidgetKind::RadioRow(w) => w,
            WidgetKind::Slider(w) => w,
            WidgetKind::NumberField(w) => w,
            WidgetKind::NumberSlider(w) => w,
            WidgetKind::TextField(w) => w,
            WidgetKind::Menu(w) => w,
            WidgetKind::IconRow(w) => w,
            WidgetKind::ColorSwatch(w) => w,
            WidgetKind::Label(w) => w,
            WidgetKind::Separator(w) => w,
            WidgetKind::Link(w) => w,
            WidgetKind::InboundLink(w) => w,
            WidgetKind::NestedBlock(w) => w,
            WidgetKind::MenuItem(w) => w,
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// One control in a block.
pub struct Widget {
    pub core: WidgetCore,
    pub kind: WidgetKind,
}

impl Widget {
    fn build(core: WidgetCore, kind: WidgetKind) -> Self {
        let mut widget = Self { core, kind };
        widget.refresh();
        widget
    }

    // ── Constructors ─────────────────────────────────────────────────

    /// A push button. Fires on release inside.
    pub fn button(label: impl Into<String>, rect: Region) -> Self {
        Self::build(WidgetCore::new(label, rect), WidgetKind::Button(Button::new()))
    }

    /// A 0/1 toggle.
    pub fn toggle(label: impl Into<String>, rect: Region, binding: impl Into<Binding>) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = binding.into();
        Self::build(core, WidgetKind::Toggle(Toggle::new(false)))
    }

    /// A toggle that shows as selected while the value is 0.
    pub fn toggle_inverted(label: impl Into<String>, rect: Region, binding: impl Into<Binding>) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = binding.into();
        Self::build(core, WidgetKind::Toggle(Toggle::new(true)))
    }

    /// A toggle over one bit of integer storage.
    pub fn toggle_bit(label: impl Into<String>, rect: Region, binding: impl Into<Binding>, bit: u8) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = binding.into();
        Self::build(core, WidgetKind::ToggleBit(ToggleBit::new(bit)))
    }

    /// One option of a radio group. Rows sharing `binding` and `group` are
    /// mutually exclusive; selecting this row stores `value`.
    pub fn radio(label: impl Into<String>, rect: Region, binding: impl Into<Binding>, group: f64, value: f64) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = binding.into();
        core.range = Range::new(group, value);
        Self::build(core, WidgetKind::RadioRow(RadioRow))
    }

    pub fn slider(label: impl Into<String>, rect: Region, binding: impl Into<Binding>, min: f64, max: f64) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = binding.into();
        core.range = Range::new(min, max);
        Self::build(core, WidgetKind::Slider(Slider::new()))
    }

    pub fn number(label: impl Into<String>, rect: Region, binding: impl Into<Binding>, min: f64, max: f64) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = binding.into();
        core.range = Range::new(min, max);
        Self::build(core, WidgetKind::NumberField(NumberField::new()))
    }

    pub fn number_slider(
        label: impl Into<String>,
        rect: Region,
        binding: impl Into<Binding>,
        min: f64,
        max: f64,
    ) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = binding.into();
        core.range = Range::new(min, max);
        Self::build(core, WidgetKind::NumberSlider(NumberSlider::new()))
    }

    /// A single-line text field. `max_len` counts characters.
    pub fn text(label: impl Into<String>, rect: Region, binding: TextSlot, max_len: usize) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = Binding::Text(binding);
        core.flags.insert(WidgetFlags::TEXT_LEFT);
        Self::build(core, WidgetKind::TextField(TextField::new(max_len)))
    }

    /// A drop-down menu whose items come from an item string such as
    /// `"Mode%t|Solid|Wire%x7|%l|Box"`.
    pub fn menu(items: &str, rect: Region, binding: impl Into<Binding>) -> Self {
        let spec = MenuSpec::parse(items);
        let mut core = WidgetCore::new(spec.title.clone().unwrap_or_default(), rect);
        core.binding = binding.into();
        Self::build(core, WidgetKind::Menu(Menu::new(spec)))
    }

    /// A menu of icons, one per integer in `min..=max`.
    pub fn icon_row(rect: Region, binding: impl Into<Binding>, base_icon: u32, min: f64, max: f64) -> Self {
        let mut core = WidgetCore::new("", rect);
        core.binding = binding.into();
        core.range = Range::new(min, max);
        core.flags.insert(WidgetFlags::HAS_ICON);
        Self::build(core, WidgetKind::IconRow(IconRow::new(base_icon)))
    }

    pub fn color(label: impl Into<String>, rect: Region, rgb: Slot<[f32; 3]>) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = Binding::Rgb(rgb);
        Self::build(core, WidgetKind::ColorSwatch(ColorSwatch::new()))
    }

    pub fn label(text: impl Into<String>, rect: Region) -> Self {
        Self::build(WidgetCore::new(text, rect), WidgetKind::Label(Label))
    }

    pub fn separator(rect: Region) -> Self {
        Self::build(WidgetCore::new("", rect), WidgetKind::Separator(Separator))
    }

    /// Outgoing connector. Links land in `links`, owned by the caller.
    pub fn link(rect: Region, links: LinkList) -> Self {
        Self::build(WidgetCore::new("", rect), WidgetKind::Link(Link::new(links)))
    }

    /// Incoming connector identified by `target`.
    pub fn inbound_link(rect: Region, target: u32) -> Self {
        Self::build(WidgetCore::new("", rect), WidgetKind::InboundLink(InboundLink::new(target)))
    }

    /// Opens the block built by `factory` as a popup to its right.
    pub fn nested(label: impl Into<String>, rect: Region, factory: impl Fn() -> Block + 'static) -> Self {
        Self::build(WidgetCore::new(label, rect), WidgetKind::NestedBlock(NestedBlock::new(Rc::new(factory))))
    }

    /// One entry of a menu popup: choosing it stores `value` into `binding`.
    pub fn menu_item(label: impl Into<String>, rect: Region, binding: Binding, value: f64) -> Self {
        let mut core = WidgetCore::new(label, rect);
        core.binding = binding;
        core.range = Range::new(value, value);
        core.flags.insert(WidgetFlags::TEXT_LEFT);
        Self::build(core, WidgetKind::MenuItem(MenuItem))
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_retval(mut self, retval: i32) -> Self {
        self.core.retval = retval;
        self
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.core.tip = Some(tip.into());
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.core.range = range;
        self.refresh();
        self
    }

    /// Declared coarse step for Ctrl snapping.
    pub fn with_step(mut self, step: f64) -> Self {
        self.core.range.step = step;
        self
    }

    pub fn with_icon(mut self, icon: u32) -> Self {
        self.core.icon = Some(icon);
        self.core.flags.insert(WidgetFlags::HAS_ICON);
        self
    }

    /// Lock the widget. Touching it posts `message` and changes nothing.
    pub fn locked(mut self, message: impl Into<String>) -> Self {
        self.core.lock = Some(message.into());
        self
    }

    /// Run `callback` after the stack unwinds whenever this widget commits.
    pub fn on_commit(mut self, callback: impl Fn(&Commit) + 'static) -> Self {
        self.core.on_commit = Some(Rc::new(callback));
        self
    }

    /// Toggle-bit variant that selects exactly this bit unless Shift is held.
    pub fn exclusive(mut self) -> Self {
        if let WidgetKind::ToggleBit(t) = &mut self.kind {
            t.exclusive = true;
        }
        self
    }

    /// Toggle-bit variant selected while the bit is clear.
    pub fn inverted(mut self) -> Self {
        if let WidgetKind::ToggleBit(t) = &mut self.kind {
            t.inverted = true;
        }
        self.refresh();
        self
    }

    /// Install a custom colour picker for a colour swatch.
    pub fn with_picker(mut self, factory: impl Fn() -> Block + 'static) -> Self {
        if let WidgetKind::ColorSwatch(c) = &mut self.kind {
            c.picker = Some(Rc::new(factory));
        }
        self
    }

    // ── Behavior ─────────────────────────────────────────────────────

    pub fn tag(&self) -> KindTag {
        self.kind.as_behavior().tag()
    }

    pub fn value(&self) -> f64 {
        self.core.value()
    }

    /// Write a value, clamping for kinds with clamped semantics, and update
    /// the selected flag.
    pub fn set_value(&mut self, value: f64) {
        let value = if self.kind.as_behavior().clamps() { self.core.range.clamp(value) } else { value };
        self.core.binding.set(value);
        self.refresh();
    }

    /// Re-derive the selected flag from the bound value.
    pub fn refresh(&mut self) {
        self.kind.as_behavior().on_value_changed(&mut self.core);
    }

    /// Feed one block-local event to the state machine.
    pub fn handle(&mut self, cx: &EventCx<'_>, event: &crate::event::Event) -> Response {
        let Widget { core, kind } = self;
        kind.as_behavior_mut().on_event(core, cx, event)
    }

    /// Keyboard activation (Enter, numeric select).
    pub fn activate(&mut self, cx: &EventCx<'_>) -> Response {
        let Widget { core, kind } = self;
        kind.as_behavior_mut().on_activate(core, cx)
    }

    /// Build this widget's popup content, if it opens one.
    pub fn open(&mut self, cx: &EventCx<'_>) -> Option<Block> {
        let Widget { core, kind } = self;
        kind.as_behavior_mut().on_open(core, cx)
    }

    pub fn popup_closed(&mut self, ok: bool) -> Response {
        let Widget { core, kind } = self;
        kind.as_behavior_mut().on_popup_closed(core, ok)
    }

    /// Start text editing, for kinds that can.
    pub fn begin_edit(&mut self) -> bool {
        let Widget { core, kind } = self;
        kind.as_behavior_mut().begin_edit(core)
    }

    pub fn is_interactive(&self) -> bool {
        self.kind.as_behavior().is_interactive()
    }

    pub fn is_opener(&self) -> bool {
        self.kind.as_behavior().is_opener()
    }

    pub fn is_editing(&self) -> bool {
        self.kind.as_behavior().is_editing()
    }

    pub fn display_text(&self) -> String {
        self.kind.as_behavior().display_text(&self.core)
    }

    pub fn is(&self, flag: WidgetFlags) -> bool {
        self.core.flags.contains(flag)
    }

    /// The record handed to the host when this widget fires.
    pub fn commit(&self) -> Commit {
        Commit { retval: self.core.retval, value: self.value(), label: self.display_text() }
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget").field("kind", &self.tag()).field("core", &self.core).finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rect() -> Region {
        Region::new(0, 0, 100, 20)
    }

    // ── Flags ────────────────────────────────────────────────────────

    #[test]
    fn flags_set_and_clear() {
        let mut f = WidgetFlags::NONE;
        f.insert(WidgetFlags::ACTIVE | WidgetFlags::HOVERED);
        assert!(f.contains(WidgetFlags::ACTIVE));
        f.set(WidgetFlags::ACTIVE, false);
        assert!(!f.contains(WidgetFlags::ACTIVE));
        assert_eq!(format!("{f:?}"), "WidgetFlags(HOVERED)");
    }

    // ── Range ────────────────────────────────────────────────────────

    #[test]
    fn coarse_step_derivation() {
        assert_eq!(Range::new(0.0, 1.0).coarse_step(false), 0.1);
        assert_eq!(Range::new(0.0, 20.0).coarse_step(false), 1.0);
        assert_eq!(Range::new(0.0, 500.0).coarse_step(false), 10.0);
        assert_eq!(Range::new(0.0, 5.0).coarse_step(true), 10.0);
        assert_eq!(Range::new(0.0, 5.0).with_step(0.25).coarse_step(false), 0.25);
    }

    #[test]
    fn snap_stays_on_grid_inside_range() {
        let r = Range::new(0.0, 95.0).with_step(10.0);
        assert_eq!(r.snap(94.0, false, false), 90.0);
        assert_eq!(r.snap(44.0, false, false), 40.0);
        assert_eq!(r.snap(-3.0, false, false), 0.0);
        assert_eq!(r.snap(44.0, false, true), 44.0);
    }

    #[test]
    fn inverted_range_does_not_clamp() {
        assert_eq!(Range::new(5.0, 1.0).clamp(9.0), 9.0);
        assert_eq!(Range::new(1.0, 5.0).clamp(9.0), 5.0);
    }

    // ── Value round trip ─────────────────────────────────────────────

    #[test]
    fn numeric_kinds_clamp_on_set() {
        let s = slot(0i32);
        let mut w = Widget::number("n", rect(), s.clone(), -5.0, 5.0);
        w.set_value(12.0);
        assert_eq!(w.value(), 5.0);
        assert_eq!(s.get(), 5);
    }

    #[test]
    fn toggles_do_not_clamp() {
        let s = slot(0i32);
        let mut w = Widget::toggle("t", rect(), s.clone());
        w.set_value(4.0);
        assert_eq!(s.get(), 4);
        assert!(w.is(WidgetFlags::SELECTED));
    }

    #[test]
    fn commit_carries_retval_and_value() {
        let s = slot(0.5f32);
        let w = Widget::slider("Alpha", rect(), s, 0.0, 1.0).with_retval(9);
        let c = w.commit();
        assert_eq!(c.retval, 9);
        assert_eq!(c.value, 0.5);
    }

    #[test]
    fn tags_match_constructors() {
        assert_eq!(Widget::label("x", rect()).tag(), KindTag::Label);
        assert_eq!(Widget::separator(rect()).tag(), KindTag::Separator);
        assert!(!Widget::label("x", rect()).is_interactive());
        assert!(Widget::menu("A|B", rect(), slot(1i32)).is_opener());
    }
}
