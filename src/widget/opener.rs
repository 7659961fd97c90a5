//! Widgets that open popups: menus, icon rows, nested blocks, colour swatches.
//!
//! An opener only builds the popup content, laid out from `(0, 0)`. The block
//! dispatcher places it next to the widget and pushes it on the modal stack.
//! When the popup returns OK the opener fires with whatever value the popup
//! wrote through the shared binding.

use std::fmt;
use std::rc::Rc;

use crate::block::{Block, BlockFlags};
use crate::event::Event;
use crate::geometry::Region;
use crate::menu::{popup, MenuSpec};

use super::behavior::{Effect, EventCx, Response, WidgetBehavior};
use super::value::Slot;
use super::{Binding, Channel, KindTag, Widget, WidgetCore, WidgetFlags};

/// Builds the content of a nested block or a custom picker.
pub type BlockFactory = Rc<dyn Fn() -> Block>;

/// Shared press handling: open on a left press inside.
fn press_opens(this: &mut dyn WidgetBehavior, core: &WidgetCore, cx: &EventCx<'_>, event: &Event) -> Response {
    if !(event.is_left_press() && core.rect.contains(event.pos)) {
        return Response::ignored();
    }
    match this.on_open(core, cx) {
        Some(block) => Response::consumed().with_effect(Effect::Open(Box::new(block))),
        None => Response::consumed(),
    }
}

fn closed(ok: bool) -> Response {
    if ok {
        Response::fired()
    } else {
        Response::consumed()
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// Drop-down menu over a parsed item string.
#[derive(Debug)]
pub struct Menu {
    pub spec: MenuSpec,
}

impl Menu {
    pub fn new(spec: MenuSpec) -> Self {
        Self { spec }
    }
}

impl WidgetBehavior for Menu {
    fn tag(&self) -> KindTag {
        KindTag::Menu
    }

    fn on_event(&mut self, core: &mut WidgetCore, cx: &EventCx<'_>, event: &Event) -> Response {
        press_opens(self, core, cx, event)
    }

    fn display_text(&self, core: &WidgetCore) -> String {
        match self.spec.label_for(core.value()) {
            Some(label) => label.to_owned(),
            None => self.spec.title.clone().unwrap_or_default(),
        }
    }

    fn is_opener(&self) -> bool {
        true
    }

    fn on_open(&mut self, core: &WidgetCore, _cx: &EventCx<'_>) -> Option<Block> {
        popup::menu_block(&self.spec, &core.binding, core.rect.width).ok()
    }

    fn on_popup_closed(&mut self, _core: &mut WidgetCore, ok: bool) -> Response {
        closed(ok)
    }
}

// ---------------------------------------------------------------------------
// IconRow
// ---------------------------------------------------------------------------

/// Picks an integer in `min..=max`, shown as icon `base_icon + (value - min)`.
#[derive(Debug)]
pub struct IconRow {
    pub base_icon: u32,
}

impl IconRow {
    pub fn new(base_icon: u32) -> Self {
        Self { base_icon }
    }
}

impl WidgetBehavior for IconRow {
    fn tag(&self) -> KindTag {
        KindTag::IconRow
    }

    fn on_event(&mut self, core: &mut WidgetCore, cx: &EventCx<'_>, event: &Event) -> Response {
        press_opens(self, core, cx, event)
    }

    fn on_value_changed(&self, core: &mut WidgetCore) {
        let step = (core.value() - core.range.min).max(0.0) as u32;
        core.icon = Some(self.base_icon + step);
        core.flags.remove(WidgetFlags::SELECTED);
    }

    fn is_opener(&self) -> bool {
        true
    }

    fn on_open(&mut self, core: &WidgetCore, _cx: &EventCx<'_>) -> Option<Block> {
        popup::icon_block(&core.binding, self.base_icon, core.range, core.rect.size()).ok()
    }

    fn on_popup_closed(&mut self, core: &mut WidgetCore, ok: bool) -> Response {
        self.on_value_changed(core);
        closed(ok)
    }
}

// ---------------------------------------------------------------------------
// NestedBlock
// ---------------------------------------------------------------------------

/// Opens a caller-built block to its right. Used for submenus.
pub struct NestedBlock {
    factory: BlockFactory,
}

impl NestedBlock {
    pub fn new(factory: BlockFactory) -> Self {
        Self { factory }
    }
}

impl fmt::Debug for NestedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NestedBlock")
    }
}

impl WidgetBehavior for NestedBlock {
    fn tag(&self) -> KindTag {
        KindTag::NestedBlock
    }

    fn on_event(&mut self, core: &mut WidgetCore, cx: &EventCx<'_>, event: &Event) -> Response {
        press_opens(self, core, cx, event)
    }

    fn is_opener(&self) -> bool {
        true
    }

    fn needs_binding(&self) -> bool {
        false
    }

    fn on_open(&mut self, _core: &WidgetCore, _cx: &EventCx<'_>) -> Option<Block> {
        Some((self.factory)())
    }

    fn on_popup_closed(&mut self, _core: &mut WidgetCore, ok: bool) -> Response {
        closed(ok)
    }
}

// ---------------------------------------------------------------------------
// ColorSwatch
// ---------------------------------------------------------------------------

/// Shows an RGB colour and opens a picker bound to the same triple.
#[derive(Default)]
pub struct ColorSwatch {
    pub picker: Option<BlockFactory>,
}

impl ColorSwatch {
    pub fn new() -> Self {
        Self { picker: None }
    }
}

impl fmt::Debug for ColorSwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorSwatch").field("custom_picker", &self.picker.is_some()).finish()
    }
}

impl WidgetBehavior for ColorSwatch {
    fn tag(&self) -> KindTag {
        KindTag::ColorSwatch
    }

    fn on_event(&mut self, core: &mut WidgetCore, cx: &EventCx<'_>, event: &Event) -> Response {
        press_opens(self, core, cx, event)
    }

    fn on_value_changed(&self, core: &mut WidgetCore) {
        core.flags.insert(WidgetFlags::SELECTED);
    }

    fn display_text(&self, core: &WidgetCore) -> String {
        let [r, g, b] = core.binding.rgb().map(|s| s.get()).unwrap_or_default();
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
    }

    fn is_opener(&self) -> bool {
        true
    }

    fn on_open(&mut self, core: &WidgetCore, _cx: &EventCx<'_>) -> Option<Block> {
        if let Some(factory) = &self.picker {
            return Some(factory());
        }
        color_picker(core.binding.rgb()?).ok()
    }

    fn on_popup_closed(&mut self, _core: &mut WidgetCore, ok: bool) -> Response {
        closed(ok)
    }
}

/// The default picker: one slider per channel, R G B then H S V.
pub fn color_picker(rgb: Slot<[f32; 3]>) -> Result<Block, crate::error::UiError> {
    const ROW: i32 = 20;
    let mut block =
        Block::new("color-picker").with_flags(BlockFlags::KEY_NAV | BlockFlags::ENTER_OK | BlockFlags::KEEP_OPEN);
    for (i, channel) in Channel::ALL.into_iter().enumerate() {
        let rect = Region::new(0, i as i32 * ROW, 160, ROW);
        let binding = Binding::Channel(rgb.clone(), channel);
        block.add(Widget::number_slider(channel.letter(), rect, binding, 0.0, 1.0))?;
    }
    Ok(block)
}

// ===========================================================================
// Tests
// ===========================================================================
