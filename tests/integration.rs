//! Integration tests for blockui.
//!
//! These drive a headless `Ui` from outside the crate through the pilot,
//! checking that widgets, blocks, the popup stack and panels work together.

use std::cell::Cell;
use std::rc::Rc;

use blockui::block::{Block, BlockFlags, BlockResult};
use blockui::config::UiConfig;
use blockui::event::{Event, Key, Modifiers, UiEvent};
use blockui::geometry::{Offset, Region, Size};
use blockui::menu::{MenuEntry, MenuSpec};
use blockui::panel::{Alignment, Collapse, PanelSurface};
use blockui::testing::{render_panels, Pilot};
use blockui::widget::{slot, Widget, WidgetFlags};
use blockui::Ui;
use pretty_assertions::assert_eq;

fn rect(x: i32, y: i32, w: i32, h: i32) -> Region {
    Region::new(x, y, w, h)
}

fn no_auto_open() -> Pilot {
    Pilot::with_config(UiConfig::default().with_auto_open(false))
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[test]
fn numeric_values_round_trip_through_clamping() {
    let int = slot(3i32);
    let mut number = Widget::number("n", rect(0, 0, 80, 20), int.clone(), 0.0, 10.0);
    for (input, expected) in [(15.0, 10), (-3.0, 0), (7.0, 7)] {
        number.set_value(input);
        assert_eq!(int.get(), expected);
        assert_eq!(number.value(), f64::from(expected));
    }

    let float = slot(0.5f32);
    let mut slider = Widget::slider("s", rect(0, 0, 105, 20), float.clone(), 0.0, 1.0);
    for (input, expected) in [(1.5, 1.0f32), (-0.5, 0.0), (0.25, 0.25)] {
        slider.set_value(input);
        assert_eq!(float.get(), expected);
    }
}

#[test]
fn toggling_a_bit_twice_restores_it() {
    for bit in 0..4u8 {
        let flags = slot(0b0101i32);
        let mut pilot = Pilot::default();
        let mut block = Block::new("flags");
        block.add(Widget::toggle_bit("B", rect(0, 0, 40, 20), flags.clone(), bit)).unwrap();
        pilot.ui_mut().add_block(block);

        pilot.click(5, 5);
        assert_eq!(flags.get(), 0b0101 ^ (1 << bit));
        pilot.click(5, 5);
        assert_eq!(flags.get(), 0b0101);
    }
}

#[test]
fn exclusive_bit_replaces_the_value_unless_shift() {
    let flags = slot(0b0101i32);
    let mut pilot = Pilot::default();
    let mut block = Block::new("layers");
    block.add(Widget::toggle_bit("L2", rect(0, 0, 20, 20), flags.clone(), 1).exclusive()).unwrap();
    pilot.ui_mut().add_block(block);

    pilot.click_with(5, 5, Modifiers::SHIFT);
    assert_eq!(flags.get(), 0b0111);
    pilot.click(5, 5);
    assert_eq!(flags.get(), 0b0010);
}

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

#[test]
fn menu_string_retvals_continue_after_override() {
    let spec = MenuSpec::parse("Title%t|A|B%x5|%l|C");
    assert_eq!(spec.title.as_deref(), Some("Title"));
    let item = |label: &str, retval| MenuEntry::Item { label: label.to_owned(), retval, icon: None };
    assert_eq!(spec.entries, vec![item("A", 1), item("B", 5), MenuEntry::Separator, item("C", 6)]);
}

#[test]
fn picking_a_menu_item_writes_the_value_and_runs_the_callback_once() {
    let shading = slot(1i32);
    let seen = Rc::new(Cell::new(0.0));
    let calls = Rc::new(Cell::new(0));
    let (seen_in, calls_in) = (seen.clone(), calls.clone());

    let mut pilot = no_auto_open();
    let mut block = Block::new("header");
    block
        .add(
            Widget::menu("Flat|Smooth", rect(0, 0, 80, 20), shading.clone()).with_retval(5).on_commit(move |c| {
                seen_in.set(c.value);
                calls_in.set(calls_in.get() + 1);
            }),
        )
        .unwrap();
    pilot.ui_mut().add_block(block);

    assert_eq!(pilot.press(5, 5), BlockResult::Continue);
    assert_eq!(pilot.depth(), 1);
    pilot.move_to(10, 45);
    pilot.press(10, 45);
    assert_eq!(pilot.release(10, 45), BlockResult::ReturnOk);

    assert_eq!(pilot.depth(), 0);
    assert_eq!(shading.get(), 2);
    assert_eq!(pilot.fired(), vec![5]);
    assert_eq!(calls.get(), 1);
    assert_eq!(seen.get(), 2.0);
}

/// A toolbar whose "Add" opens a popup whose "Mesh" opens a submenu with a
/// "Cube" button (retval 9).
fn nested_menus() -> Pilot {
    let mut pilot = no_auto_open();
    let mut toolbar = Block::new("toolbar");
    toolbar
        .add(Widget::nested("Add", rect(0, 0, 80, 20), || {
            let mut add = Block::new("add");
            add.add(Widget::nested("Mesh", rect(0, 0, 80, 20), || {
                let mut mesh = Block::new("mesh");
                mesh.add(Widget::button("Cube", rect(0, 0, 60, 20)).with_retval(9)).unwrap();
                mesh
            }))
            .unwrap();
            add
        }))
        .unwrap();
    pilot.ui_mut().add_block(toolbar);

    pilot.press(5, 5);
    pilot.move_to(90, 5);
    pilot.press(90, 5);
    assert_eq!(pilot.depth(), 2);
    pilot
}

#[test]
fn escape_closes_only_the_submenu_and_cancel_all_the_rest() {
    let mut pilot = nested_menus();
    assert_eq!(pilot.press_key(Key::Escape), BlockResult::ReturnCancel);
    assert_eq!(pilot.depth(), 1);

    pilot.ui_mut().cancel_all();
    assert_eq!(pilot.depth(), 0);
    assert_eq!(pilot.ui().stack.base().len(), 1);
    assert!(pilot.fired().is_empty());
}

#[test]
fn committing_in_a_submenu_unwinds_every_level() {
    let mut pilot = nested_menus();
    pilot.move_to(170, 5);
    pilot.press(170, 5);
    assert_eq!(pilot.release(170, 5), BlockResult::ReturnOk);
    assert_eq!(pilot.depth(), 0);
    assert_eq!(pilot.fired(), vec![9]);
}

#[test]
fn moving_far_away_closes_the_popup() {
    let mut pilot = no_auto_open();
    let mut block = Block::new("header");
    block.add(Widget::menu("Flat|Smooth", rect(0, 0, 80, 20), slot(1i32))).unwrap();
    pilot.ui_mut().add_block(block);
    pilot.press(5, 5);

    // Still over the opener: the popup stays.
    pilot.move_to(6, 6);
    assert_eq!(pilot.depth(), 1);

    pilot.move_to(400, 300);
    pilot.wait_ms(1100);
    assert_eq!(pilot.depth(), 0);
    assert!(pilot.fired().is_empty());
}

#[test]
fn hovering_a_menu_opens_it_after_the_delay() {
    let mut pilot = Pilot::default();
    let mut block = Block::new("header");
    block.add(Widget::menu("Flat|Smooth", rect(0, 0, 80, 20), slot(1i32))).unwrap();
    pilot.ui_mut().add_block(block);

    pilot.move_to(5, 5);
    pilot.wait_ms(400);
    assert_eq!(pilot.depth(), 0);
    pilot.wait_ms(100);
    assert_eq!(pilot.depth(), 1);
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[test]
fn radio_rows_sharing_storage_are_exclusive() {
    let mode = slot(0i32);
    let mut pilot = Pilot::default();
    let mut block = Block::new("mode");
    for i in 0..3 {
        block.add(Widget::radio(format!("M{i}"), rect(i * 40, 0, 40, 20), mode.clone(), 1.0, f64::from(i))).unwrap();
    }
    let id = pilot.ui_mut().add_block(block);

    for i in 0..3 {
        pilot.click(i * 40 + 5, 5);
        assert_eq!(mode.get(), i);
        let selected: Vec<bool> =
            pilot.ui().block(id).unwrap().widgets().iter().map(|w| w.is(WidgetFlags::SELECTED)).collect();
        let expected: Vec<bool> = (0..3).map(|j| j == i).collect();
        assert_eq!(selected, expected);
    }
}

#[test]
fn arrow_keys_visit_interactive_widgets_and_wrap() {
    let mut pilot = Pilot::default();
    let mut block = Block::new("props").with_flags(BlockFlags::KEY_NAV);
    block.add(Widget::label("Object", rect(0, 0, 100, 20))).unwrap();
    block.add(Widget::button("Apply", rect(0, 20, 100, 20))).unwrap();
    block.add(Widget::separator(rect(0, 40, 100, 4))).unwrap();
    block.add(Widget::toggle("Wire", rect(0, 44, 100, 20), slot(0i32))).unwrap();
    block.add(Widget::label("Size", rect(0, 64, 100, 20))).unwrap();
    block.add(Widget::number("X", rect(0, 84, 100, 20), slot(1.0f32), 0.0, 10.0)).unwrap();
    let id = pilot.ui_mut().add_block(block);

    let mut visited = Vec::new();
    for _ in 0..4 {
        pilot.press_key(Key::Down);
        visited.push(pilot.ui().block(id).unwrap().active());
    }
    assert_eq!(visited, vec![Some(1), Some(3), Some(5), Some(1)]);

    pilot.press_key(Key::Up);
    assert_eq!(pilot.ui().block(id).unwrap().active(), Some(5));
}

#[test]
fn locked_widgets_post_a_message_and_change_nothing() {
    let wire = slot(0i32);
    let mut pilot = Pilot::default();
    let mut block = Block::new("props");
    block.add(Widget::toggle("Wire", rect(0, 0, 60, 20), wire.clone()).with_retval(3).locked("Library data")).unwrap();
    pilot.ui_mut().add_block(block);

    pilot.click(5, 5);
    assert_eq!(wire.get(), 0);
    assert!(pilot.fired().is_empty());
    assert!(pilot.drain_events().contains(&UiEvent::Locked { message: "Library data".to_owned() }));
    assert_eq!(pilot.ui().ctx.lock_message(), Some("Library data"));
}

#[test]
fn ctrl_drag_on_a_slider_lands_on_the_coarse_step() {
    let value = slot(0.0f32);
    let mut pilot = Pilot::default();
    let mut block = Block::new("props");
    block.add(Widget::slider("Mix", rect(0, 0, 105, 20), value.clone(), 0.0, 10.0).with_step(2.5)).unwrap();
    pilot.ui_mut().add_block(block);

    for end in (3..=130).step_by(9) {
        pilot.move_to(0, 5);
        pilot.press(0, 5);
        pilot.send(Event::motion(Offset::new(end, 5)).with_modifiers(Modifiers::CTRL));
        pilot.send(Event::release(Offset::new(end, 5)).with_modifiers(Modifiers::CTRL));
        let v = f64::from(value.get());
        assert!((0.0..=10.0).contains(&v), "{v} out of range");
        assert_eq!((v / 2.5).fract(), 0.0, "{v} is not a multiple of 2.5 (end {end})");
    }
}

#[test]
fn escape_mid_drag_puts_the_slider_back() {
    let value = slot(0i32);
    let mut pilot = Pilot::default();
    let mut block = Block::new("tools");
    block.add(Widget::slider("Mix", rect(0, 0, 105, 20), value.clone(), 0.0, 10.0).with_retval(3)).unwrap();
    pilot.ui_mut().add_block(block);

    pilot.move_to(0, 5);
    pilot.press(0, 5);
    pilot.move_to(50, 5);
    assert_eq!(value.get(), 5);
    assert_eq!(pilot.press_key(Key::Escape), BlockResult::Continue);
    assert_eq!(value.get(), 0);

    pilot.move_to(100, 5);
    pilot.release(100, 5);
    assert_eq!(value.get(), 0);
    assert_eq!(pilot.fired(), Vec::<i32>::new());
}

#[test]
fn tooltip_shows_after_rest_and_hides_on_move() {
    let mut pilot = Pilot::default();
    let mut block = Block::new("tools");
    block.add(Widget::button("Apply", rect(0, 0, 60, 20)).with_tip("Apply modifier")).unwrap();
    pilot.ui_mut().add_block(block);

    pilot.move_to(5, 5);
    assert!(!pilot.render().contains("tooltip"));
    pilot.wait_ms(500);
    assert!(pilot.render().contains("tooltip \"Apply modifier\""));

    pilot.move_to(300, 5);
    assert!(!pilot.render().contains("tooltip"));
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

#[test]
fn dropping_a_panel_onto_another_merges_tabs() {
    let config = UiConfig::default();
    let mut panels = PanelSurface::new(Alignment::None);
    let a = panels.panel("A", "props", Size::new(200, 100), &config);
    let b = panels.panel("B", "props", Size::new(200, 100), &config);
    let c = panels.panel("C", "props", Size::new(200, 100), &config);
    panels.get_mut(c).unwrap().tab = Some(b);
    let b_ofs = panels.get(b).unwrap().ofs;
    let mut pilot = Pilot::new(Ui::new(config).with_panels(panels));

    pilot.drag((50, 10), (50, 10 + b_ofs.y));

    let surface = &pilot.ui().panels;
    assert_eq!(surface.dragging(), None);
    assert_eq!(surface.get(b).unwrap().tab, Some(a));
    assert_eq!(surface.get(c).unwrap().tab, Some(a));
    assert_eq!(surface.get(a).unwrap().tab, None);
    assert_eq!(surface.get(a).unwrap().ofs, b_ofs);
    insta::assert_snapshot!(render_panels(surface, &pilot.ui().config).trim_end(), @r###"
    A 200x100+0+108 Open
    B tab of A
    C tab of A
    "###);
}

#[test]
fn collapsed_floating_panels_stow_and_come_back() {
    let config = UiConfig::default();
    let mut panels = PanelSurface::new(Alignment::None).with_origin(Offset::new(0, 400));
    let a = panels.panel("A", "props", Size::new(100, 80), &config);
    panels.get_mut(a).unwrap().ofs = Offset::new(200, 40);
    let mut pilot = Pilot::new(Ui::new(config).with_panels(panels));

    pilot.click(205, 45);
    let panel = pilot.ui().panels.get(a).unwrap();
    assert_eq!(panel.collapse, Collapse::ClosedY);
    assert_eq!(panel.ofs, Offset::new(0, 400));

    pilot.click(5, 405);
    let panel = pilot.ui().panels.get(a).unwrap();
    assert_eq!(panel.collapse, Collapse::Open);
    assert_eq!(panel.ofs, Offset::new(200, 40));
}

#[test]
fn panel_layout_survives_a_save_and_restore() {
    let config = UiConfig::default();
    let mut panels = PanelSurface::new(Alignment::None);
    let a = panels.panel("A", "props", Size::new(200, 100), &config);
    panels.panel("B", "props", Size::new(200, 100), &config);
    panels.get_mut(a).unwrap().ofs = Offset::new(300, 40);
    panels.toggle_collapse(a, &config).unwrap();
    let saved = panels.save_layout().unwrap();

    let mut fresh = PanelSurface::new(Alignment::None);
    let a2 = fresh.panel("A", "props", Size::new(200, 100), &config);
    fresh.panel("B", "props", Size::new(200, 100), &config);
    assert_eq!(fresh.restore_layout(&saved, &config).unwrap(), 2);
    assert_eq!(fresh.get(a2).unwrap().collapse, Collapse::ClosedY);
    // Stowed panels are saved at the position they return to.
    assert_eq!(fresh.get(a2).unwrap().ofs, Offset::new(300, 40));
}
