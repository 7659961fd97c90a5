//! Text renderings of blocks, whole interfaces and panel layouts.
//!
//! Every helper goes through [`RecordingDrawer`] or the panel records, never
//! through real pixels, so the output is stable across hosts.

use std::fmt::Write as _;

use crate::app::Ui;
use crate::block::Block;
use crate::config::UiConfig;
use crate::panel::PanelSurface;
use crate::render::{rect_text, RecordingDrawer};

/// One draw pass of a single block.
pub fn render_block(block: &Block, config: &UiConfig) -> String {
    let mut drawer = RecordingDrawer::new();
    block.draw(&mut drawer, config);
    drawer.to_text()
}

/// One full draw pass of the interface.
pub fn render_ui(ui: &mut Ui) -> String {
    let mut drawer = RecordingDrawer::new();
    ui.draw(&mut drawer);
    drawer.to_text()
}

/// Every panel in creation order: rect, collapse state, and tab owner.
///
/// ```text
/// Object 200x100+0+0 Open
/// Material tab of Object
/// ```
pub fn render_panels(surface: &PanelSurface, config: &UiConfig) -> String {
    let mut out = String::new();
    for id in &surface.order {
        let Some(panel) = surface.get(*id) else { continue };
        let _ = match panel.tab.and_then(|owner| surface.get(owner)) {
            Some(owner) => writeln!(out, "{} tab of {}", panel.name, owner.name),
            None => writeln!(
                out,
                "{} {} {:?}{}",
                panel.name,
                rect_text(panel.rect(config.panel_header)),
                panel.collapse,
                if panel.selected { " (dragging)" } else { "" }
            ),
        };
    }
    out
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Offset, Region, Size};
    use crate::panel::Alignment;
    use crate::widget::{slot, Widget};

    #[test]
    fn block_rendering() {
        let mut block = Block::new("tools").with_offset(Offset::new(10, 10));
        block.add(Widget::toggle("Wire", Region::new(0, 0, 40, 20), slot(1i32))).unwrap();
        block.add(Widget::button("Apply", Region::new(40, 0, 40, 20))).unwrap();
        insta::assert_snapshot!(render_block(&block, &UiConfig::default()).trim_end(), @r###"
        block tools 80x20+10+10
          Toggle "Wire" *
          Button "Apply"
        "###);
    }

    #[test]
    fn panel_rendering() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::Vertical);
        let a = s.panel("Object", "props", Size::new(200, 100), &config);
        let b = s.panel("Material", "props", Size::new(200, 60), &config);
        s.panel("Texture", "props", Size::new(200, 80), &config);
        s.get_mut(b).unwrap().tab = Some(a);
        s.toggle_collapse(a, &config).unwrap();
        insta::assert_snapshot!(render_panels(&s, &config).trim_end(), @r###"
        Object 200x20+0+0 ClosedY
        Material tab of Object
        Texture 200x80+0+176 Open
        "###);
    }

    #[test]
    fn ui_rendering_includes_headers() {
        let config = UiConfig::default();
        let mut s = PanelSurface::new(Alignment::Vertical);
        let object = s.panel("Object", "props", Size::new(200, 60), &config);
        let mut ui = Ui::new(config).with_panels(s);
        let mut block = Block::new("object");
        block.add(Widget::button("Apply", Region::new(0, 0, 60, 20))).unwrap();
        ui.add_panel_block(object, block).unwrap();
        insta::assert_snapshot!(render_ui(&mut ui).trim_end(), @r###"
        panel Object 200x20+0+0 Open
        block object 60x20+0+20
          Button "Apply"
        "###);
    }
}
